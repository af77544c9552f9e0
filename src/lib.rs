//! # Public Server
//! src/lib.rs
//!
//! Servidor HTTP/1.1 mínimo: un loop de accept, un pool fijo de workers, una
//! tabla de rutas por (método, path) y un conjunto fijo de archivos estáticos
//! como fallback.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: request line, modelo de request y escritura de respuestas
//! - `router`: tabla de rutas y política de dispatch
//! - `resources`: allow-list de archivos estáticos y la página plantilla
//! - `server`: pool de workers, manejo de conexiones y accept loop
//! - `config`: configuración por CLI / variables de entorno
//! - `error`: tipo de error común
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use public_server::config::Config;
//! use public_server::resources::StaticResources;
//! use public_server::router::{Dispatcher, Routes};
//! use public_server::server::Server;
//!
//! let config = Config::default();
//! let resources = StaticResources::new(&config.public_dir);
//! let dispatcher = Dispatcher::new(Routes::new(), resources);
//!
//! let server = Server::new(config, dispatcher).expect("configuración inválida");
//! server.listen().expect("Error al iniciar servidor");
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod resources;
pub mod router;
pub mod server;

pub use error::ServerError;
