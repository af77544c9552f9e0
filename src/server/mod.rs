//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Escucha en un puerto
//! 2. Acepta conexiones entrantes
//! 3. Entrega cada conexión a un pool fijo de workers
//! 4. Lee el request, hace el dispatch y escribe la respuesta

pub mod connection;
pub mod pool;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use connection::Outcome;
pub use pool::ThreadPool;
pub use tcp::Server;
