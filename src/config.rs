//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración del servidor por argumentos CLI y variables de entorno.
//! Se lee una sola vez al arrancar; el tamaño del pool no cambia después.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./public_server --port 9999 --workers 64 --public-dir ./public
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 HTTP_HOST=0.0.0.0 RUST_LOG=debug ./public_server
//! ```

use crate::error::ServerError;
use clap::Parser;
use tracing::info;

/// Configuración del servidor HTTP/1.1
#[derive(Debug, Clone, Parser)]
#[command(name = "public_server")]
#[command(about = "Servidor HTTP/1.1 mínimo con pool de threads y archivos estáticos")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor (0 = puerto efímero)
    #[arg(short, long, default_value = "9999", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    /// Número fijo de workers que atienden conexiones
    #[arg(short, long, default_value = "64", env = "HTTP_WORKERS")]
    pub workers: usize,

    /// Directorio con los archivos estáticos
    #[arg(long = "public-dir", default_value = "./public", env = "PUBLIC_DIR")]
    pub public_dir: String,

    /// Filtro de logs (sintaxis de `EnvFilter`, ej: "info,public_server=debug")
    #[arg(long = "log-filter", default_value = "info", env = "RUST_LOG")]
    pub log_filter: String,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use public_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:9999");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.workers == 0 {
            return Err(ServerError::InvalidConfig("workers must be >= 1".to_string()));
        }
        if self.host.trim().is_empty() {
            return Err(ServerError::InvalidConfig("host must not be empty".to_string()));
        }
        if self.public_dir.trim().is_empty() {
            return Err(ServerError::InvalidConfig("public dir must not be empty".to_string()));
        }

        Ok(())
    }

    /// Emite un resumen de la configuración en los logs
    pub fn log_summary(&self) {
        info!(
            address = %self.address(),
            workers = self.workers,
            public_dir = %self.public_dir,
            log_filter = %self.log_filter,
            "configuración"
        );
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 9999,
            host: "127.0.0.1".to_string(),
            workers: 64,
            public_dir: "./public".to_string(),
            log_filter: "info".to_string(),
        }
    }
}
