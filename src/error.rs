//! # Errores del Servidor
//! src/error.rs
//!
//! Tipo de error común a todo el crate. Solo `Bind` y `Accept` llegan hasta
//! `main`; el resto queda contenido en el worker que atiende la conexión.

use std::io;
use thiserror::Error;

/// Errores que puede producir el servidor
#[derive(Debug, Error)]
pub enum ServerError {
    /// No se pudo abrir el socket de escucha
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    /// Falló `accept()` sobre el socket de escucha
    #[error("failed to accept connection: {0}")]
    Accept(#[source] io::Error),

    /// Recurso en la allow-list pero ausente o ilegible en disco
    #[error("static resource {path} is unavailable: {source}")]
    ResourceUnavailable {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Un handler registrado falló mientras escribía su respuesta
    #[error("handler for {method} {path} failed: {source}")]
    Handler {
        method: String,
        path: String,
        #[source]
        source: io::Error,
    },

    /// Configuración inválida
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error de I/O sobre la conexión
    #[error(transparent)]
    Io(#[from] io::Error),
}
