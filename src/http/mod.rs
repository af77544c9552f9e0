//! # Módulo HTTP
//!
//! Implementa la parte del protocolo HTTP/1.1 que necesita el servidor, sin
//! librerías de alto nivel:
//!
//! - Parsing de la request line y de los query parameters
//! - Modelo de `Request` por conexión
//! - Escritura de respuestas con `Content-Length` exacto y `Connection: close`
//!
//! ### Formato de Request
//!
//! ```text
//! GET /messages?last=42 HTTP/1.1\r\n
//! Host: localhost:9999\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/plain\r\n
//! Content-Length: 24\r\n
//! Connection: close\r\n
//! \r\n
//! GET request to /messages
//! ```

pub mod request;   // Request line + modelo de Request
pub mod response;  // Escritura de responses
pub mod status;    // Códigos de estado HTTP

pub use request::{Method, ParseError, Request, RequestLine};
pub use response::ResponseWriter;
pub use status::StatusCode;
