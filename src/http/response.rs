//! # Escritura de Respuestas HTTP
//!
//! `ResponseWriter` emite una respuesta HTTP/1.1 completa sobre el stream de
//! la conexión. El orden es siempre el mismo:
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/css\r\n        (solo si se conoce)
//! Content-Length: 13\r\n            (siempre, incluso 0)
//! Connection: close\r\n             (siempre, no hay keep-alive)
//! \r\n
//! <exactamente Content-Length bytes>
//! ```
//!
//! ## Ejemplo de uso
//!
//! ```
//! use public_server::http::{ResponseWriter, StatusCode};
//!
//! let mut out = Vec::new();
//! let mut response = ResponseWriter::new(&mut out);
//! response.write_content(StatusCode::Ok, Some("text/plain"), b"hola").unwrap();
//! drop(response);
//!
//! assert!(out.ends_with(b"\r\n\r\nhola"));
//! ```

use super::StatusCode;
use std::io::{self, BufWriter, Read, Write};

/// Escritor de respuestas sobre el stream de una conexión
pub struct ResponseWriter<'a> {
    out: BufWriter<&'a mut dyn Write>,
}

impl<'a> ResponseWriter<'a> {
    pub fn new(out: &'a mut dyn Write) -> Self {
        Self {
            out: BufWriter::new(out),
        }
    }

    /// Escribe status line, headers y exactamente `body_length` bytes de `body`
    ///
    /// Si `body` se agota antes retorna `UnexpectedEof`: el header ya declaró
    /// la longitud y la respuesta no se puede completar.
    pub fn write_response(
        &mut self,
        status: StatusCode,
        content_type: Option<&str>,
        body_length: u64,
        body: &mut dyn Read,
    ) -> io::Result<()> {
        self.out
            .write_all(format_head(status, content_type, body_length).as_bytes())?;

        let mut limited = body.take(body_length);
        let written = io::copy(&mut limited, &mut self.out)?;
        if written != body_length {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("body ended after {} of {} bytes", written, body_length),
            ));
        }

        self.out.flush()
    }

    /// Respuesta con body en memoria
    pub fn write_content(
        &mut self,
        status: StatusCode,
        content_type: Option<&str>,
        body: &[u8],
    ) -> io::Result<()> {
        let mut source = body;
        self.write_response(status, content_type, body.len() as u64, &mut source)
    }

    /// Respuesta 404 fija: sin Content-Type y con body vacío
    pub fn write_not_found(&mut self) -> io::Result<()> {
        self.write_content(StatusCode::NotFound, None, &[])
    }
}

/// Genera status line + headers + línea vacía
pub fn format_head(status: StatusCode, content_type: Option<&str>, body_length: u64) -> String {
    let mut head = format!("HTTP/1.1 {}\r\n", status);
    if let Some(content_type) = content_type {
        head.push_str(&format!("Content-Type: {}\r\n", content_type));
    }
    head.push_str(&format!("Content-Length: {}\r\n", body_length));
    head.push_str("Connection: close\r\n\r\n");
    head
}
