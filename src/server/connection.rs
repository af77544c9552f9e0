//! # Manejo de una Conexión
//! src/server/connection.rs
//!
//! Recorre una conexión de punta a punta, una sola vez y en orden:
//!
//! ```text
//! leer request line ─┬─ inválida ──────────────────────────────→ cerrar (sin bytes)
//!                    └─ válida → headers/body → dispatch ─┬─ handler  ─┐
//!                                                         ├─ estático ─┼→ respuesta → cerrar
//!                                                         └─ 404 ──────┘
//! ```
//!
//! La única lectura que bloquea es la de la request line. Headers y body se
//! toman de lo que ya quedó en el buffer después de esa línea; un cliente que
//! manda solo la request line y deja el socket abierto igual recibe respuesta.
//!
//! No hay keep-alive: un request por conexión.

use crate::error::ServerError;
use crate::http::request::parse_header_line;
use crate::http::{Request, ResponseWriter};
use crate::router::{Dispatch, Dispatcher};
use std::fmt;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpStream;
use tracing::warn;

/// Largo máximo de la request line, terminador incluido
pub const MAX_LINE: u64 = 8 * 1024;

/// Máximo de bytes de body que se guardan en el request
pub const MAX_BODY: usize = 64 * 1024;

/// Cómo terminó una conexión
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Request line inválida: se cerró sin escribir nada
    Rejected,
    /// Respondió un handler registrado
    HandlerInvoked,
    /// Se sirvió un archivo de la allow-list
    StaticServed,
    /// Se respondió 404
    NotFound,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Outcome::Rejected => "rejected",
            Outcome::HandlerInvoked => "handler",
            Outcome::StaticServed => "static",
            Outcome::NotFound => "not_found",
        };
        f.write_str(name)
    }
}

/// Atiende una conexión TCP aceptada
///
/// El stream se cierra al salir, tanto en éxito como en error.
pub fn handle_connection(stream: TcpStream, dispatcher: &Dispatcher) -> Result<Outcome, ServerError> {
    let mut reader = BufReader::new(&stream);
    let mut writer = &stream;
    serve_connection(&mut reader, &mut writer, dispatcher)
}

/// Pipeline de una conexión sobre cualquier lector con buffer y escritor
pub fn serve_connection<R: Read>(
    reader: &mut BufReader<R>,
    writer: &mut dyn Write,
    dispatcher: &Dispatcher,
) -> Result<Outcome, ServerError> {
    let line = match read_line(reader)? {
        Some(line) => line,
        None => {
            warn!(max = MAX_LINE, "request line demasiado larga, cerrando sin respuesta");
            return Ok(Outcome::Rejected);
        }
    };

    let mut request = match Request::parse(&line) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, line = %line, "request line inválida, cerrando sin respuesta");
            return Ok(Outcome::Rejected);
        }
    };

    read_buffered(reader.buffer(), &mut request);

    let mut response = ResponseWriter::new(writer);

    match dispatcher.dispatch(request.method(), request.path()) {
        Dispatch::Handler(handler) => {
            handler
                .handle(&request, &mut response)
                .map_err(|source| ServerError::Handler {
                    method: request.method().to_string(),
                    path: request.path().to_string(),
                    source,
                })?;
            Ok(Outcome::HandlerInvoked)
        }
        Dispatch::Static => {
            dispatcher.resources().serve(request.path(), &mut response)?;
            Ok(Outcome::StaticServed)
        }
        Dispatch::NotFound => {
            response.write_not_found()?;
            Ok(Outcome::NotFound)
        }
    }
}

/// Lee la request line sin su terminador (`\n` o `\r\n`)
///
/// Retorna "" si hubo EOF antes de cualquier byte y `None` si se llegó a
/// `MAX_LINE` sin ver el fin de línea.
fn read_line<R: BufRead>(reader: &mut R) -> std::io::Result<Option<String>> {
    let mut raw = Vec::new();
    reader.by_ref().take(MAX_LINE).read_until(b'\n', &mut raw)?;

    match raw.last() {
        Some(b'\n') => {
            raw.pop();
            if raw.last() == Some(&b'\r') {
                raw.pop();
            }
        }
        _ if raw.len() as u64 >= MAX_LINE => return Ok(None),
        _ => {}
    }

    Ok(Some(String::from_utf8_lossy(&raw).into_owned()))
}

/// Headers y body a partir de los bytes que ya llegaron, sin tocar el socket
///
/// Las líneas se leen hasta la línea vacía; si no llegó, se quedan los headers
/// completos que haya y no hay body.
fn read_buffered(buffered: &[u8], request: &mut Request) {
    let mut rest = buffered;

    while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
        let raw = &rest[..pos];
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        rest = &rest[pos + 1..];

        if raw.is_empty() {
            read_body(rest, request);
            return;
        }

        let line = String::from_utf8_lossy(raw);
        if let Some((name, value)) = parse_header_line(&line) {
            request.add_header(name, value);
        }
    }
}

/// Body: lo disponible, acotado por `Content-Length` y `MAX_BODY`
fn read_body(available: &[u8], request: &mut Request) {
    let length = request
        .headers()
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("Content-Length"))
        .and_then(|(_, value)| value.parse::<usize>().ok());

    if let Some(length) = length {
        let take = length.min(MAX_BODY).min(available.len());
        request.set_body(available[..take].to_vec());
    }
}
