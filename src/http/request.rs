//! # Parsing de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Parser de la request line y modelo del request de una conexión.
//!
//! ## Formato de un Request
//!
//! ```text
//! GET /messages?last=42 HTTP/1.1\r\n
//! Host: localhost:9999\r\n
//! \r\n
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD target VERSION`, separados por un único espacio
//! 2. **Headers**: Pares `Name: Value` (uno por línea), se guardan tal cual llegan
//! 3. **Empty Line**: separa headers del body
//! 4. **Body**: opcional, una sola lectura guiada por `Content-Length`
//!
//! Solo la request line es obligatoria. Si no tiene exactamente tres tokens el
//! framing no es confiable y la conexión se cierra sin responder.

use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Métodos HTTP
///
/// Los métodos desconocidos no son un error de parsing: se conservan en
/// `Other` y el dispatch decide qué hacer con ellos.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET - Obtener un recurso
    GET,

    /// POST - Enviar datos a un recurso
    POST,

    /// Cualquier otro token recibido en la posición del método
    Other(String),
}

impl Method {
    /// Parsea un método HTTP desde un string (sensible a mayúsculas)
    pub fn parse(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "POST" => Method::POST,
            other => Method::Other(other.to_string()),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::Other(s) => s,
        }
    }
}

impl From<&str> for Method {
    fn from(s: &str) -> Self {
        Method::parse(s)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errores que pueden ocurrir durante el parsing de la request line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Request line vacía (el cliente cerró sin enviar nada)
    #[error("empty request line")]
    EmptyRequestLine,

    /// La request line no tiene exactamente tres tokens
    #[error("invalid request line: expected 3 tokens, got {tokens}")]
    InvalidRequestLine { tokens: usize },
}

/// Request line parseada: `METHOD target VERSION`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: Method,
    /// Path + query string tal como llegó
    pub target: String,
    pub version: String,
}

impl RequestLine {
    /// Parsea una línea sin terminador
    ///
    /// # Ejemplo
    /// ```
    /// use public_server::http::{Method, RequestLine};
    ///
    /// let line = RequestLine::parse("GET /messages?last=42 HTTP/1.1").unwrap();
    /// assert_eq!(line.method, Method::GET);
    /// assert_eq!(line.target, "/messages?last=42");
    /// assert_eq!(line.version, "HTTP/1.1");
    /// ```
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        if line.is_empty() {
            return Err(ParseError::EmptyRequestLine);
        }

        // Un único espacio como separador: "GET  / HTTP/1.1" da 4 tokens
        let parts: Vec<&str> = line.split(' ').collect();
        if parts.len() != 3 {
            return Err(ParseError::InvalidRequestLine { tokens: parts.len() });
        }

        Ok(RequestLine {
            method: Method::parse(parts[0]),
            target: parts[1].to_string(),
            version: parts[2].to_string(),
        })
    }
}

/// Request HTTP de una conexión
///
/// Se construye a partir de la request line; los headers y el body se agregan
/// mientras se lee el resto del request y después ya no cambian.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,

    /// Target original (ej: "/messages?last=42")
    target: String,

    /// Path sin query string (ej: "/messages")
    path: String,

    version: String,

    /// Query parameters (ej: {"last": "42"}), el último duplicado gana
    query_params: HashMap<String, String>,

    /// Headers tal como llegaron, sin normalizar mayúsculas
    headers: HashMap<String, String>,

    body: Option<Vec<u8>>,
}

impl Request {
    /// Crea un request a partir de una request line ya parseada
    pub fn new(line: RequestLine) -> Self {
        let (path, query_params) = parse_target(&line.target);

        Request {
            method: line.method,
            target: line.target,
            path,
            version: line.version,
            query_params,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Parsea un request desde su request line
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use public_server::http::Request;
    ///
    /// let request = Request::parse("GET /messages?last=42 HTTP/1.1").unwrap();
    ///
    /// assert_eq!(request.path(), "/messages");
    /// assert_eq!(request.query_param("last"), Some("42"));
    /// ```
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        RequestLine::parse(line).map(Request::new)
    }

    /// Agrega un header (si ya existía se sobrescribe)
    pub fn add_header(&mut self, name: &str, value: &str) {
        self.headers.insert(name.to_string(), value.to_string());
    }

    /// Establece el body leído de la conexión
    pub fn set_body(&mut self, body: Vec<u8>) {
        self.body = Some(body);
    }

    // === Métodos públicos para acceder a los campos ===

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn query_params(&self) -> &HashMap<String, String> {
        &self.query_params
    }

    /// Obtiene un query parameter específico
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(|s| s.as_str())
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Obtiene un header por su nombre exacto
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|s| s.as_str())
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

/// Separa path y query string en el primer '?'
///
/// Ejemplo: "/messages?last=42&x=1"
/// Retorna: ("/messages", {"last": "42", "x": "1"})
fn parse_target(target: &str) -> (String, HashMap<String, String>) {
    match target.split_once('?') {
        Some((path, query)) => (path.to_string(), parse_query_string(query)),
        None => (target.to_string(), HashMap::new()),
    }
}

/// Parsea una query string en un HashMap
///
/// Cada par debe tener exactamente un '='. Los que no lo cumplen
/// ("debug", "x=1=2") se descartan sin valor por defecto.
fn parse_query_string(query: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();

    for pair in query.split('&') {
        let parts: Vec<&str> = pair.split('=').collect();
        if let [key, value] = parts.as_slice() {
            params.insert(key.to_string(), value.to_string());
        }
    }

    params
}

/// Parsea una línea de header `Name: Value`
///
/// Las líneas sin ':' se ignoran (retorna `None`), no rompen el request.
pub fn parse_header_line(line: &str) -> Option<(&str, &str)> {
    let (name, value) = line.split_once(':')?;
    Some((name.trim(), value.trim()))
}
