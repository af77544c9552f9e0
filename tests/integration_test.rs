//! Tests de integración para el servidor HTTP
//! tests/integration_test.rs
//!
//! Cada test levanta un `Server` real en un puerto efímero, en un thread
//! aparte, sirviendo el directorio `public/` del repositorio.

use public_server::config::Config;
use public_server::http::{Request, ResponseWriter, StatusCode};
use public_server::resources::StaticResources;
use public_server::router::{Dispatcher, Routes};
use public_server::server::Server;
use std::fs;
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

fn public_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("public")
}

fn get_messages(request: &Request, response: &mut ResponseWriter<'_>) -> io::Result<()> {
    let mut body = String::from("GET request to /messages");
    if let Some(last) = request.query_param("last") {
        body.push_str(&format!(", last={}", last));
    }
    response.write_content(StatusCode::Ok, Some("text/plain"), body.as_bytes())
}

fn post_messages(_request: &Request, response: &mut ResponseWriter<'_>) -> io::Result<()> {
    response.write_content(StatusCode::Ok, Some("text/plain"), b"POST request to /messages")
}

/// Handler lento que responde con su propio path: detecta respuestas cruzadas
fn echo_path(request: &Request, response: &mut ResponseWriter<'_>) -> io::Result<()> {
    thread::sleep(Duration::from_millis(20));
    response.write_content(StatusCode::Ok, Some("text/plain"), request.path().as_bytes())
}

/// Levanta el servidor sobre `public/` y retorna su dirección
fn start_server(workers: usize, echo_routes: usize) -> SocketAddr {
    start_server_in(&public_dir(), workers, echo_routes)
}

fn start_server_in(dir: &Path, workers: usize, echo_routes: usize) -> SocketAddr {
    let mut routes = Routes::new();
    routes.register("GET", "/messages", get_messages);
    routes.register("POST", "/messages", post_messages);
    for i in 0..echo_routes {
        routes.register("GET", &format!("/echo/{}", i), echo_path);
    }

    let mut config = Config::default();
    config.port = 0;
    config.workers = workers;
    config.public_dir = dir.to_string_lossy().into_owned();

    let resources = StaticResources::new(&config.public_dir);
    let server = Server::new(config, Dispatcher::new(routes, resources)).expect("server");
    let listener = server.bind().expect("bind");
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || server.serve(listener));
    addr
}

/// Helper: envía bytes crudos y retorna la response completa
fn send_raw(addr: SocketAddr, raw: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).expect("connect");
    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    stream.write_all(raw).unwrap();
    stream.flush().unwrap();

    let mut response = Vec::new();
    // Un cierre abrupto (RST) cuenta como "sin bytes"
    let _ = stream.read_to_end(&mut response);
    response
}

fn send_request(addr: SocketAddr, method: &str, target: &str) -> Vec<u8> {
    send_raw(addr, format!("{} {} HTTP/1.1\r\nHost: localhost\r\n\r\n", method, target).as_bytes())
}

/// Separa head y body de una response
fn split_response(raw: &[u8]) -> (String, Vec<u8>) {
    let pos = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response without header terminator");
    (String::from_utf8_lossy(&raw[..pos]).into_owned(), raw[pos + 4..].to_vec())
}

fn header<'a>(head: &'a str, name: &str) -> Option<&'a str> {
    head.lines()
        .find_map(|line| line.strip_prefix(name)?.strip_prefix(": "))
}

#[test]
fn test_get_messages_with_query() {
    let addr = start_server(4, 0);
    let (head, body) = split_response(&send_request(addr, "GET", "/messages?last=42"));

    assert!(head.starts_with("HTTP/1.1 200 OK"));
    assert_eq!(body, b"GET request to /messages, last=42");
    assert_eq!(header(&head, "Content-Length"), Some("33"));
    assert_eq!(header(&head, "Connection"), Some("close"));
}

#[test]
fn test_get_messages_malformed_query_is_ignored() {
    let addr = start_server(4, 0);
    let (_, body) = split_response(&send_request(addr, "GET", "/messages?bad&last=1=2"));
    assert_eq!(body, b"GET request to /messages");
}

#[test]
fn test_post_messages() {
    let addr = start_server(4, 0);
    let (head, body) = split_response(&send_request(addr, "POST", "/messages"));

    assert!(head.starts_with("HTTP/1.1 200 OK"));
    assert_eq!(body, b"POST request to /messages");
}

#[test]
fn test_static_files_match_disk() {
    let addr = start_server(4, 0);

    for (path, content_type) in [
        ("/index.html", "text/html"),
        ("/styles.css", "text/css"),
        ("/spring.svg", "image/svg+xml"),
        ("/spring.png", "image/png"),
    ] {
        let (head, body) = split_response(&send_request(addr, "GET", path));
        let on_disk = fs::read(public_dir().join(&path[1..])).unwrap();

        assert!(head.starts_with("HTTP/1.1 200 OK"), "{}: {}", path, head);
        assert_eq!(header(&head, "Content-Type"), Some(content_type));
        assert_eq!(header(&head, "Content-Length"), Some(on_disk.len().to_string().as_str()));
        assert_eq!(body, on_disk);
    }
}

#[test]
fn test_static_fallback_ignores_method() {
    let addr = start_server(4, 0);
    let on_disk = fs::read(public_dir().join("app.js")).unwrap();

    let (head, body) = split_response(&send_request(addr, "POST", "/app.js"));
    assert!(head.starts_with("HTTP/1.1 200 OK"));
    assert_eq!(body, on_disk);
}

#[test]
fn test_classic_template_changes_per_request() {
    let addr = start_server(4, 0);
    let template = fs::read_to_string(public_dir().join("classic.html")).unwrap();
    let (prefix, suffix) = template.split_once("{time}").unwrap();

    let (head1, body1) = split_response(&send_request(addr, "GET", "/classic.html"));
    thread::sleep(Duration::from_millis(20));
    let (head2, body2) = split_response(&send_request(addr, "GET", "/classic.html"));

    let body1 = String::from_utf8(body1).unwrap();
    let body2 = String::from_utf8(body2).unwrap();

    assert_ne!(body1, body2);
    for (head, body) in [(&head1, &body1), (&head2, &body2)] {
        assert!(body.starts_with(prefix));
        assert!(body.ends_with(suffix));
        assert!(!body.contains("{time}"));
        assert_eq!(header(head, "Content-Length"), Some(body.len().to_string().as_str()));
    }
}

#[test]
fn test_not_found_is_exact() {
    let addr = start_server(4, 0);

    for (method, target) in [("GET", "/nonexistent"), ("POST", "/"), ("PUT", "/messages")] {
        let response = send_request(addr, method, target);
        assert_eq!(
            response,
            b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            "{} {}",
            method,
            target
        );
    }
}

#[test]
fn test_malformed_request_line_gets_no_bytes() {
    let addr = start_server(4, 0);

    assert!(send_raw(addr, b"GET\r\n").is_empty());
    assert!(send_raw(addr, b"GET /messages\r\n").is_empty());
    assert!(send_raw(addr, b"\r\n").is_empty());

    // El servidor sigue atendiendo después de rechazar
    let (head, _) = split_response(&send_request(addr, "GET", "/messages"));
    assert!(head.starts_with("HTTP/1.1 200 OK"));
}

#[test]
fn test_concurrent_connections_no_cross_talk() {
    let clients = 32;
    let addr = start_server(4, clients);

    let handles: Vec<_> = (0..clients)
        .map(|i| {
            thread::spawn(move || {
                let path = format!("/echo/{}", i);
                let (head, body) = split_response(&send_request(addr, "GET", &path));
                (path, head, body)
            })
        })
        .collect();

    for handle in handles {
        let (path, head, body) = handle.join().expect("client thread");
        assert!(head.starts_with("HTTP/1.1 200 OK"));
        assert_eq!(body, path.as_bytes());
        assert_eq!(header(&head, "Content-Length"), Some(path.len().to_string().as_str()));
    }
}

#[test]
fn test_request_line_only_does_not_hold_worker() {
    let addr = start_server(1, 0);

    // Cliente A: solo la request line, con el socket abierto
    let mut first = TcpStream::connect(addr).expect("connect");
    first.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    first.write_all(b"GET /index.html HTTP/1.1\r\n").unwrap();

    let mut response = Vec::new();
    let _ = first.read_to_end(&mut response);
    let (head, body) = split_response(&response);
    assert!(head.starts_with("HTTP/1.1 200 OK"));
    assert_eq!(body, fs::read(public_dir().join("index.html")).unwrap());

    // Cliente B no queda esperando detrás de A
    let response = send_request(addr, "GET", "/nope");
    assert!(response.starts_with(b"HTTP/1.1 404 Not Found\r\n"));
}

#[test]
fn test_content_length_larger_than_body() {
    let addr = start_server(1, 0);
    let on_disk = fs::read(public_dir().join("index.html")).unwrap();

    let mut stream = TcpStream::connect(addr).expect("connect");
    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    stream
        .write_all(b"GET /index.html HTTP/1.1\r\nContent-Length: 1000\r\n\r\nabc")
        .unwrap();

    let mut response = Vec::new();
    let _ = stream.read_to_end(&mut response);
    let (head, body) = split_response(&response);
    assert!(head.starts_with("HTTP/1.1 200 OK"));
    assert_eq!(body, on_disk);
}

#[test]
fn test_missing_allow_listed_file_gets_no_bytes() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("styles.css"), "p { margin: 0; }").unwrap();
    let addr = start_server_in(dir.path(), 2, 0);

    assert!(send_request(addr, "GET", "/index.html").is_empty());
    assert!(send_request(addr, "GET", "/classic.html").is_empty());

    // Los archivos presentes y el 404 siguen funcionando
    let (head, body) = split_response(&send_request(addr, "GET", "/styles.css"));
    assert!(head.starts_with("HTTP/1.1 200 OK"));
    assert_eq!(body, b"p { margin: 0; }");
    assert!(send_request(addr, "GET", "/nope").starts_with(b"HTTP/1.1 404 Not Found\r\n"));
}
