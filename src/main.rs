//! # Public Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada: lee la configuración, inicializa los logs, registra los
//! handlers y bloquea el thread en el accept loop.

use public_server::config::Config;
use public_server::http::{Request, ResponseWriter, StatusCode};
use public_server::resources::StaticResources;
use public_server::router::{Dispatcher, Routes};
use public_server::server::Server;
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// GET /messages[?last=N]
fn get_messages(request: &Request, response: &mut ResponseWriter<'_>) -> io::Result<()> {
    let mut body = String::from("GET request to /messages");
    if let Some(last) = request.query_param("last") {
        body.push_str(&format!(", last={}", last));
    }
    response.write_content(StatusCode::Ok, Some("text/plain"), body.as_bytes())
}

/// POST /messages
fn post_messages(_request: &Request, response: &mut ResponseWriter<'_>) -> io::Result<()> {
    response.write_content(StatusCode::Ok, Some("text/plain"), b"POST request to /messages")
}

fn main() {
    let config = Config::new();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_new(&config.log_filter)
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    config.log_summary();

    let mut routes = Routes::new();
    routes.register("GET", "/messages", get_messages);
    routes.register("POST", "/messages", post_messages);

    let resources = StaticResources::new(&config.public_dir);
    let dispatcher = Dispatcher::new(routes, resources);

    let server = match Server::new(config, dispatcher) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "no se pudo crear el servidor");
            std::process::exit(1);
        }
    };

    // Iniciar el servidor (esto bloqueará el thread)
    if let Err(e) = server.listen() {
        tracing::error!(error = %e, "error fatal");
        std::process::exit(1);
    }
}
