//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Loop de accept sobre un `TcpListener`. Cada conexión aceptada se entrega
//! entera (ownership del stream incluido) a un job del pool de workers; el
//! loop no vuelve a tocarla.
//!
//! Un error en una conexión queda dentro de su worker. Un error en el socket
//! de escucha (bind o accept) termina el servidor.

use super::connection::{handle_connection, Outcome};
use super::pool::ThreadPool;
use crate::config::Config;
use crate::error::ServerError;
use crate::router::Dispatcher;
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Servidor HTTP/1.1 con pool de workers fijo
pub struct Server {
    config: Config,
    dispatcher: Arc<Dispatcher>,
    pool: ThreadPool,
}

impl Server {
    /// Crea el servidor y arranca los workers del pool
    pub fn new(config: Config, dispatcher: Dispatcher) -> Result<Self, ServerError> {
        config.validate()?;
        let pool = ThreadPool::new(config.workers)?;

        Ok(Self {
            config,
            dispatcher: Arc::new(dispatcher),
            pool,
        })
    }

    /// Abre el socket de escucha en la dirección configurada
    pub fn bind(&self) -> Result<TcpListener, ServerError> {
        let address = self.config.address();
        TcpListener::bind(&address).map_err(|source| ServerError::Bind { address, source })
    }

    /// Bind + accept loop. Solo retorna si falla el socket de escucha.
    pub fn listen(&self) -> Result<(), ServerError> {
        let listener = self.bind()?;
        self.serve(listener)
    }

    /// Accept loop sobre un listener ya abierto
    pub fn serve(&self, listener: TcpListener) -> Result<(), ServerError> {
        let local = listener
            .local_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| self.config.address());
        info!(address = %local, workers = self.pool.size(), "servidor escuchando");

        for stream in listener.incoming() {
            let stream = stream.map_err(ServerError::Accept)?;
            self.submit(stream);
        }

        Ok(())
    }

    /// Entrega la conexión a un worker
    fn submit(&self, stream: TcpStream) {
        let dispatcher = Arc::clone(&self.dispatcher);
        let peer = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        debug!(peer = %peer, "nueva conexión");

        self.pool.execute(move || {
            let start = Instant::now();
            match handle_connection(stream, &dispatcher) {
                Ok(Outcome::Rejected) => {}
                Ok(outcome) => {
                    debug!(
                        peer = %peer,
                        outcome = %outcome,
                        latency_ms = start.elapsed().as_secs_f64() * 1000.0,
                        "conexión atendida"
                    );
                }
                Err(e) => {
                    error!(peer = %peer, error = %e, "conexión abortada");
                }
            }
        });
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
