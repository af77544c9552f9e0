//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Mapea (método, path) a handlers y decide qué hacer con cada request.
//!
//! ## Arquitectura
//!
//! ```text
//! Request → Dispatcher ─┬─ handler registrado (método + path exactos)
//!                       ├─ archivo estático (path en la allow-list, cualquier método)
//!                       └─ 404
//! ```
//!
//! La tabla se arma una sola vez al inicio y después solo se lee, así que se
//! comparte entre workers con un `Arc` sin locks.

use crate::http::{Method, Request, ResponseWriter};
use crate::resources::StaticResources;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;

/// Handler de una ruta
///
/// Recibe el request y escribe la respuesta completa. Si falla, la conexión
/// se aborta sin respuesta bien formada.
pub trait Handler: Send + Sync {
    fn handle(&self, request: &Request, response: &mut ResponseWriter<'_>) -> io::Result<()>;
}

impl<F> Handler for F
where
    F: Fn(&Request, &mut ResponseWriter<'_>) -> io::Result<()> + Send + Sync,
{
    fn handle(&self, request: &Request, response: &mut ResponseWriter<'_>) -> io::Result<()> {
        self(request, response)
    }
}

/// Tabla de rutas indexada por (método, path)
#[derive(Default, Clone)]
pub struct Routes {
    handlers: HashMap<(Method, String), Arc<dyn Handler>>,
}

impl Routes {
    /// Crea una tabla vacía
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra una ruta con su handler
    ///
    /// No valida método ni path; si la ruta ya existía, el último registro gana.
    ///
    /// # Ejemplo
    /// ```
    /// use public_server::http::{Request, ResponseWriter, StatusCode};
    /// use public_server::router::Routes;
    ///
    /// fn hello(_req: &Request, res: &mut ResponseWriter<'_>) -> std::io::Result<()> {
    ///     res.write_content(StatusCode::Ok, Some("text/plain"), b"hello")
    /// }
    ///
    /// let mut routes = Routes::new();
    /// routes.register("GET", "/hello", hello);
    /// assert!(routes.resolve(&"GET".into(), "/hello").is_some());
    /// ```
    pub fn register<H>(&mut self, method: &str, path: &str, handler: H)
    where
        H: Fn(&Request, &mut ResponseWriter<'_>) -> io::Result<()> + Send + Sync + 'static,
    {
        self.register_handler(method, path, Arc::new(handler));
    }

    /// Igual que `register`, para handlers que ya son trait objects
    pub fn register_handler(&mut self, method: &str, path: &str, handler: Arc<dyn Handler>) {
        self.handlers
            .insert((Method::parse(method), path.to_string()), handler);
    }

    /// Búsqueda exacta, sin comodines ni prefijos
    pub fn resolve(&self, method: &Method, path: &str) -> Option<&dyn Handler> {
        self.handlers
            .get(&(method.clone(), path.to_string()))
            .map(|handler| &**handler)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Resultado de decidir qué hacer con un request
pub enum Dispatch<'a> {
    /// Hay un handler para (método, path)
    Handler(&'a dyn Handler),
    /// El path está en la allow-list (el método no importa)
    Static,
    /// Nada coincide
    NotFound,
}

impl std::fmt::Debug for Dispatch<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dispatch::Handler(_) => f.write_str("Handler"),
            Dispatch::Static => f.write_str("Static"),
            Dispatch::NotFound => f.write_str("NotFound"),
        }
    }
}

/// Configuración inmutable del servidor: rutas + recursos estáticos
pub struct Dispatcher {
    routes: Routes,
    resources: StaticResources,
}

impl Dispatcher {
    pub fn new(routes: Routes, resources: StaticResources) -> Self {
        Self { routes, resources }
    }

    /// Precedencia: handler exacto, después allow-list, después 404
    pub fn dispatch(&self, method: &Method, path: &str) -> Dispatch<'_> {
        if let Some(handler) = self.routes.resolve(method, path) {
            Dispatch::Handler(handler)
        } else if self.resources.contains(path) {
            Dispatch::Static
        } else {
            Dispatch::NotFound
        }
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    pub fn resources(&self) -> &StaticResources {
        &self.resources
    }
}
