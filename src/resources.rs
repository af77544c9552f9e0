//! # Recursos Estáticos
//! src/resources.rs
//!
//! Sirve un conjunto fijo de archivos desde el directorio público. Solo los
//! paths de la allow-list son elegibles; cualquier otro path no existe para
//! este módulo.
//!
//! Hay un único recurso plantilla (`/classic.html`): en cada request se lee
//! como texto y cada `{time}` se reemplaza por la hora actual.
//!
//! ## Casos
//!
//! - Path fuera de la allow-list → `contains()` es falso, el dispatch responde 404
//! - Path en la allow-list pero ausente en disco → `ServerError::ResourceUnavailable`
//! - Archivo normal → se hace stream con el tamaño leído en ese momento

use crate::error::ServerError;
use crate::http::{ResponseWriter, StatusCode};
use chrono::Local;
use std::collections::HashSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Paths servidos por defecto
pub const DEFAULT_ALLOW_LIST: [&str; 11] = [
    "/index.html",
    "/spring.svg",
    "/spring.png",
    "/resources.html",
    "/styles.css",
    "/app.js",
    "/links.html",
    "/forms.html",
    "/classic.html",
    "/events.html",
    "/events.js",
];

/// Recurso plantilla por defecto
pub const DEFAULT_TEMPLATE: &str = "/classic.html";

/// Marcador que se reemplaza por la hora actual
pub const TIME_PLACEHOLDER: &str = "{time}";

/// Allow-list de archivos estáticos, inmutable después de construirse
#[derive(Debug, Clone)]
pub struct StaticResources {
    root: PathBuf,
    allowed: HashSet<String>,
    template: Option<String>,
}

impl StaticResources {
    /// Allow-list por defecto bajo `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_allow_list(root, DEFAULT_ALLOW_LIST, Some(DEFAULT_TEMPLATE))
    }

    /// Allow-list arbitraria. La plantilla, si se indica, se agrega a la lista.
    pub fn with_allow_list<I, S>(root: impl Into<PathBuf>, paths: I, template: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut allowed: HashSet<String> = paths.into_iter().map(Into::into).collect();
        if let Some(template) = template {
            allowed.insert(template.to_string());
        }

        Self {
            root: root.into(),
            allowed,
            template: template.map(str::to_string),
        }
    }

    /// Verifica si el path está en la allow-list
    pub fn contains(&self, path: &str) -> bool {
        self.allowed.contains(path)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Content-Type según la extensión; `None` si es desconocida
    pub fn content_type(&self, path: &str) -> Option<String> {
        mime_guess::from_path(path).first().map(|mime| mime.to_string())
    }

    /// Ruta en disco de un path de la allow-list
    fn file_path(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }

    /// Escribe la respuesta 200 del recurso
    ///
    /// Solo se debe llamar con paths de la allow-list.
    pub fn serve(&self, path: &str, response: &mut ResponseWriter<'_>) -> Result<(), ServerError> {
        let file_path = self.file_path(path);
        let content_type = self.content_type(path);
        let unavailable = |source| ServerError::ResourceUnavailable {
            path: path.to_string(),
            source,
        };

        if self.template.as_deref() == Some(path) {
            let template = fs::read_to_string(&file_path).map_err(unavailable)?;
            let content = render_template(&template, &current_timestamp());
            debug!(path, bytes = content.len(), "sirviendo plantilla");

            response.write_content(StatusCode::Ok, content_type.as_deref(), content.as_bytes())?;
        } else {
            let mut file = File::open(&file_path).map_err(unavailable)?;
            let length = file.metadata().map_err(unavailable)?.len();
            debug!(path, bytes = length, "sirviendo archivo");

            response.write_response(StatusCode::Ok, content_type.as_deref(), length, &mut file)?;
        }

        Ok(())
    }
}

/// Reemplaza cada ocurrencia del marcador por `timestamp`
pub fn render_template(template: &str, timestamp: &str) -> String {
    template.replace(TIME_PLACEHOLDER, timestamp)
}

/// Hora local estilo ISO-8601 (ej: "2026-10-17T12:30:05.123456789")
pub fn current_timestamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}
