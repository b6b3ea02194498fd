//! Static file serving service
//!
//! Serves the widget page and its assets. When the configured directory has
//! no `index.html`, the page compiled into the binary is served instead.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use shared::{process_debug, process_warn, ProcessId};

use crate::error::{WebServerError, WebServerResult};
use crate::traits::{StaticFileResponse, StaticFileServer};

pub const EMBEDDED_INDEX: &str = include_str!("../../static/index.html");

#[derive(Clone)]
pub struct RealStaticFileServer {
    base_dir: PathBuf,
}

impl RealStaticFileServer {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    fn mime_type(path: &Path) -> &'static str {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "html" => "text/html; charset=utf-8",
            "css" => "text/css",
            "js" => "application/javascript",
            "json" => "application/json",
            "svg" => "image/svg+xml",
            "png" => "image/png",
            "ico" => "image/x-icon",
            _ => "application/octet-stream",
        }
    }

    fn cache_control(path: &Path) -> Option<&'static str> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("html") => Some("no-cache"),
            Some("js") | Some("css") => Some("public, max-age=3600"),
            Some("svg") | Some("png") | Some("ico") => Some("public, max-age=86400"),
            _ => None,
        }
    }

    fn is_index(request_path: &str) -> bool {
        let clean = request_path.trim_start_matches('/');
        clean.is_empty() || clean == "index.html"
    }

    /// Resolve a request path inside the base directory, refusing traversal
    fn resolve_path(&self, request_path: &str) -> WebServerResult<PathBuf> {
        let clean_path = request_path.trim_start_matches('/');
        let file_path = if clean_path.is_empty() { "index.html" } else { clean_path };

        let not_found = || WebServerError::StaticFileNotFound {
            path: request_path.to_string(),
        };

        let canonical_path = self.base_dir.join(file_path).canonicalize().map_err(|_| not_found())?;
        let canonical_base = self.base_dir.canonicalize().map_err(|_| not_found())?;

        if !canonical_path.starts_with(&canonical_base) {
            process_warn!(ProcessId::current(), "Refused static path outside base dir: {}", request_path);
            return Err(not_found());
        }

        Ok(canonical_path)
    }
}

#[async_trait]
impl StaticFileServer for RealStaticFileServer {
    async fn serve_file(&self, path: &str) -> WebServerResult<StaticFileResponse> {
        let resolved = self.resolve_path(path).and_then(|file_path| {
            if file_path.is_dir() {
                Err(WebServerError::StaticFileNotFound { path: path.to_string() })
            } else {
                Ok(file_path)
            }
        });

        let file_path = match resolved {
            Ok(file_path) => file_path,
            Err(_) if Self::is_index(path) => {
                process_debug!(ProcessId::current(), "📄 Serving embedded index page");
                return Ok(StaticFileResponse::new(EMBEDDED_INDEX.as_bytes().to_vec(), "text/html; charset=utf-8")
                    .with_cache_control("no-cache"));
            }
            Err(e) => return Err(e),
        };

        let content = fs::read(&file_path).await?;
        process_debug!(ProcessId::current(), "📄 Served static file: {} ({} bytes)", path, content.len());

        let mut response = StaticFileResponse::new(content, Self::mime_type(&file_path));
        if let Some(cache) = Self::cache_control(&file_path) {
            response = response.with_cache_control(cache);
        }
        Ok(response)
    }

    async fn file_exists(&self, path: &str) -> bool {
        self.resolve_path(path)
            .map(|file_path| file_path.is_file())
            .unwrap_or(false)
    }
}

impl Default for RealStaticFileServer {
    fn default() -> Self {
        Self::new("./static")
    }
}
