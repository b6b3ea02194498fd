//! Static page handlers

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use shared::{process_debug, ProcessId};

use crate::error::WebServerResult;
use crate::traits::{StaticFileResponse, StaticFileServer, WebSocketManager};
use crate::webserver_impl::WebServer;

impl IntoResponse for StaticFileResponse {
    fn into_response(self) -> Response {
        let mut response = ([(header::CONTENT_TYPE, self.content_type)], self.content).into_response();
        if let Some(cache_control) = self.cache_control {
            if let Ok(value) = cache_control.parse() {
                response.headers_mut().insert(header::CACHE_CONTROL, value);
            }
        }
        response
    }
}

/// Serve the widget page - GET /
pub async fn serve_index<W, F>(State(server): State<WebServer<W, F>>) -> WebServerResult<StaticFileResponse>
where
    W: WebSocketManager + 'static,
    F: StaticFileServer + 'static,
{
    server.static_server().serve_file("index.html").await
}

/// Serve an asset - GET /static/*path
pub async fn serve_static<W, F>(
    Path(path): Path<String>,
    State(server): State<WebServer<W, F>>,
) -> WebServerResult<StaticFileResponse>
where
    W: WebSocketManager + 'static,
    F: StaticFileServer + 'static,
{
    process_debug!(ProcessId::current(), "Static request: {}", path);
    server.static_server().serve_file(&path).await
}
