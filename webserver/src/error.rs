//! WebServer-specific error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use queue::QueueError;
use serde_json::json;
use shared::SharedError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WebServerError {
    #[error("Server startup error: {0}")]
    ServerStartup(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Static file not found: {path}")]
    StaticFileNotFound { path: String },

    #[error("WebSocket error: {0}")]
    WebSocketError(String),

    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl WebServerError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn websocket(message: impl Into<String>) -> Self {
        Self::WebSocketError(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            WebServerError::Queue(QueueError::UnknownParticipant { .. }) => StatusCode::NOT_FOUND,
            WebServerError::StaticFileNotFound { .. } => StatusCode::NOT_FOUND,
            WebServerError::Queue(QueueError::Unmounted) => StatusCode::SERVICE_UNAVAILABLE,
            WebServerError::JsonError(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = json!({
            "status": "error",
            "message": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

pub type WebServerResult<T> = Result<T, WebServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_participant_maps_to_not_found() {
        let error = WebServerError::from(QueueError::unknown("Zed"));
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(error.to_string(), "Queue error: Unknown participant: Zed");
    }

    #[test]
    fn test_startup_errors_are_internal() {
        let error = WebServerError::ServerStartup("port taken".to_string());
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unmounted_widget_is_unavailable() {
        let error = WebServerError::from(QueueError::Unmounted);
        assert_eq!(error.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_json_errors_are_bad_requests() {
        let parse_failure = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = WebServerError::from(parse_failure);
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert!(error.to_string().starts_with("JSON error:"));
    }
}
