//! Seams between the HTTP surface and its I/O
//!
//! Handlers only see these traits; tests swap in mocks or the real services
//! over scratch directories.

use async_trait::async_trait;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::WebServerResult;
use crate::types::ClientMessage;

/// Registry of connected browsers and their outgoing queues
#[mockall::automock]
#[async_trait]
pub trait WebSocketManager: Send + Sync {
    /// Register a session and greet it with a connection ack
    async fn add_client(&self, client_id: Uuid, sender: mpsc::Sender<ClientMessage>) -> WebServerResult<()>;

    async fn remove_client(&self, client_id: Uuid) -> WebServerResult<()>;

    /// Offer `message` to every session; closed sessions are dropped
    async fn broadcast(&self, message: ClientMessage) -> WebServerResult<()>;

    /// Errors when the session is unknown, lagging or closed
    async fn send_to_client(&self, client_id: Uuid, message: ClientMessage) -> WebServerResult<()>;

    async fn client_count(&self) -> usize;
}

/// Page and asset lookup under the static directory
#[mockall::automock]
#[async_trait]
pub trait StaticFileServer: Send + Sync {
    /// Contents plus headers for `path`, relative to the static root
    async fn serve_file(&self, path: &str) -> WebServerResult<StaticFileResponse>;

    async fn file_exists(&self, path: &str) -> bool;
}

/// Body and headers of a served asset
#[derive(Debug, Clone)]
pub struct StaticFileResponse {
    pub content: Vec<u8>,
    pub content_type: String,
    pub cache_control: Option<String>,
}

impl StaticFileResponse {
    pub fn new(content: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            content,
            content_type: content_type.into(),
            cache_control: None,
        }
    }

    pub fn with_cache_control(mut self, cache_control: impl Into<String>) -> Self {
        self.cache_control = Some(cache_control.into());
        self
    }
}
