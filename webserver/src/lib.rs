//! Webserver library for the microwave queue
//!
//! Serves the queue widget page, a small REST API over the widget's actions
//! and a WebSocket feed that pushes every queue snapshot to connected browsers.

pub mod error;
pub mod services;
pub mod state;
pub mod traits;
pub mod types;
pub mod web;
pub mod webserver_impl;

// Re-export main types
pub use error::{WebServerError, WebServerResult};
pub use state::WebServerState;
pub use types::*;
pub use webserver_impl::{SharedWidget, WebServer};

// Re-export trait definitions
pub use traits::{StaticFileResponse, StaticFileServer, WebSocketManager};

// Re-export service implementations
pub use services::{RealStaticFileServer, RealWebSocketManager};
