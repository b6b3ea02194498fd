//! Request handlers grouped by surface

pub mod api;
pub mod static_files;
pub mod websocket;
