//! HTTP and WebSocket surface

pub mod handlers;
