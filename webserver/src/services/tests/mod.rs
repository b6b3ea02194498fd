//! Service tests for webserver

pub mod fixtures;
pub mod static_server;
