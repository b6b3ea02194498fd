//! Tests for the StaticFileServer service

use tempfile::TempDir;

use crate::error::WebServerError;
use crate::services::static_server::EMBEDDED_INDEX;
use crate::services::RealStaticFileServer;
use crate::traits::StaticFileServer;

fn static_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("app.css"), "body { margin: 0; }").unwrap();
    std::fs::create_dir(dir.path().join("img")).unwrap();
    std::fs::write(dir.path().join("img").join("logo.svg"), "<svg/>").unwrap();
    dir
}

#[tokio::test]
async fn test_serves_file_with_mime_and_cache() {
    let dir = static_dir();
    let server = RealStaticFileServer::new(dir.path());

    let response = server.serve_file("app.css").await.unwrap();
    assert_eq!(response.content, b"body { margin: 0; }");
    assert_eq!(response.content_type, "text/css");
    assert_eq!(response.cache_control.as_deref(), Some("public, max-age=3600"));

    let nested = server.serve_file("/img/logo.svg").await.unwrap();
    assert_eq!(nested.content_type, "image/svg+xml");
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let dir = static_dir();
    let server = RealStaticFileServer::new(dir.path());

    let result = server.serve_file("missing.js").await;
    assert!(matches!(result, Err(WebServerError::StaticFileNotFound { .. })));
    assert!(!server.file_exists("missing.js").await);
}

#[tokio::test]
async fn test_directory_is_not_served() {
    let dir = static_dir();
    let server = RealStaticFileServer::new(dir.path());

    assert!(server.serve_file("img").await.is_err());
    assert!(!server.file_exists("img").await);
}

#[tokio::test]
async fn test_traversal_is_refused() {
    let outer = TempDir::new().unwrap();
    std::fs::write(outer.path().join("secret.txt"), "nope").unwrap();
    let public = outer.path().join("public");
    std::fs::create_dir(&public).unwrap();

    let server = RealStaticFileServer::new(&public);
    assert!(server.serve_file("../secret.txt").await.is_err());
    assert!(!server.file_exists("../secret.txt").await);
}

#[tokio::test]
async fn test_index_falls_back_to_embedded_page() {
    let dir = static_dir();
    let server = RealStaticFileServer::new(dir.path());

    let response = server.serve_file("index.html").await.unwrap();
    assert_eq!(response.content, EMBEDDED_INDEX.as_bytes());
    assert_eq!(response.content_type, "text/html; charset=utf-8");
    assert_eq!(response.cache_control.as_deref(), Some("no-cache"));

    let root = server.serve_file("/").await.unwrap();
    assert_eq!(root.content, EMBEDDED_INDEX.as_bytes());
}

#[tokio::test]
async fn test_index_on_disk_wins() {
    let dir = static_dir();
    std::fs::write(dir.path().join("index.html"), "<p>custom</p>").unwrap();
    let server = RealStaticFileServer::new(dir.path());

    let response = server.serve_file("index.html").await.unwrap();
    assert_eq!(response.content, b"<p>custom</p>");
    assert!(server.file_exists("index.html").await);
}
