//! Shared setup for webserver integration tests

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower::ServiceExt;

use queue::{QueueWidget, RandomShuffler, Roster, TokioTimer};
use webserver::{
    RealStaticFileServer, RealWebSocketManager, StaticFileServer, WebServer, WebServerResult, WebSocketManager,
};

pub type TestServer = WebServer<RealWebSocketManager, RealStaticFileServer>;

pub const ROSTER: [&str; 4] = ["Ramun", "Paulo", "Ioannis", "Shun"];

/// Server over a seeded widget, static files from a scratch directory
pub fn create_test_server(delay: Duration) -> (TestServer, TempDir) {
    let static_dir = TempDir::new().unwrap();
    std::fs::write(static_dir.path().join("app.css"), "body { margin: 0; }").unwrap();

    let widget = QueueWidget::new(
        Roster::new(ROSTER).unwrap(),
        delay,
        TokioTimer::new(),
        RandomShuffler::from_seed(42),
    );
    let address: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let server = WebServer::new(
        address,
        widget,
        RealWebSocketManager::new(),
        RealStaticFileServer::new(static_dir.path()),
    );
    (server, static_dir)
}

/// Send one request through the router and decode the JSON body
pub async fn send_json<W, F>(server: &WebServer<W, F>, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value)
where
    W: WebSocketManager + 'static,
    F: StaticFileServer + 'static,
{
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = server.build_router().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub struct RunningServer {
    pub server: TestServer,
    pub address: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<WebServerResult<()>>,
    _static_dir: TempDir,
}

impl RunningServer {
    pub async fn start(delay: Duration) -> Self {
        let (server, static_dir) = create_test_server(delay);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let (shutdown, shutdown_rx) = oneshot::channel::<()>();

        let task_server = server.clone();
        let handle = tokio::spawn(async move {
            task_server
                .serve(listener, async {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        Self {
            server,
            address,
            shutdown: Some(shutdown),
            handle,
            _static_dir: static_dir,
        }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.address)
    }

    pub async fn stop(mut self) -> WebServerResult<()> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server did not shut down")
            .expect("server task panicked")
    }
}
