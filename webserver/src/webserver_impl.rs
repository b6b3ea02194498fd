//! Main webserver implementation
//!
//! Owns the single mounted queue widget and exposes it over REST and
//! WebSocket. Services are injected so tests can swap them.

use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use queue::{QueueWidget, RandomShuffler, TokioTimer};
use shared::{process_error, process_info, ProcessId};

use crate::error::{WebServerError, WebServerResult};
use crate::state::WebServerState;
use crate::traits::{StaticFileServer, WebSocketManager};
use crate::types::ClientMessage;
use crate::web::handlers::{api, static_files, websocket};

pub type SharedWidget = Arc<QueueWidget<TokioTimer, RandomShuffler>>;

/// Main webserver struct with dependency injection
pub struct WebServer<W, F>
where
    W: WebSocketManager + 'static,
    F: StaticFileServer + 'static,
{
    state: Arc<WebServerState>,
    widget: SharedWidget,
    websocket_manager: Arc<W>,
    static_server: Arc<F>,
}

impl<W, F> Clone for WebServer<W, F>
where
    W: WebSocketManager + 'static,
    F: StaticFileServer + 'static,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            widget: Arc::clone(&self.widget),
            websocket_manager: Arc::clone(&self.websocket_manager),
            static_server: Arc::clone(&self.static_server),
        }
    }
}

impl<W, F> WebServer<W, F>
where
    W: WebSocketManager + 'static,
    F: StaticFileServer + 'static,
{
    pub fn new(
        bind_address: SocketAddr,
        widget: QueueWidget<TokioTimer, RandomShuffler>,
        websocket_manager: W,
        static_server: F,
    ) -> Self {
        Self {
            state: Arc::new(WebServerState::new(bind_address)),
            widget: Arc::new(widget),
            websocket_manager: Arc::new(websocket_manager),
            static_server: Arc::new(static_server),
        }
    }

    /// Build the Axum router with all routes
    pub fn build_router(&self) -> Router {
        Router::new()
            // Static page
            .route("/", get(static_files::serve_index::<W, F>))
            .route("/static/*path", get(static_files::serve_static::<W, F>))
            // WebSocket route
            .route("/ws", get(websocket::websocket_handler::<W, F>))
            // Queue API
            .route("/api/queue", get(api::get_queue::<W, F>))
            .route("/api/toggle", post(api::toggle::<W, F>))
            .route("/api/select-all", post(api::select_all::<W, F>))
            .route("/api/clear-all", post(api::clear_all::<W, F>))
            .route("/api/generate", post(api::generate::<W, F>))
            // Health check
            .route("/health", get(api::health::<W, F>))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive())
                    .into_inner(),
            )
            .with_state(self.clone())
    }

    /// Forward every published queue snapshot to all WebSocket clients
    pub fn start_broadcaster(&self) -> JoinHandle<()> {
        let mut views = self.widget.subscribe();
        let websocket_manager = Arc::clone(&self.websocket_manager);

        tokio::spawn(async move {
            while views.changed().await.is_ok() {
                let queue = views.borrow_and_update().clone();
                if let Err(e) = websocket_manager.broadcast(ClientMessage::QueueSnapshot { queue }).await {
                    process_error!(ProcessId::current(), "Failed to broadcast queue snapshot: {}", e);
                }
            }
        })
    }

    /// Bind the configured address and serve until Ctrl+C
    pub async fn run(&self) -> WebServerResult<()> {
        let address = self.state.bind_address;
        let listener = TcpListener::bind(address)
            .await
            .map_err(|e| WebServerError::ServerStartup(format!("Failed to bind to {}: {}", address, e)))?;

        self.serve(listener, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                shared::logging::log_error(ProcessId::current(), "Signal handling", &e);
            }
            shared::logging::log_shutdown(ProcessId::current(), "Received Ctrl+C signal");
        })
        .await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<S>(&self, listener: TcpListener, shutdown: S) -> WebServerResult<()>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        let local_address = listener.local_addr()?;
        process_info!(ProcessId::current(), "🌐 Web server listening on http://{}", local_address);
        process_info!(ProcessId::current(), "🍿 Queue available at http://{}/", local_address);

        let broadcaster = self.start_broadcaster();
        let result = axum::serve(listener, self.build_router())
            .with_graceful_shutdown(shutdown)
            .await;

        broadcaster.abort();
        self.widget.unmount();
        result.map_err(WebServerError::from)
    }

    pub fn state(&self) -> &Arc<WebServerState> {
        &self.state
    }

    pub fn widget(&self) -> &SharedWidget {
        &self.widget
    }

    pub fn websocket_manager(&self) -> &Arc<W> {
        &self.websocket_manager
    }

    pub fn static_server(&self) -> &Arc<F> {
        &self.static_server
    }
}
