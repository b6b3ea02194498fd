//! REST API handlers
//!
//! One endpoint per widget action; each answers with the resulting queue view

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use chrono::Utc;

use queue::{GenerateOutcome, QueueView};
use shared::{process_info, ProcessId};

use crate::error::WebServerResult;
use crate::traits::{StaticFileServer, WebSocketManager};
use crate::types::{GenerateResponse, HealthResponse, ToggleRequest, ToggleResponse};
use crate::webserver_impl::WebServer;

/// Current queue state - GET /api/queue
pub async fn get_queue<W, F>(State(server): State<WebServer<W, F>>) -> Json<QueueView>
where
    W: WebSocketManager + 'static,
    F: StaticFileServer + 'static,
{
    Json(server.widget().view())
}

/// Select or deselect one participant - POST /api/toggle
pub async fn toggle<W, F>(
    State(server): State<WebServer<W, F>>,
    Json(request): Json<ToggleRequest>,
) -> WebServerResult<Json<ToggleResponse>>
where
    W: WebSocketManager + 'static,
    F: StaticFileServer + 'static,
{
    server.state().record_request();
    let selected = server.widget().toggle(&request.person).await?;

    Ok(Json(ToggleResponse {
        person: request.person,
        selected,
        queue: server.widget().view(),
    }))
}

/// Select everyone - POST /api/select-all
pub async fn select_all<W, F>(State(server): State<WebServer<W, F>>) -> Json<QueueView>
where
    W: WebSocketManager + 'static,
    F: StaticFileServer + 'static,
{
    server.state().record_request();
    server.widget().select_all().await;
    Json(server.widget().view())
}

/// Deselect everyone - POST /api/clear-all
pub async fn clear_all<W, F>(State(server): State<WebServer<W, F>>) -> Json<QueueView>
where
    W: WebSocketManager + 'static,
    F: StaticFileServer + 'static,
{
    server.state().record_request();
    server.widget().clear_all().await;
    Json(server.widget().view())
}

/// Draw a new order - POST /api/generate
///
/// 202 when a generation started (the order arrives over WebSocket or a later
/// GET once the delay elapses), 409 when the request was ignored.
pub async fn generate<W, F>(State(server): State<WebServer<W, F>>) -> (StatusCode, Json<GenerateResponse>)
where
    W: WebSocketManager + 'static,
    F: StaticFileServer + 'static,
{
    server.state().record_request();
    let result = server.widget().generate().await;

    let status = match result {
        GenerateOutcome::Started { generation } => {
            process_info!(ProcessId::current(), "🎲 Generation {} requested over HTTP", generation);
            StatusCode::ACCEPTED
        }
        GenerateOutcome::Ignored { .. } => StatusCode::CONFLICT,
    };

    (
        status,
        Json(GenerateResponse {
            result,
            queue: server.widget().view(),
        }),
    )
}

/// Health check - GET /health
pub async fn health<W, F>(State(server): State<WebServer<W, F>>) -> Json<HealthResponse>
where
    W: WebSocketManager + 'static,
    F: StaticFileServer + 'static,
{
    Json(HealthResponse {
        status: "healthy".to_string(),
        uptime_seconds: server.state().get_uptime_seconds(),
        connected_clients: server.websocket_manager().client_count().await,
        timestamp: Utc::now().timestamp(),
    })
}
