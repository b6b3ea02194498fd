//! WebSocket connection handler
//!
//! Each browser gets its own outgoing channel registered with the manager.
//! Queue changes reach it through the server's snapshot broadcaster.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use queue::QueueError;
use shared::{process_debug, process_error, process_info, process_warn, ProcessId};

use crate::error::{WebServerError, WebServerResult};
use crate::traits::{StaticFileServer, WebSocketManager};
use crate::types::{AlertLevel, ClientMessage, ClientRequest};
use crate::webserver_impl::WebServer;

const CLIENT_CHANNEL_CAPACITY: usize = 100;

/// WebSocket upgrade - GET /ws
pub async fn websocket_handler<W, F>(ws: WebSocketUpgrade, State(server): State<WebServer<W, F>>) -> Response
where
    W: WebSocketManager + 'static,
    F: StaticFileServer + 'static,
{
    ws.on_upgrade(move |socket| handle_websocket(socket, server))
}

async fn handle_websocket<W, F>(socket: WebSocket, server: WebServer<W, F>)
where
    W: WebSocketManager + 'static,
    F: StaticFileServer + 'static,
{
    let client_id = Uuid::new_v4();
    process_info!(ProcessId::current(), "🔗 New WebSocket connection: {}", client_id);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ClientMessage>(CLIENT_CHANNEL_CAPACITY);

    if let Err(e) = server.websocket_manager().add_client(client_id, tx).await {
        process_error!(ProcessId::current(), "Failed to register WebSocket client {}: {}", client_id, e);
        return;
    }

    let snapshot = ClientMessage::QueueSnapshot {
        queue: server.widget().view(),
    };
    if let Err(e) = server.websocket_manager().send_to_client(client_id, snapshot).await {
        process_warn!(ProcessId::current(), "Failed to send initial snapshot to {}: {}", client_id, e);
    }

    let outgoing_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let json_msg = match serde_json::to_string(&msg).map_err(WebServerError::from) {
                Ok(json) => json,
                Err(e) => {
                    process_error!(ProcessId::current(), "Dropped message for client {}: {}", client_id, e);
                    continue;
                }
            };

            if let Err(e) = sender.send(Message::Text(json_msg)).await {
                process_warn!(ProcessId::current(), "Failed to send message to client {}: {}", client_id, e);
                break;
            }
        }

        process_debug!(ProcessId::current(), "Outgoing message task ended for client {}", client_id);
    });

    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                process_warn!(ProcessId::current(), "WebSocket error for client {}: {}", client_id, e);
                break;
            }
        };

        match msg {
            Message::Text(text) => {
                process_debug!(ProcessId::current(), "📨 Received from client {}: {}", client_id, text);

                let reply = match serde_json::from_str::<ClientRequest>(&text) {
                    Ok(request) => handle_client_request(client_id, request, &server).await,
                    Err(e) => {
                        process_warn!(ProcessId::current(), "Failed to parse client request from {}: {}", client_id, e);
                        Ok(Some(alert(AlertLevel::Error, "Invalid Request", format!("Failed to parse request: {}", e))))
                    }
                };

                match reply {
                    Ok(Some(message)) => {
                        if let Err(e) = server.websocket_manager().send_to_client(client_id, message).await {
                            process_error!(ProcessId::current(), "Failed to reply to client {}: {}", client_id, e);
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        process_error!(ProcessId::current(), "Failed to handle request from {}: {}", client_id, e);
                    }
                }
            }
            Message::Binary(_) => {
                process_warn!(ProcessId::current(), "Received binary message from client {} - not supported", client_id);
            }
            Message::Ping(_) | Message::Pong(_) => {}
            Message::Close(_) => {
                process_info!(ProcessId::current(), "Client {} requested close", client_id);
                break;
            }
        }
    }

    outgoing_task.abort();

    if let Err(e) = server.websocket_manager().remove_client(client_id).await {
        process_error!(ProcessId::current(), "Failed to remove client {}: {}", client_id, e);
    }

    process_info!(ProcessId::current(), "👋 WebSocket connection closed: {}", client_id);
}

/// Apply one request to the widget and build the direct reply, if any.
///
/// Selection changes need no reply: the broadcaster pushes the new snapshot to
/// every client, this one included.
async fn handle_client_request<W, F>(
    client_id: Uuid,
    request: ClientRequest,
    server: &WebServer<W, F>,
) -> WebServerResult<Option<ClientMessage>>
where
    W: WebSocketManager + 'static,
    F: StaticFileServer + 'static,
{
    server.state().record_request();
    let widget = server.widget();

    let reply = match request {
        ClientRequest::Toggle { person } => match widget.toggle(&person).await {
            Ok(_) => None,
            Err(QueueError::UnknownParticipant { name }) => Some(alert(
                AlertLevel::Warning,
                "Unknown participant",
                format!("{} is not on the roster", name),
            )),
            Err(e) => return Err(e.into()),
        },
        ClientRequest::SelectAll => {
            widget.select_all().await;
            None
        }
        ClientRequest::ClearAll => {
            widget.clear_all().await;
            None
        }
        ClientRequest::Generate => {
            let result = widget.generate().await;
            process_debug!(ProcessId::current(), "Client {} generate: {:?}", client_id, result);
            Some(ClientMessage::GenerateResult { result })
        }
        ClientRequest::GetQueue => Some(ClientMessage::QueueSnapshot { queue: widget.view() }),
        ClientRequest::Ping => Some(ClientMessage::Pong {
            server_time: Utc::now().timestamp() as u64,
        }),
    };

    Ok(reply)
}

fn alert(level: AlertLevel, title: &str, message: String) -> ClientMessage {
    ClientMessage::Alert {
        level,
        title: title.to_string(),
        message,
        timestamp: Utc::now().timestamp() as u64,
    }
}
