//! WebSocket client management service
//!
//! Tracks connected browsers and fans queue snapshots out to them. Sends never
//! block: a client whose channel is full misses that message, and a client
//! whose channel is closed is forgotten.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use shared::{process_debug, process_info, process_warn, ProcessId};

use crate::error::{WebServerError, WebServerResult};
use crate::traits::WebSocketManager;
use crate::types::ClientMessage;

#[derive(Debug)]
struct Session {
    outbox: mpsc::Sender<ClientMessage>,
    opened_at: DateTime<Utc>,
}

#[derive(Clone, Default)]
pub struct RealWebSocketManager {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl RealWebSocketManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every outbox, so no lock is held while sending
    async fn outboxes(&self) -> Vec<(Uuid, mpsc::Sender<ClientMessage>)> {
        self.sessions
            .read()
            .await
            .iter()
            .map(|(id, session)| (*id, session.outbox.clone()))
            .collect()
    }

    async fn forget(&self, client_ids: &[Uuid], reason: &str) {
        let mut sessions = self.sessions.write().await;
        for client_id in client_ids {
            if let Some(session) = sessions.remove(client_id) {
                let lasted = Utc::now() - session.opened_at;
                process_info!(
                    ProcessId::current(),
                    "🗑️ Dropped client {} ({}) after {}s",
                    client_id,
                    reason,
                    lasted.num_seconds()
                );
            }
        }
    }
}

#[async_trait]
impl WebSocketManager for RealWebSocketManager {
    async fn add_client(&self, client_id: Uuid, sender: mpsc::Sender<ClientMessage>) -> WebServerResult<()> {
        let greeting = ClientMessage::ConnectionAck {
            session_id: client_id,
            server_time: Utc::now().timestamp() as u64,
        };
        if let Err(e) = sender.try_send(greeting) {
            process_warn!(ProcessId::current(), "Could not greet client {}: {}", client_id, e);
        }

        self.sessions.write().await.insert(
            client_id,
            Session {
                outbox: sender,
                opened_at: Utc::now(),
            },
        );

        process_info!(ProcessId::current(), "👋 Client {} joined", client_id);
        Ok(())
    }

    async fn remove_client(&self, client_id: Uuid) -> WebServerResult<()> {
        self.forget(&[client_id], "disconnected").await;
        Ok(())
    }

    async fn broadcast(&self, message: ClientMessage) -> WebServerResult<()> {
        let outboxes = self.outboxes().await;
        if outboxes.is_empty() {
            process_debug!(ProcessId::current(), "📭 Broadcast skipped: no clients");
            return Ok(());
        }

        let mut delivered = 0usize;
        let mut closed = Vec::new();
        for (client_id, outbox) in &outboxes {
            match outbox.try_send(message.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    process_warn!(ProcessId::current(), "Client {} is lagging, message dropped", client_id);
                }
                Err(TrySendError::Closed(_)) => closed.push(*client_id),
            }
        }

        if !closed.is_empty() {
            self.forget(&closed, "closed during broadcast").await;
        }

        process_debug!(ProcessId::current(), "📡 Broadcast reached {}/{} clients", delivered, outboxes.len());
        Ok(())
    }

    async fn send_to_client(&self, client_id: Uuid, message: ClientMessage) -> WebServerResult<()> {
        let outbox = self
            .sessions
            .read()
            .await
            .get(&client_id)
            .map(|session| session.outbox.clone())
            .ok_or_else(|| WebServerError::websocket(format!("Client {} not found", client_id)))?;

        match outbox.try_send(message) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(WebServerError::websocket(format!("Client {} is lagging", client_id))),
            Err(TrySendError::Closed(_)) => {
                self.forget(&[client_id], "closed during send").await;
                Err(WebServerError::websocket(format!("Client {} disconnected", client_id)))
            }
        }
    }

    async fn client_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
