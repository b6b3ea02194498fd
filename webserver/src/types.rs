//! Type definitions for webserver
//!
//! Messages exchanged with the browser and the JSON bodies of the REST API.

use queue::{GenerateOutcome, QueueView};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Messages pushed from webserver to browser over WebSocket
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    ConnectionAck {
        session_id: Uuid,
        server_time: u64,
    },
    /// Full widget state; sent on connect and after every change
    QueueSnapshot {
        queue: QueueView,
    },
    /// Reply to a `generate` request from this client
    GenerateResult {
        result: GenerateOutcome,
    },
    Alert {
        level: AlertLevel,
        title: String,
        message: String,
        timestamp: u64,
    },
    Pong {
        server_time: u64,
    },
}

/// Requests sent from browser to webserver over WebSocket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientRequest {
    Toggle { person: String },
    SelectAll,
    ClearAll,
    Generate,
    GetQueue,
    Ping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleRequest {
    pub person: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub person: String,
    pub selected: bool,
    pub queue: QueueView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    #[serde(flatten)]
    pub result: GenerateOutcome,
    pub queue: QueueView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_seconds: u64,
    pub connected_clients: usize,
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_request_wire_format() {
        let toggle: ClientRequest = serde_json::from_str(r#"{"type":"toggle","person":"Ramun"}"#).unwrap();
        assert_eq!(
            toggle,
            ClientRequest::Toggle {
                person: "Ramun".to_string()
            }
        );

        let select_all: ClientRequest = serde_json::from_str(r#"{"type":"select_all"}"#).unwrap();
        assert_eq!(select_all, ClientRequest::SelectAll);

        assert!(serde_json::from_str::<ClientRequest>(r#"{"type":"launch"}"#).is_err());
    }

    #[test]
    fn test_generate_response_flattens_outcome() {
        let queue = queue::QueueState::new(queue::Roster::new(["A"]).unwrap()).view();
        let response = GenerateResponse {
            result: GenerateOutcome::Started { generation: 1 },
            queue,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["outcome"], "started");
        assert_eq!(json["generation"], 1);
        assert_eq!(json["queue"]["roster_size"], 1);
    }
}
