//! Shared fixtures for service tests

use queue::{QueueState, QueueView, Roster};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::types::ClientMessage;

pub fn generate_client_id() -> Uuid {
    Uuid::new_v4()
}

pub fn client_channel() -> (mpsc::Sender<ClientMessage>, mpsc::Receiver<ClientMessage>) {
    mpsc::channel(8)
}

pub fn sample_view() -> QueueView {
    let mut state = QueueState::new(Roster::new(["Ana", "Bia", "Caio"]).unwrap());
    state.toggle("Bia").unwrap();
    state.view()
}

pub fn snapshot() -> ClientMessage {
    ClientMessage::QueueSnapshot { queue: sample_view() }
}
