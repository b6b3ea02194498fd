//! Render-ready snapshot of a widget

use serde::{Deserialize, Serialize};

/// Where the state machine currently sits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueStatus {
    /// Idle with no order: placeholder shown in the order panel
    IdleEmpty,
    Generating,
    IdleWithOrder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantView {
    pub name: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEntry {
    /// 1-based
    pub position: usize,
    pub name: String,
    pub is_next: bool,
}

/// Everything a front end needs to draw the widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueView {
    pub participants: Vec<ParticipantView>,
    pub selected_count: usize,
    pub roster_size: usize,
    pub can_generate: bool,
    pub is_generating: bool,
    pub status: QueueStatus,
    pub order: Vec<OrderEntry>,
    pub next: Option<String>,
}

impl QueueView {
    pub fn selected_names(&self) -> Vec<&str> {
        self.participants
            .iter()
            .filter(|participant| participant.selected)
            .map(|participant| participant.name.as_str())
            .collect()
    }

    pub fn order_names(&self) -> Vec<&str> {
        self.order.iter().map(|entry| entry.name.as_str()).collect()
    }

    pub fn has_order(&self) -> bool {
        !self.order.is_empty()
    }
}
