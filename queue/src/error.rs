//! Queue-specific error types

use shared::SharedError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueueError {
    #[error("Roster must contain at least one participant")]
    EmptyRoster,

    #[error("Roster entry {position} is blank")]
    BlankParticipant { position: usize },

    #[error("Participant listed twice in roster: {name}")]
    DuplicateParticipant { name: String },

    #[error("Unknown participant: {name}")]
    UnknownParticipant { name: String },

    #[error("Queue widget is no longer mounted")]
    Unmounted,

    #[error("Shared component error")]
    SharedError(#[from] SharedError),
}

impl QueueError {
    pub fn unknown(name: impl Into<String>) -> Self {
        Self::UnknownParticipant { name: name.into() }
    }
}

pub type QueueResult<T> = Result<T, QueueError>;
