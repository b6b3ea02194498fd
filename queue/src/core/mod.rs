//! Core business logic modules
//!
//! Pure business logic with no I/O dependencies

pub mod roster;
pub mod selection;
pub mod shuffle;
pub mod state;
pub mod view;

pub use roster::Roster;
pub use selection::Selection;
pub use shuffle::{fisher_yates, permutation_rank};
pub use state::{Completion, GenerateRejected, GenerationId, GenerationTicket, Phase, QueueState};
pub use view::{OrderEntry, ParticipantView, QueueStatus, QueueView};
