//! Microwave queue core
//!
//! Pick who is in line from a fixed roster and draw a random serving order
//! among them. The state machine in [`core`] is pure; [`QueueWidget`] adds the
//! pacing delay and the randomness through the traits in [`traits`].

pub mod core;
pub mod error;
pub mod services;
pub mod terminal;
pub mod traits;
pub mod widget;

// Re-export commonly used types
pub use crate::core::{QueueState, QueueStatus, QueueView, Roster};
pub use error::{QueueError, QueueResult};
pub use services::{RandomShuffler, TokioTimer};
pub use traits::{Shuffler, Timer};
pub use widget::{GenerateOutcome, IgnoredReason, QueueWidget};
