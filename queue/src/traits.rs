//! Service trait definitions for dependency injection
//!
//! The delay and the randomness are the only effects in the queue; both sit
//! behind these traits so the state machine can be driven deterministically.

use async_trait::async_trait;
use std::time::Duration;

/// Suspension used to pace the reveal of a new order
#[mockall::automock]
#[async_trait]
pub trait Timer: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Produces a permutation of the names it is given
#[mockall::automock]
pub trait Shuffler: Send + Sync {
    fn shuffle(&self, names: Vec<String>) -> Vec<String>;
}
