//! Service implementations
//!
//! Real implementations of the service traits for production use

pub mod shuffler;
pub mod timer;

pub use shuffler::RandomShuffler;
pub use timer::TokioTimer;
