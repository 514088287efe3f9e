//! Polling scheduler
//!
//! Drives probe, face resolution and animation for every tracked person on
//! a fixed cadence.

pub mod poll;

pub use poll::{PollOutcome, Scheduler};
