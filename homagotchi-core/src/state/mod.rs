//! Shared runtime state
//!
//! The record set and the household context passed to both loops.

pub mod household;
pub mod roster;

pub use household::{DisplaySlot, Household};
pub use roster::Roster;
