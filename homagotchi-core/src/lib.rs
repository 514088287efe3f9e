//! Board-agnostic core logic for the Homagotchi presence clock
//!
//! This crate contains all application logic that does not depend on the
//! host it runs on:
//!
//! - Collaborator traits (reachability probe, wall clock)
//! - Presence records, probe classification and face resolution
//! - The face animation sequencer
//! - The display power state machine and its background loop
//! - The polling scheduler and the shared household context
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod animation;
pub mod config;
pub mod power;
pub mod presence;
pub mod scheduler;
pub mod state;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;
