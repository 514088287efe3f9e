//! Collaborator traits
//!
//! These traits define the interface between the presence logic and the
//! host-specific implementations. The display panel trait lives in
//! `homagotchi-display`.

pub mod clock;
pub mod probe;

pub use clock::Clock;
pub use probe::{Probe, ProbeError};
