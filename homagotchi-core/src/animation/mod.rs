//! Face animation
//!
//! The short "look around" sequence played when a person is pinged.

pub mod sequencer;

pub use sequencer::{should_animate, AnimationSequencer, Playback, ANIMATION_SEQUENCE};
