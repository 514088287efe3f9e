//! Configuration types
//!
//! Household configuration shared by the core loops and the binary loader.

pub mod types;

pub use types::*;
