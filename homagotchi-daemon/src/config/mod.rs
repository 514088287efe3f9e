//! Configuration loading
//!
//! Reads the household from TOML: an explicit path, then
//! `homagotchi.toml` in the working directory, then the built-in default.

pub mod loader;

pub use loader::{load, LoadError, OutputConfig};
