//! Rendering surface and panel abstraction for the Homagotchi presence clock
//!
//! This crate provides:
//! - `Panel` trait for the e-ink hardware (init, clear, sleep, full and partial refresh)
//! - `Canvas`, a 250x122 monochrome framebuffer usable with `embedded-graphics`
//! - `Frame`, the fixed screen layout (faces, names, clock, date)
//!
//! # Architecture
//!
//! The core crate builds a `Frame` from the presence records, draws it onto a
//! `Canvas`, converts the canvas into the panel's native byte layout with
//! `Canvas::panel_buffer` and hands that buffer to whichever `Panel`
//! implementation the binary was built with.

#![cfg_attr(not(test), no_std)]

pub mod backend;
pub mod canvas;
pub mod screen;

// Re-export key types
pub use backend::{Panel, PanelError};
pub use canvas::{Canvas, PanelBuffer, HEIGHT, PANEL_BUFFER_LEN, WIDTH};
pub use screen::{Frame, Tile, MAX_TILES, NAME_LEN};
