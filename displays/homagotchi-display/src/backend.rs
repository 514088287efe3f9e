//! Panel backend trait
//!
//! Defines the interface to the e-ink panel driver.

use crate::canvas::PanelBuffer;

/// Fill byte that blanks the panel (all pixels white)
pub const FILL_WHITE: u8 = 0xFF;

/// Panel backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelError {
    /// Communication error with the panel controller
    Communication,
    /// Panel stayed busy past its refresh deadline
    BusyTimeout,
    /// Refresh requested before `init`
    NotInitialized,
    /// Host-side output (file, device node) failed
    Io,
}

impl core::fmt::Display for PanelError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PanelError::Communication => f.write_str("panel communication error"),
            PanelError::BusyTimeout => f.write_str("panel busy timeout"),
            PanelError::NotInitialized => f.write_str("panel not initialized"),
            PanelError::Io => f.write_str("panel output error"),
        }
    }
}

/// E-ink panel driver
///
/// The panel is non-reentrant. Callers must serialize every call; the core
/// does this by keeping the panel behind a single async mutex.
#[allow(async_fn_in_trait)]
pub trait Panel {
    /// Reset and initialize the controller (also used to wake from sleep)
    async fn init(&mut self) -> Result<(), PanelError>;

    /// Fill the whole panel with `fill` (0xFF = white)
    async fn clear(&mut self, fill: u8) -> Result<(), PanelError>;

    /// Put the controller into deep sleep
    async fn sleep(&mut self) -> Result<(), PanelError>;

    /// Full refresh with the given buffer
    async fn display_full(&mut self, buffer: &PanelBuffer) -> Result<(), PanelError>;

    /// Partial (fast, region-limited) refresh with the given buffer
    async fn display_partial(&mut self, buffer: &PanelBuffer) -> Result<(), PanelError>;

    /// Release pins and bus on shutdown
    ///
    /// Best-effort; never fails.
    fn release(&mut self);
}
