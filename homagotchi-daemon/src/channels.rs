//! Process-wide signals
//!
//! The loops themselves share the household context; these only carry
//! events out to `main`.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use homagotchi_display::PanelError;

/// Raised by the interrupt handler (ctrl + c, SIGTERM)
pub static SHUTDOWN: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Raised when a loop stops on a display error
pub static FATAL: Signal<CriticalSectionRawMutex, PanelError> = Signal::new();
