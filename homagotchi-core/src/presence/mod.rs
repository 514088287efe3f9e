//! Presence tracking
//!
//! Records, probe classification and face resolution for each tracked person.

pub mod face;
pub mod monitor;
pub mod record;

pub use face::resolve;
pub use monitor::{classify, PresenceMonitor, Transition};
pub use record::{PresenceRecord, StatusCode, LONG_STAY_S, PRESENCE_WINDOW_S, SESSION_WINDOW_S};
