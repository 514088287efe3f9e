//! Wall clock

use chrono::NaiveDateTime;

/// Source of wall time
///
/// Presence windows and the on-screen clock both read from this, so tests
/// can drive the whole state machine without a real clock.
pub trait Clock {
    /// Timestamp for presence bookkeeping
    ///
    /// Must not jump with daylight-saving changes; hosts return UTC.
    fn now(&self) -> NaiveDateTime;

    /// Time shown on screen (local time on hosts)
    fn display_time(&self) -> NaiveDateTime {
        self.now()
    }
}
