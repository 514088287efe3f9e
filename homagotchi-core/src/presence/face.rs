//! Face state resolution
//!
//! Maps a record's timestamps to the base face. Animation frames are never
//! produced here; they belong to the animation sequencer.

use chrono::NaiveDateTime;
use log::info;

use super::monitor::Transition;
use super::record::{PresenceRecord, StatusCode};

/// Resolve the status code a record should show
///
/// Rules, first match wins:
/// 1. animating: keep the current code
/// 2. not home: `Away`
/// 3. a departure was just recorded: `Home`
/// 4. home past the long-stay threshold: `LongStay`
/// 5. otherwise `Home`
///
/// The current base code is never read back: `LongStay` lasts exactly as
/// long as `long_stay_due` holds, and a departure moves its anchor.
pub fn resolve(record: &PresenceRecord, transition: Transition, now: NaiveDateTime) -> StatusCode {
    if record.is_animating() {
        return record.status();
    }

    if !record.is_home(now) {
        return StatusCode::Away;
    }

    if transition == Transition::Left {
        return StatusCode::Home;
    }

    if record.long_stay_due(now) {
        return StatusCode::LongStay;
    }

    StatusCode::Home
}

/// Resolve and store the base face, logging face changes
pub fn apply(
    record: &mut PresenceRecord,
    transition: Transition,
    now: NaiveDateTime,
) -> StatusCode {
    let previous = record.status();
    let next = resolve(record, transition, now);

    if next != previous && !record.is_animating() {
        match next {
            StatusCode::Away => info!("{} is away. Face cleared.", record.name()),
            StatusCode::LongStay => info!(
                "{} has been home for 24h at {}",
                record.name(),
                record.address()
            ),
            _ => {}
        }
        record.set_base_status(next);
    }

    record.status()
}
