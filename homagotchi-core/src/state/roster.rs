//! Shared presence record set
//!
//! Both loops read and write the records through short, non-async critical
//! sections. Nothing awaits while holding the lock.

use core::cell::RefCell;

use chrono::NaiveDateTime;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Vec;
use homagotchi_display::{Frame, Tile};

use crate::config::{PersonConfig, MAX_PERSONS};
use crate::presence::PresenceRecord;

/// The fixed set of tracked persons
pub struct Roster<M: RawMutex> {
    records: Mutex<M, RefCell<Vec<PresenceRecord, MAX_PERSONS>>>,
}

impl<M: RawMutex> Roster<M> {
    /// Create records for the configured persons, all assumed seen at `now`
    ///
    /// Persons beyond `MAX_PERSONS` are ignored.
    pub fn from_persons(persons: &[PersonConfig], now: NaiveDateTime) -> Self {
        let records = persons
            .iter()
            .take(MAX_PERSONS)
            .map(|p| PresenceRecord::new(p, now))
            .collect();
        Self {
            records: Mutex::new(RefCell::new(records)),
        }
    }

    /// Number of tracked persons
    pub fn len(&self) -> usize {
        self.records.lock(|r| r.borrow().len())
    }

    /// Check if no persons are tracked
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `f` on one record; `None` if the index is out of range
    pub fn with_record<R>(
        &self,
        index: usize,
        f: impl FnOnce(&mut PresenceRecord) -> R,
    ) -> Option<R> {
        self.records.lock(|r| r.borrow_mut().get_mut(index).map(f))
    }

    /// Check if any face slot is owned by an animation
    pub fn any_animating(&self) -> bool {
        self.records
            .lock(|r| r.borrow().iter().any(PresenceRecord::is_animating))
    }

    /// Check if anyone was seen within `window_s` seconds of `now`
    pub fn any_seen_within(&self, now: NaiveDateTime, window_s: i64) -> bool {
        self.records
            .lock(|r| r.borrow().iter().any(|p| p.seen_within(now, window_s)))
    }

    /// Build the screen contents, showing `shown_at` on the clock
    pub fn frame(&self, shown_at: NaiveDateTime) -> Frame {
        let mut frame = Frame::new(shown_at);
        self.records.lock(|r| {
            for record in r.borrow().iter() {
                frame.push(Tile::new(record.status().glyph(), record.name()));
            }
        });
        frame
    }
}
