//! Per-person presence record
//!
//! Timestamps are stored; presence itself is always derived from them.

use chrono::NaiveDateTime;
use heapless::String;

use crate::config::{PersonConfig, ADDRESS_LEN, NAME_LEN};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Presence window: seen within this many seconds means "home"
pub const PRESENCE_WINDOW_S: i64 = 600;

/// Session window: anyone seen within this many seconds keeps the display awake
pub const SESSION_WINDOW_S: i64 = 1800;

/// Uninterrupted time at home before the long-stay face appears
pub const LONG_STAY_S: i64 = 86_400;

/// Status code shown in a person's face slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum StatusCode {
    /// Not home (blank face)
    #[default]
    Away,
    /// Home
    Home,
    /// Final animation frame (same glyph as Home)
    AnimFrameA,
    /// Animation frame, looking right
    AnimFrameB,
    /// Animation frame, looking left
    AnimFrameC,
    /// Home for more than a day since the last departure
    LongStay,
}

impl StatusCode {
    /// Slot in the face table (0 = blank)
    pub const fn face_index(self) -> u8 {
        match self {
            StatusCode::Away => 0,
            StatusCode::Home | StatusCode::AnimFrameA => 1,
            StatusCode::AnimFrameB => 2,
            StatusCode::AnimFrameC => 3,
            StatusCode::LongStay => 4,
        }
    }

    /// Glyph drawn for this status
    pub const fn glyph(self) -> &'static str {
        match self.face_index() {
            1 => "(o__o)",
            2 => "(o_o )",
            3 => "( o_o)",
            4 => "(-#_#)",
            _ => "",
        }
    }

    /// Check if this code belongs to the animation sequencer
    pub const fn is_animation_frame(self) -> bool {
        matches!(
            self,
            StatusCode::AnimFrameA | StatusCode::AnimFrameB | StatusCode::AnimFrameC
        )
    }
}

/// Presence state of one tracked person
#[derive(Debug, Clone)]
pub struct PresenceRecord {
    name: String<NAME_LEN>,
    address: String<ADDRESS_LEN>,
    status: StatusCode,
    last_seen_at: NaiveDateTime,
    last_departed_at: Option<NaiveDateTime>,
    home_since: NaiveDateTime,
    is_animating: bool,
    ever_seen: bool,
}

impl PresenceRecord {
    /// Create a record, optimistically assuming the person was just seen
    pub fn new(person: &PersonConfig, now: NaiveDateTime) -> Self {
        Self {
            name: person.name.clone(),
            address: person.address.clone(),
            status: person.status,
            last_seen_at: now,
            last_departed_at: None,
            home_since: now,
            is_animating: false,
            ever_seen: false,
        }
    }

    /// Display label
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Probe target
    pub fn address(&self) -> &str {
        self.address.as_str()
    }

    /// Current status code
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Time of the most recent successful probe (boot time until then)
    pub fn last_seen_at(&self) -> NaiveDateTime {
        self.last_seen_at
    }

    /// Time of the most recent recorded departure
    pub fn last_departed_at(&self) -> Option<NaiveDateTime> {
        self.last_departed_at
    }

    /// Whether the animation sequencer currently owns this face slot
    pub fn is_animating(&self) -> bool {
        self.is_animating
    }

    /// Whether any probe has succeeded yet
    pub fn ever_seen(&self) -> bool {
        self.ever_seen
    }

    /// Seen within the presence window
    pub fn is_home(&self, now: NaiveDateTime) -> bool {
        self.seen_within(now, PRESENCE_WINDOW_S)
    }

    /// Seen less than `window_s` seconds before `now`
    pub fn seen_within(&self, now: NaiveDateTime, window_s: i64) -> bool {
        (now - self.last_seen_at).num_seconds() < window_s
    }

    /// Start of the current stay at home
    ///
    /// Tracking start until the first arrival from outside the presence
    /// window.
    pub fn home_since(&self) -> NaiveDateTime {
        self.home_since
    }

    /// Home for longer than the long-stay threshold
    ///
    /// Measured from the later of the last departure and the start of the
    /// current stay.
    pub fn long_stay_due(&self, now: NaiveDateTime) -> bool {
        let anchor = match self.last_departed_at {
            Some(left) => left.max(self.home_since),
            None => self.home_since,
        };
        self.is_home(now) && (now - anchor).num_seconds() > LONG_STAY_S
    }

    /// Record a successful probe
    ///
    /// A success outside the presence window starts a new stay. Returns
    /// true if `last_seen_at` moved. A clock that stepped backwards leaves
    /// it unchanged.
    pub(crate) fn record_seen(&mut self, now: NaiveDateTime) -> bool {
        self.ever_seen = true;
        if !self.is_home(now) {
            self.home_since = now;
        }
        if now > self.last_seen_at {
            self.last_seen_at = now;
            true
        } else {
            false
        }
    }

    /// Record a departure (failed probe while home)
    pub(crate) fn record_departure(&mut self, now: NaiveDateTime) {
        self.last_departed_at = Some(now);
    }

    /// Set a base status; ignored while an animation owns the slot
    pub(crate) fn set_base_status(&mut self, status: StatusCode) {
        debug_assert!(!status.is_animation_frame());
        if !self.is_animating {
            self.status = status;
        }
    }

    /// Take the face slot for an animation
    pub(crate) fn begin_animation(&mut self) {
        self.is_animating = true;
    }

    /// Show an animation frame; ignored unless animating
    pub(crate) fn show_frame(&mut self, frame: StatusCode) {
        if self.is_animating {
            self.status = frame;
        }
    }

    /// Give the face slot back
    ///
    /// The caller must resolve a base status straight after.
    pub(crate) fn end_animation(&mut self) {
        self.is_animating = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{person, t0};
    use chrono::TimeDelta;
    use proptest::prelude::*;

    #[test]
    fn test_new_record_is_home() {
        let record = PresenceRecord::new(&person("Alina"), t0());
        assert!(record.is_home(t0()));
        assert!(!record.ever_seen());
        assert_eq!(record.last_departed_at(), None);
        assert_eq!(record.status(), StatusCode::Away);
    }

    #[test]
    fn test_record_seen_never_moves_backwards() {
        let mut record = PresenceRecord::new(&person("Alina"), t0());
        let later = t0() + TimeDelta::seconds(30);
        assert!(record.record_seen(later));
        assert!(!record.record_seen(t0()));
        assert_eq!(record.last_seen_at(), later);
        assert!(record.ever_seen());
    }

    #[test]
    fn test_frames_need_animation_ownership() {
        let mut record = PresenceRecord::new(&person("Alina"), t0());
        record.show_frame(StatusCode::AnimFrameB);
        assert_eq!(record.status(), StatusCode::Away);

        record.begin_animation();
        record.show_frame(StatusCode::AnimFrameB);
        assert_eq!(record.status(), StatusCode::AnimFrameB);

        // Base status is not written while animating
        record.set_base_status(StatusCode::Home);
        assert_eq!(record.status(), StatusCode::AnimFrameB);
    }

    #[test]
    fn test_face_table() {
        let indices = [
            StatusCode::Away,
            StatusCode::Home,
            StatusCode::AnimFrameA,
            StatusCode::AnimFrameB,
            StatusCode::AnimFrameC,
            StatusCode::LongStay,
        ]
        .map(StatusCode::face_index);
        assert_eq!(indices, [0, 1, 1, 2, 3, 4]);
        assert_eq!(StatusCode::AnimFrameA.glyph(), StatusCode::Home.glyph());
        assert_eq!(StatusCode::Away.glyph(), "");
    }

    /// Successes every five minutes from `from_s` through `until_s`
    fn stay_home(record: &mut PresenceRecord, from_s: i64, until_s: i64) {
        let mut t = from_s;
        while t < until_s {
            record.record_seen(t0() + TimeDelta::seconds(t));
            t += 300;
        }
        record.record_seen(t0() + TimeDelta::seconds(until_s));
    }

    #[test]
    fn test_long_stay_anchor_defaults_to_tracking_start() {
        let mut record = PresenceRecord::new(&person("Alina"), t0());
        stay_home(&mut record, 0, LONG_STAY_S);
        let day = t0() + TimeDelta::seconds(LONG_STAY_S);
        assert_eq!(record.home_since(), t0());
        assert!(!record.long_stay_due(day));
        assert!(record.long_stay_due(day + TimeDelta::seconds(1)));
    }

    #[test]
    fn test_departure_resets_long_stay_anchor() {
        let mut record = PresenceRecord::new(&person("Alina"), t0());
        // missed once but still inside the presence window
        let left = t0() + TimeDelta::seconds(100);
        record.record_departure(left);
        stay_home(&mut record, 300, LONG_STAY_S + 50);

        let later = t0() + TimeDelta::seconds(LONG_STAY_S + 50);
        assert_eq!(record.home_since(), t0());
        assert!(!record.long_stay_due(later));
        assert!(record.long_stay_due(left + TimeDelta::seconds(LONG_STAY_S + 1)));
    }

    #[test]
    fn test_return_after_long_absence_starts_new_stay() {
        let mut record = PresenceRecord::new(&person("Alina"), t0());
        record.record_departure(t0() + TimeDelta::seconds(60));

        let back = t0() + TimeDelta::seconds(2 * LONG_STAY_S);
        record.record_seen(back);
        assert_eq!(record.home_since(), back);
        assert!(!record.long_stay_due(back));

        // only a full day at home after returning counts
        stay_home(&mut record, 2 * LONG_STAY_S, 3 * LONG_STAY_S + 1);
        assert!(record.long_stay_due(t0() + TimeDelta::seconds(3 * LONG_STAY_S + 1)));
    }

    proptest! {
        #[test]
        fn prop_is_home_matches_presence_window(offset in 0i64..5_000) {
            let record = PresenceRecord::new(&person("Alina"), t0());
            let now = t0() + TimeDelta::seconds(offset);
            prop_assert_eq!(record.is_home(now), offset < PRESENCE_WINDOW_S);
        }

        #[test]
        fn prop_session_window_wider_than_presence(offset in 0i64..5_000) {
            let record = PresenceRecord::new(&person("Alina"), t0());
            let now = t0() + TimeDelta::seconds(offset);
            if record.is_home(now) {
                prop_assert!(record.seen_within(now, SESSION_WINDOW_S));
            }
        }
    }
}
