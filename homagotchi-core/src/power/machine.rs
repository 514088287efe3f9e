//! Display power state machine
//!
//! The display sleeps after the household has been empty for a whole
//! session window and wakes when anyone comes back. Every tick that keeps
//! the display awake also redraws it.

/// Display power states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PowerState {
    /// Panel initialized, showing the clock and faces
    #[default]
    Awake,
    /// Panel blanked and in deep sleep
    Asleep,
}

/// What the power loop observed on a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerEvent {
    /// Someone was seen within the session window
    SessionActive,
    /// Nobody was seen within the session window
    SessionExpired,
}

impl PowerEvent {
    /// Classify a tick by whether anyone was recently home
    pub fn from_session(any_recently_home: bool) -> Self {
        if any_recently_home {
            PowerEvent::SessionActive
        } else {
            PowerEvent::SessionExpired
        }
    }
}

/// Panel work the power loop must do for a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerCommand {
    /// Nothing to draw
    None,
    /// Blank and put the panel to sleep
    Sleep,
    /// Re-initialize the panel, then do a full refresh
    WakeAndRedraw,
    /// Full refresh only
    Redraw,
}

impl PowerState {
    /// Check if the panel accepts drawing
    pub fn is_awake(&self) -> bool {
        matches!(self, PowerState::Awake)
    }

    /// Process an event and return the next state with the panel work it needs
    pub fn transition(self, event: PowerEvent) -> (Self, PowerCommand) {
        use PowerEvent::*;
        use PowerState::*;

        match (self, event) {
            (Awake, SessionActive) => (Awake, PowerCommand::Redraw),
            (Awake, SessionExpired) => (Asleep, PowerCommand::Sleep),
            (Asleep, SessionActive) => (Awake, PowerCommand::WakeAndRedraw),
            (Asleep, SessionExpired) => (Asleep, PowerCommand::None),
        }
    }
}
