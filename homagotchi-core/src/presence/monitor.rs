//! Presence monitor
//!
//! Probes one person, updates their record and classifies the change.
//! Probe failures stop here: they are logged and become absence.

use chrono::NaiveDateTime;
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;
use heapless::String;
use log::{debug, info};

use super::record::PresenceRecord;
use crate::config::ADDRESS_LEN;
use crate::state::Roster;
use crate::traits::{Clock, Probe, ProbeError};

/// Slack on top of the probe's own timeout before the monitor gives up on it
const PROBE_GRACE_MS: u32 = 500;

/// Outcome of one poll, relative to presence at poll entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Probe succeeded, was not home
    Arrived,
    /// Probe succeeded, was already home
    StillHome,
    /// Probe failed while home; a departure was recorded
    Left,
    /// Probe failed, was not home
    StillAway,
}

impl Transition {
    /// Check if the probe behind this transition succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, Transition::Arrived | Transition::StillHome)
    }
}

/// Apply a probe result to a record
///
/// Presence is evaluated at `now` before the record changes.
pub fn classify(
    record: &mut PresenceRecord,
    outcome: Result<(), ProbeError>,
    now: NaiveDateTime,
) -> Transition {
    let was_home = record.is_home(now);

    match outcome {
        Ok(()) => {
            record.record_seen(now);
            info!("{} was present at {}", record.name(), record.address());
            if was_home {
                Transition::StillHome
            } else {
                Transition::Arrived
            }
        }
        Err(e) => {
            debug!("Probe of {} failed: {:?}", record.address(), e);
            info!("{} was absent at {}", record.name(), record.address());
            if was_home {
                record.record_departure(now);
                Transition::Left
            } else {
                Transition::StillAway
            }
        }
    }
}

/// Reachability monitor for the tracked persons
pub struct PresenceMonitor<P, D> {
    probe: P,
    delay: D,
    timeout_ms: u32,
}

impl<P: Probe, D: DelayNs> PresenceMonitor<P, D> {
    /// Create a monitor with the given probe timeout
    pub fn new(probe: P, delay: D, timeout_ms: u32) -> Self {
        Self {
            probe,
            delay,
            timeout_ms,
        }
    }

    /// Probe one person and update their record
    ///
    /// The record lock is not held while the probe runs.
    pub async fn poll<M, C>(
        &mut self,
        roster: &Roster<M>,
        index: usize,
        clock: &C,
    ) -> Option<Transition>
    where
        M: RawMutex,
        C: Clock,
    {
        let address: String<ADDRESS_LEN> = roster.with_record(index, |r| {
            let mut address = String::new();
            let _ = address.push_str(r.address());
            address
        })?;

        let outcome = self.probe_once(address.as_str()).await;
        let now = clock.now();
        roster.with_record(index, |r| classify(r, outcome, now))
    }

    async fn probe_once(&mut self, address: &str) -> Result<(), ProbeError> {
        let budget = self.timeout_ms.saturating_add(PROBE_GRACE_MS);
        match select(
            self.probe.probe(address, self.timeout_ms),
            self.delay.delay_ms(budget),
        )
        .await
        {
            Either::First(outcome) => outcome,
            Either::Second(()) => Err(ProbeError::Timeout),
        }
    }
}
