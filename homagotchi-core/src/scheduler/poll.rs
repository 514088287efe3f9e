//! Polling loop
//!
//! One tick walks the roster in order: probe, resolve the base face, then
//! play the animation if the trigger holds. Animations block the loop.

use core::convert::Infallible;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;
use homagotchi_display::{Panel, PanelError};
use log::info;

use crate::animation::{should_animate, AnimationSequencer, Playback};
use crate::config::TimingConfig;
use crate::presence::{face, PresenceMonitor, StatusCode, Transition};
use crate::state::Household;
use crate::traits::{Clock, Probe};

/// What happened to one person during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOutcome {
    /// Presence change observed by the probe
    pub transition: Transition,
    /// Base face after resolution
    pub status: StatusCode,
    /// Animation result, if the trigger held
    pub playback: Option<Playback>,
}

/// The polling loop and its collaborators
pub struct Scheduler<P, D> {
    monitor: PresenceMonitor<P, D>,
    sequencer: AnimationSequencer<D>,
    delay: D,
    poll_interval_ms: u32,
}

impl<P, D> Scheduler<P, D>
where
    P: Probe,
    D: DelayNs + Clone,
{
    /// Build the loop from a probe, a delay source and the timing settings
    pub fn new(probe: P, delay: D, timing: &TimingConfig) -> Self {
        Self {
            monitor: PresenceMonitor::new(probe, delay.clone(), timing.probe_timeout_ms),
            sequencer: AnimationSequencer::new(delay.clone(), timing.frame_delay_ms),
            delay,
            poll_interval_ms: timing.poll_interval_s.saturating_mul(1000),
        }
    }

    /// Poll one person
    ///
    /// Returns `None` if `index` is not in the roster.
    pub async fn poll_person<M, Pn, C>(
        &mut self,
        household: &Household<M, Pn>,
        index: usize,
        clock: &C,
    ) -> Result<Option<PollOutcome>, PanelError>
    where
        M: RawMutex,
        Pn: Panel,
        C: Clock,
    {
        let roster = household.roster();
        let Some((previous_seen, previously_seen)) =
            roster.with_record(index, |r| (r.last_seen_at(), r.ever_seen()))
        else {
            return Ok(None);
        };

        let Some(transition) = self.monitor.poll(roster, index, clock).await else {
            return Ok(None);
        };

        let now = clock.now();
        let resolved = roster.with_record(index, |r| {
            let status = face::apply(r, transition, now);
            if transition == Transition::Arrived {
                info!("{} was newly pinged at {}", r.name(), r.address());
            }
            let animate = should_animate(
                r.is_home(now),
                r.ever_seen() && !previously_seen,
                r.last_seen_at() != previous_seen,
            );
            if animate {
                info!("{} was pinged at {}", r.name(), r.address());
            }
            (status, animate)
        });
        let Some((status, animate)) = resolved else {
            return Ok(None);
        };

        if transition == Transition::Arrived && !household.power_state().is_awake() {
            household.request_wake();
        }

        let playback = if animate {
            Some(self.sequencer.play(household, index, transition, clock).await?)
        } else {
            None
        };

        Ok(Some(PollOutcome {
            transition,
            status,
            playback,
        }))
    }

    /// Poll every tracked person once, in roster order
    pub async fn tick<M, Pn, C>(
        &mut self,
        household: &Household<M, Pn>,
        clock: &C,
    ) -> Result<(), PanelError>
    where
        M: RawMutex,
        Pn: Panel,
        C: Clock,
    {
        for index in 0..household.roster().len() {
            self.poll_person(household, index, clock).await?;
        }
        Ok(())
    }

    /// Run the polling loop
    ///
    /// Each tick is followed by the full poll interval, so a slow tick
    /// pushes the next one back rather than dropping it.
    pub async fn run<M, Pn, C>(
        &mut self,
        household: &Household<M, Pn>,
        clock: &C,
    ) -> Result<Infallible, PanelError>
    where
        M: RawMutex,
        Pn: Panel,
        C: Clock,
    {
        loop {
            self.tick(household, clock).await?;
            self.delay.delay_ms(self.poll_interval_ms).await;
        }
    }
}
