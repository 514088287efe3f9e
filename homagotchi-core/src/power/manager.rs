//! Display power loop
//!
//! Runs on its own cadence next to the polling loop. Each tick decides
//! between sleep, wake and redraw while owning the display.

use core::convert::Infallible;

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;
use homagotchi_display::{Panel, PanelError};
use log::{debug, info};

use super::machine::{PowerCommand, PowerEvent, PowerState};
use crate::config::TimingConfig;
use crate::presence::SESSION_WINDOW_S;
use crate::state::Household;
use crate::traits::Clock;

/// Periodic display power manager
pub struct DisplayPowerManager<D> {
    delay: D,
    interval_ms: u32,
    defer_bound_ms: u32,
}

impl<D: DelayNs> DisplayPowerManager<D> {
    /// Create a manager with the configured refresh cadence and deferral bound
    pub fn new(delay: D, timing: &TimingConfig) -> Self {
        Self {
            delay,
            interval_ms: timing.refresh_interval_s.saturating_mul(1000),
            defer_bound_ms: timing.defer_bound_ms,
        }
    }

    /// Wait until no face slot is owned by an animation
    ///
    /// Each wait ends on the "animation finished" signal or after the
    /// deferral bound, whichever comes first.
    async fn defer_to_animation<M: RawMutex, P: Panel>(&mut self, household: &Household<M, P>) {
        loop {
            household.clear_animation_finished();
            if !household.roster().any_animating() {
                return;
            }
            debug!("Animation in progress, deferring display refresh");
            let _ = select(
                household.animation_finished_signal(),
                self.delay.delay_ms(self.defer_bound_ms),
            )
            .await;
        }
    }

    /// Run one power tick
    ///
    /// Returns the power state after the tick.
    pub async fn tick<M, P, C>(
        &mut self,
        household: &Household<M, P>,
        clock: &C,
    ) -> Result<PowerState, PanelError>
    where
        M: RawMutex,
        P: Panel,
        C: Clock,
    {
        self.defer_to_animation(household).await;

        let mut display = household.display().await;
        household.clear_wake_request();

        let now = clock.now();
        let recently_home = household.roster().any_seen_within(now, SESSION_WINDOW_S);
        let event = PowerEvent::from_session(recently_home);
        let (next, command) = household.power_state().transition(event);

        match command {
            PowerCommand::None => {}
            PowerCommand::Sleep => {
                info!("No one home for 30 minutes. Putting display to sleep.");
                display.power_down().await?;
            }
            PowerCommand::WakeAndRedraw => {
                info!("Someone has returned home. Waking display.");
                display.power_up().await?;
                display.draw_full(&household.roster().frame(clock.display_time())).await?;
            }
            PowerCommand::Redraw => {
                display.draw_full(&household.roster().frame(clock.display_time())).await?;
            }
        }

        household.set_power_state(next);
        Ok(next)
    }

    /// Run the power loop
    ///
    /// Ticks immediately, then once per refresh interval. A wake request
    /// from the polling loop cuts the wait short.
    pub async fn run<M, P, C>(
        &mut self,
        household: &Household<M, P>,
        clock: &C,
    ) -> Result<Infallible, PanelError>
    where
        M: RawMutex,
        P: Panel,
        C: Clock,
    {
        loop {
            self.tick(household, clock).await?;

            match select(self.delay.delay_ms(self.interval_ms), household.wake_requested()).await {
                Either::First(()) => {}
                Either::Second(()) => debug!("Wake requested, running power tick early"),
            }
        }
    }
}
