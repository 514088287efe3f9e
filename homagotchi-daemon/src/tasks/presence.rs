//! Presence polling task
//!
//! Pings every tracked person each poll interval and plays the face
//! animation on success.

use homagotchi_core::config::TimingConfig;
use homagotchi_core::scheduler::Scheduler;
use log::{error, info};

use super::SharedHousehold;
use crate::channels::FATAL;
use crate::probe::PingProbe;
use crate::time::{SystemClock, TimerDelay};

#[embassy_executor::task]
pub async fn presence_task(
    household: &'static SharedHousehold,
    probe: PingProbe,
    timing: TimingConfig,
) {
    info!(
        "Presence polling started ({} tracked, every {}s)",
        household.roster().len(),
        timing.poll_interval_s
    );

    let mut scheduler = Scheduler::new(probe, TimerDelay, &timing);
    match scheduler.run(household, &SystemClock).await {
        Ok(never) => match never {},
        Err(e) => {
            error!("Presence loop stopped: {}", e);
            FATAL.signal(e);
        }
    }
}
