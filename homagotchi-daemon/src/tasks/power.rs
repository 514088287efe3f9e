//! Display power task
//!
//! Full redraw every refresh interval; sleeps the panel when the house has
//! been empty for a session window and wakes it on return.

use homagotchi_core::config::TimingConfig;
use homagotchi_core::power::DisplayPowerManager;
use log::{error, info};

use super::SharedHousehold;
use crate::channels::FATAL;
use crate::time::{SystemClock, TimerDelay};

#[embassy_executor::task]
pub async fn power_task(household: &'static SharedHousehold, timing: TimingConfig) {
    info!(
        "Display power loop started ({}s refresh)",
        timing.refresh_interval_s
    );

    let mut manager = DisplayPowerManager::new(TimerDelay, &timing);
    match manager.run(household, &SystemClock).await {
        Ok(never) => match never {},
        Err(e) => {
            error!("Display power loop stopped: {}", e);
            FATAL.signal(e);
        }
    }
}
