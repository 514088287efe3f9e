//! Host time sources

use chrono::{Local, NaiveDateTime, Utc};
use embassy_time::Timer;
use embedded_hal_async::delay::DelayNs;

use homagotchi_core::traits::Clock;

/// System wall clock
///
/// Presence timestamps are UTC so a daylight-saving change never moves them
/// backwards; the screen shows local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().naive_utc()
    }

    fn display_time(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Delays on the embassy timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TimerDelay;

impl DelayNs for TimerDelay {
    async fn delay_ns(&mut self, ns: u32) {
        Timer::after_nanos(u64::from(ns)).await;
    }

    async fn delay_us(&mut self, us: u32) {
        Timer::after_micros(u64::from(us)).await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        Timer::after_millis(u64::from(ms)).await;
    }
}
