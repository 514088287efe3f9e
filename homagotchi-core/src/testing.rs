//! Host test doubles
//!
//! A simulated wall clock with cooperative sleepers, plus scripted probe and
//! panel fakes. Everything is single threaded and driven by
//! `embassy_futures::block_on`.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use embassy_futures::yield_now;
use embedded_hal_async::delay::DelayNs;
use homagotchi_display::{Panel, PanelBuffer, PanelError};

use crate::config::{HomagotchiConfig, PersonConfig, TimingConfig};
use crate::presence::StatusCode;
use crate::traits::{Clock, Probe, ProbeError};

/// Polls with an unchanged sleeper set before time is advanced
const SETTLE_ROUNDS: u32 = 3;

/// Fixed boot time: Monday 6 January 2025, noon
pub fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 6)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap()
}

/// A person whose probe address is their name
pub fn person(name: &str) -> PersonConfig {
    PersonConfig::new(name, name, StatusCode::Away)
}

/// A household of `names` with default timing
pub fn household_config(names: &[&str]) -> HomagotchiConfig {
    HomagotchiConfig {
        persons: names.iter().map(|n| person(n)).collect(),
        timing: TimingConfig::default(),
    }
}

/// Simulated wall clock
///
/// Time only moves when `drive_for` advances it to the earliest pending
/// sleeper deadline, once every other future has settled.
pub struct SimClock {
    now: Cell<NaiveDateTime>,
    sleepers: RefCell<Vec<(u64, NaiveDateTime)>>,
    next_id: Cell<u64>,
    generation: Cell<u64>,
}

impl SimClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            now: Cell::new(start),
            sleepers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
            generation: Cell::new(0),
        }
    }

    /// Jump to `time` directly
    pub fn set(&self, time: NaiveDateTime) {
        self.now.set(time);
        self.bump();
    }

    fn bump(&self) {
        self.generation.set(self.generation.get() + 1);
    }

    fn register(&self, deadline: NaiveDateTime) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.sleepers.borrow_mut().push((id, deadline));
        self.bump();
        id
    }

    fn unregister(&self, id: u64) {
        self.sleepers.borrow_mut().retain(|(i, _)| *i != id);
        self.bump();
    }

    fn next_deadline(&self) -> Option<NaiveDateTime> {
        self.sleepers.borrow().iter().map(|(_, d)| *d).min()
    }

    /// Sleep until the simulated time reaches `now + duration`
    pub async fn sleep(&self, duration: TimeDelta) {
        let deadline = self.now() + duration;
        let _guard = SleepGuard {
            clock: self,
            id: self.register(deadline),
        };
        while self.now() < deadline {
            yield_now().await;
        }
    }

    /// Advance time from sleeper to sleeper for up to `secs` seconds
    ///
    /// Returns once nothing is sleeping or the next deadline lies past the
    /// end of the window.
    pub async fn drive_for(&self, secs: i64) {
        let end = self.now() + TimeDelta::seconds(secs);
        let mut seen = self.generation.get();
        let mut stable = 0;

        loop {
            yield_now().await;

            let generation = self.generation.get();
            if generation != seen {
                seen = generation;
                stable = 0;
                continue;
            }
            stable += 1;
            if stable < SETTLE_ROUNDS {
                continue;
            }

            match self.next_deadline() {
                Some(deadline) if deadline <= end => {
                    if deadline > self.now() {
                        self.now.set(deadline);
                    }
                    stable = 0;
                }
                _ => return,
            }
        }
    }
}

impl Clock for SimClock {
    fn now(&self) -> NaiveDateTime {
        self.now.get()
    }
}

struct SleepGuard<'a> {
    clock: &'a SimClock,
    id: u64,
}

impl Drop for SleepGuard<'_> {
    fn drop(&mut self) {
        self.clock.unregister(self.id);
    }
}

/// Delay source backed by a `SimClock`
#[derive(Clone, Copy)]
pub struct SimDelay<'a> {
    clock: &'a SimClock,
}

impl<'a> SimDelay<'a> {
    pub fn new(clock: &'a SimClock) -> Self {
        Self { clock }
    }
}

impl DelayNs for SimDelay<'_> {
    async fn delay_ns(&mut self, ns: u32) {
        self.clock.sleep(TimeDelta::nanoseconds(i64::from(ns))).await;
    }

    async fn delay_us(&mut self, us: u32) {
        self.clock.sleep(TimeDelta::microseconds(i64::from(us))).await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.clock.sleep(TimeDelta::milliseconds(i64::from(ms))).await;
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Reply {
    Up,
    Down,
    Hang,
}

/// Scripted network: which addresses answer
///
/// Unknown addresses are unreachable.
#[derive(Default)]
pub struct Reachability {
    replies: RefCell<HashMap<String, Reply>>,
    calls: Cell<usize>,
}

impl Reachability {
    pub fn set(&self, address: &str, up: bool) {
        let reply = if up { Reply::Up } else { Reply::Down };
        self.replies.borrow_mut().insert(address.to_string(), reply);
    }

    /// Make probes of `address` never complete
    pub fn hang(&self, address: &str) {
        self.replies.borrow_mut().insert(address.to_string(), Reply::Hang);
    }

    /// Number of probes issued so far
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    fn reply(&self, address: &str) -> Reply {
        self.calls.set(self.calls.get() + 1);
        self.replies
            .borrow()
            .get(address)
            .copied()
            .unwrap_or(Reply::Down)
    }
}

/// Probe answering from a `Reachability` script
pub struct ScriptedProbe<'a> {
    reach: &'a Reachability,
}

impl<'a> ScriptedProbe<'a> {
    pub fn new(reach: &'a Reachability) -> Self {
        Self { reach }
    }
}

impl Probe for ScriptedProbe<'_> {
    async fn probe(&mut self, address: &str, _timeout_ms: u32) -> Result<(), ProbeError> {
        match self.reach.reply(address) {
            Reply::Up => Ok(()),
            Reply::Down => Err(ProbeError::Unreachable),
            Reply::Hang => core::future::pending().await,
        }
    }
}

/// Panel operation, as seen by the recording panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelOp {
    Init,
    Clear(u8),
    Sleep,
    Full,
    Partial,
}

struct Entry {
    op: PanelOp,
    at: NaiveDateTime,
    buffer: Option<Vec<u8>>,
}

/// Panel that journals every call with the simulated time
pub struct RecordingPanel<'a> {
    clock: &'a SimClock,
    journal: Vec<Entry>,
    fail_on: Option<PanelOp>,
    released: usize,
}

impl<'a> RecordingPanel<'a> {
    pub fn new(clock: &'a SimClock) -> Self {
        Self {
            clock,
            journal: Vec::new(),
            fail_on: None,
            released: 0,
        }
    }

    /// Fail every call of kind `op` with a communication error
    pub fn failing_on(mut self, op: PanelOp) -> Self {
        self.fail_on = Some(op);
        self
    }

    pub fn ops(&self) -> Vec<PanelOp> {
        self.journal.iter().map(|e| e.op).collect()
    }

    pub fn count(&self, op: PanelOp) -> usize {
        self.journal.iter().filter(|e| e.op == op).count()
    }

    pub fn times_of(&self, op: PanelOp) -> Vec<NaiveDateTime> {
        self.journal
            .iter()
            .filter(|e| e.op == op)
            .map(|e| e.at)
            .collect()
    }

    pub fn buffers_of(&self, op: PanelOp) -> Vec<Vec<u8>> {
        self.journal
            .iter()
            .filter(|e| e.op == op)
            .filter_map(|e| e.buffer.clone())
            .collect()
    }

    pub fn released(&self) -> usize {
        self.released
    }

    fn record(&mut self, op: PanelOp, buffer: Option<&PanelBuffer>) -> Result<(), PanelError> {
        if self.fail_on == Some(op) {
            return Err(PanelError::Communication);
        }
        self.journal.push(Entry {
            op,
            at: self.clock.now(),
            buffer: buffer.map(|b| b.to_vec()),
        });
        Ok(())
    }
}

impl Panel for RecordingPanel<'_> {
    async fn init(&mut self) -> Result<(), PanelError> {
        self.record(PanelOp::Init, None)
    }

    async fn clear(&mut self, fill: u8) -> Result<(), PanelError> {
        self.record(PanelOp::Clear(fill), None)
    }

    async fn sleep(&mut self) -> Result<(), PanelError> {
        self.record(PanelOp::Sleep, None)
    }

    async fn display_full(&mut self, buffer: &PanelBuffer) -> Result<(), PanelError> {
        self.record(PanelOp::Full, Some(buffer))
    }

    async fn display_partial(&mut self, buffer: &PanelBuffer) -> Result<(), PanelError> {
        self.record(PanelOp::Partial, Some(buffer))
    }

    fn release(&mut self) {
        self.released += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use embassy_futures::join::join3;

    #[test]
    fn test_sim_clock_wakes_sleepers_in_order() {
        let clock = SimClock::new(t0());
        let order = RefCell::new(Vec::new());
        let a = async {
            clock.sleep(TimeDelta::seconds(2)).await;
            order.borrow_mut().push(("a", clock.now()));
        };
        let b = async {
            clock.sleep(TimeDelta::seconds(1)).await;
            order.borrow_mut().push(("b", clock.now()));
        };
        block_on(join3(a, b, clock.drive_for(10)));

        assert_eq!(
            order.into_inner(),
            vec![
                ("b", t0() + TimeDelta::seconds(1)),
                ("a", t0() + TimeDelta::seconds(2)),
            ]
        );
    }
}
