//! Shared household context
//!
//! Everything both loops touch lives here and is handed to them by
//! reference: the record set, the display (behind its ownership mutex),
//! the display power state and the signals the loops use to nudge each
//! other.

use core::cell::Cell;

use chrono::NaiveDateTime;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};
use embassy_sync::signal::Signal;
use homagotchi_display::backend::FILL_WHITE;
use homagotchi_display::{Canvas, Frame, Panel, PanelError};
use log::{debug, info};

use super::roster::Roster;
use crate::config::HomagotchiConfig;
use crate::power::PowerState;

/// The panel together with its drawing surface
///
/// Only reachable through `Household::display`, so holding a `DisplaySlot`
/// means owning the display.
pub struct DisplaySlot<P> {
    panel: P,
    canvas: Canvas,
}

impl<P: Panel> DisplaySlot<P> {
    /// Wrap a panel
    pub fn new(panel: P) -> Self {
        Self {
            panel,
            canvas: Canvas::new(),
        }
    }

    /// The underlying panel
    pub fn panel(&self) -> &P {
        &self.panel
    }

    fn compose(&mut self, frame: &Frame) {
        self.canvas.clear_white();
        match frame.render(&mut self.canvas) {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }

    /// Full refresh
    pub async fn draw_full(&mut self, frame: &Frame) -> Result<(), PanelError> {
        self.compose(frame);
        let buffer = self.canvas.panel_buffer();
        self.panel.display_full(&buffer).await?;
        info!("Full refresh successful");
        Ok(())
    }

    /// Partial refresh
    pub async fn draw_partial(&mut self, frame: &Frame) -> Result<(), PanelError> {
        self.compose(frame);
        let buffer = self.canvas.panel_buffer();
        self.panel.display_partial(&buffer).await?;
        info!("Partial refresh successful");
        Ok(())
    }

    /// Initialize the panel and blank it
    pub async fn bring_up(&mut self) -> Result<(), PanelError> {
        self.panel.init().await?;
        self.panel.clear(FILL_WHITE).await
    }

    /// Blank the panel and put it to sleep
    pub(crate) async fn power_down(&mut self) -> Result<(), PanelError> {
        self.panel.clear(FILL_WHITE).await?;
        self.panel.sleep().await
    }

    /// Wake the panel from sleep
    pub(crate) async fn power_up(&mut self) -> Result<(), PanelError> {
        self.panel.init().await
    }

    /// Release the panel's pins and bus
    pub fn release(&mut self) {
        self.panel.release();
    }
}

/// State shared by the polling loop and the display power loop
pub struct Household<M: RawMutex, P> {
    roster: Roster<M>,
    display: Mutex<M, DisplaySlot<P>>,
    power: BlockingMutex<M, Cell<PowerState>>,
    animation_done: Signal<M, ()>,
    wake_request: Signal<M, ()>,
}

impl<M: RawMutex, P: Panel> Household<M, P> {
    /// Build the household for `config`, with the display assumed awake
    pub fn new(config: &HomagotchiConfig, panel: P, now: NaiveDateTime) -> Self {
        Self {
            roster: Roster::from_persons(&config.persons, now),
            display: Mutex::new(DisplaySlot::new(panel)),
            power: BlockingMutex::new(Cell::new(PowerState::Awake)),
            animation_done: Signal::new(),
            wake_request: Signal::new(),
        }
    }

    /// The tracked persons
    pub fn roster(&self) -> &Roster<M> {
        &self.roster
    }

    /// Current display power state
    pub fn power_state(&self) -> PowerState {
        self.power.lock(Cell::get)
    }

    pub(crate) fn set_power_state(&self, state: PowerState) {
        self.power.lock(|p| p.set(state));
    }

    /// Take ownership of the display, waiting for the current owner
    pub async fn display(&self) -> MutexGuard<'_, M, DisplaySlot<P>> {
        self.display.lock().await
    }

    /// Take ownership of the display only if it is free
    pub fn try_display(&self) -> Option<MutexGuard<'_, M, DisplaySlot<P>>> {
        self.display.try_lock().ok()
    }

    /// Initialize and blank the panel at startup
    pub async fn bring_up_display(&self) -> Result<(), PanelError> {
        self.display().await.bring_up().await?;
        self.set_power_state(PowerState::Awake);
        debug!("Display initialized");
        Ok(())
    }

    pub(crate) fn animation_finished(&self) {
        self.animation_done.signal(());
    }

    pub(crate) fn clear_animation_finished(&self) {
        self.animation_done.reset();
    }

    pub(crate) async fn animation_finished_signal(&self) {
        self.animation_done.wait().await;
    }

    /// Ask the power loop to run its next tick now
    pub fn request_wake(&self) {
        self.wake_request.signal(());
    }

    pub(crate) async fn wake_requested(&self) {
        self.wake_request.wait().await;
    }

    pub(crate) fn clear_wake_request(&self) {
        self.wake_request.reset();
    }
}
