//! Embassy async tasks
//!
//! The two household loops. Each runs until a display error stops it, then
//! hands the error to `main` through `FATAL`.

pub mod power;
pub mod presence;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use homagotchi_core::state::Household;

use crate::panel::PbmPanel;

pub use power::power_task;
pub use presence::presence_task;

/// The household context shared by both tasks
pub type SharedHousehold = Household<CriticalSectionRawMutex, PbmPanel>;
