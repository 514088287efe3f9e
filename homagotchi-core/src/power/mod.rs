//! Display power management
//!
//! Edge-triggered sleep/wake of the panel and the periodic full redraw.

pub mod machine;
pub mod manager;

pub use machine::{PowerCommand, PowerEvent, PowerState};
pub use manager::DisplayPowerManager;
