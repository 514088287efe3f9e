//! Configuration type definitions
//!
//! These types represent the household configuration. The binary reads them
//! from TOML at startup; nothing changes them afterwards.

use heapless::{String, Vec};

use crate::presence::StatusCode;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum tracked persons (the screen has two columns)
pub const MAX_PERSONS: usize = homagotchi_display::MAX_TILES;

/// Maximum display name length
pub const NAME_LEN: usize = homagotchi_display::NAME_LEN;

/// Maximum probe address length (hostname or IP literal)
pub const ADDRESS_LEN: usize = 40;

/// Animation frames per sequence, used to bound the frame delay
const ANIMATION_FRAMES: u32 = 5;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No persons configured
    NoPersons,
    /// A person has an empty display name
    EmptyName,
    /// A person has an empty probe address
    EmptyAddress,
    /// An interval or delay is zero
    ZeroInterval,
    /// The animation would outlast the polling interval
    AnimationTooLong,
    /// Initial status is not `away` or `home`
    InvalidInitialStatus,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            ConfigError::NoPersons => "at least one person must be configured",
            ConfigError::EmptyName => "person name must not be empty",
            ConfigError::EmptyAddress => "person address must not be empty",
            ConfigError::ZeroInterval => "intervals and delays must be non-zero",
            ConfigError::AnimationTooLong => "animation frames would outlast the poll interval",
            ConfigError::InvalidInitialStatus => "initial status must be away or home",
        };
        f.write_str(msg)
    }
}

/// One tracked person
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PersonConfig {
    /// Display label
    pub name: String<NAME_LEN>,
    /// Probe target (IP address or hostname)
    pub address: String<ADDRESS_LEN>,
    /// Status shown before the first poll
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: StatusCode,
}

impl PersonConfig {
    /// Build a person entry, truncating over-long fields
    pub fn new(name: &str, address: &str, status: StatusCode) -> Self {
        Self {
            name: truncated(name),
            address: truncated(address),
            status,
        }
    }
}

/// Loop cadences and timeouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimingConfig {
    /// Presence polling cadence (seconds)
    pub poll_interval_s: u32,
    /// Display power/refresh cadence (seconds)
    pub refresh_interval_s: u32,
    /// Delay between animation frames (milliseconds)
    pub frame_delay_ms: u32,
    /// Longest the refresh loop waits before re-checking a running animation (milliseconds)
    pub defer_bound_ms: u32,
    /// Reachability probe timeout (milliseconds)
    pub probe_timeout_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            poll_interval_s: 30,
            refresh_interval_s: 300,
            frame_delay_ms: 300,
            defer_bound_ms: 1000,
            probe_timeout_ms: 1000,
        }
    }
}

/// Complete household configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomagotchiConfig {
    /// Tracked persons, left to right on screen
    pub persons: Vec<PersonConfig, MAX_PERSONS>,
    /// Loop timing
    pub timing: TimingConfig,
}

impl HomagotchiConfig {
    /// Check the configuration for values the loops cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.persons.is_empty() {
            return Err(ConfigError::NoPersons);
        }

        for person in &self.persons {
            if person.name.trim().is_empty() {
                return Err(ConfigError::EmptyName);
            }
            if person.address.trim().is_empty() {
                return Err(ConfigError::EmptyAddress);
            }
            if !matches!(person.status, StatusCode::Away | StatusCode::Home) {
                return Err(ConfigError::InvalidInitialStatus);
            }
        }

        let t = &self.timing;
        if t.poll_interval_s == 0
            || t.refresh_interval_s == 0
            || t.frame_delay_ms == 0
            || t.defer_bound_ms == 0
            || t.probe_timeout_ms == 0
        {
            return Err(ConfigError::ZeroInterval);
        }

        let animation_ms = u64::from(t.frame_delay_ms) * u64::from(ANIMATION_FRAMES);
        if animation_ms >= u64::from(t.poll_interval_s) * 1000 {
            return Err(ConfigError::AnimationTooLong);
        }

        Ok(())
    }
}

fn truncated<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
