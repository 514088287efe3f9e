//! TOML configuration loader

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;

use homagotchi_core::config::{
    ConfigError, HomagotchiConfig, PersonConfig, TimingConfig, MAX_PERSONS,
};

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "homagotchi.toml";

/// Built-in household, used when no file is found
const EMBEDDED_CONFIG: &str = include_str!("../../homagotchi.toml");

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {origin}: {source}")]
    Toml {
        origin: ConfigSource,
        #[source]
        source: toml::de::Error,
    },

    #[error("{count} persons configured, the display has room for {max}", max = MAX_PERSONS)]
    TooManyPersons { count: usize },

    #[error("unknown log level {0:?}")]
    LogLevel(String),

    #[error("invalid configuration: {0}")]
    Invalid(ConfigError),
}

/// Where the configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Embedded,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Embedded => f.write_str("built-in defaults"),
        }
    }
}

/// Log and frame output settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Persistent event log
    pub log_file: PathBuf,
    /// `error`, `warn`, `info`, `debug`, `trace` or `off`
    pub log_level: String,
    /// Image written by the file panel backend
    pub frame_file: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from("hg.log"),
            log_level: String::from("info"),
            frame_file: PathBuf::from("homagotchi.pbm"),
        }
    }
}

impl OutputConfig {
    /// Parsed log level
    pub fn level_filter(&self) -> Result<LevelFilter, LoadError> {
        self.log_level
            .parse()
            .map_err(|_| LoadError::LogLevel(self.log_level.clone()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(rename = "person", default)]
    persons: Vec<PersonConfig>,
    #[serde(default)]
    timing: TimingConfig,
    #[serde(default)]
    output: OutputConfig,
}

/// Everything the daemon reads at startup
#[derive(Debug, Clone)]
pub struct Settings {
    pub household: HomagotchiConfig,
    pub output: OutputConfig,
    pub source: ConfigSource,
}

/// Parse and validate a configuration document
pub fn parse(text: &str, source: ConfigSource) -> Result<Settings, LoadError> {
    let file: ConfigFile = match toml::from_str(text) {
        Ok(file) => file,
        Err(e) => {
            return Err(LoadError::Toml {
                origin: source,
                source: e,
            })
        }
    };

    let count = file.persons.len();
    let persons = heapless::Vec::from_slice(&file.persons)
        .map_err(|()| LoadError::TooManyPersons { count })?;

    let household = HomagotchiConfig {
        persons,
        timing: file.timing,
    };
    household.validate().map_err(LoadError::Invalid)?;
    file.output.level_filter()?;

    Ok(Settings {
        household,
        output: file.output,
        source,
    })
}

/// Load the configuration
///
/// `explicit` (from `--config` or `HOMAGOTCHI_CONFIG`) must exist. Without
/// it, `homagotchi.toml` in the working directory is used if present,
/// otherwise the built-in household.
pub fn load(explicit: Option<&Path>) -> Result<Settings, LoadError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let local = PathBuf::from(DEFAULT_CONFIG_PATH);
            if !local.exists() {
                return parse(EMBEDDED_CONFIG, ConfigSource::Embedded);
            }
            local
        }
    };

    let text = fs::read_to_string(&path).map_err(|source| LoadError::Io {
        path: path.clone(),
        source,
    })?;
    parse(&text, ConfigSource::File(path))
}
