//! Event log
//!
//! Every record becomes one `[YYYY-MM-DD HH:MM:SS] message` line, printed
//! to stdout and appended to the persistent log file.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{Local, NaiveDateTime};
use log::{LevelFilter, Metadata, Record, SetLoggerError};
use static_cell::StaticCell;
use thiserror::Error;

use crate::config::{LoadError, OutputConfig};

static EVENT_LOG: StaticCell<EventLog> = StaticCell::new();

/// Logger setup errors
#[derive(Debug, Error)]
pub enum LogError {
    #[error("cannot open log file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Level(#[from] LoadError),

    #[error("event log already initialized")]
    AlreadyInitialized,

    #[error("another logger is already installed")]
    AlreadySet(#[from] SetLoggerError),
}

/// Timestamped line logger
pub struct EventLog {
    file: Mutex<File>,
    level: LevelFilter,
}

impl EventLog {
    /// Append to `path`, creating it if needed
    pub fn open(path: &Path, level: LevelFilter) -> Result<Self, LogError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| LogError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            file: Mutex::new(file),
            level,
        })
    }
}

/// Format one log line
pub fn format_line(time: NaiveDateTime, message: &fmt::Arguments<'_>) -> String {
    format!("[{}] {}", time.format("%Y-%m-%d %H:%M:%S"), message)
}

impl log::Log for EventLog {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = format_line(Local::now().naive_local(), record.args());
        println!("{}", line);
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{}", line);
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Install the event log as the global logger
///
/// Call once, before the loops start.
pub fn init(output: &OutputConfig) -> Result<(), LogError> {
    let level = output.level_filter()?;
    let logger: &'static EventLog = EVENT_LOG
        .try_init(EventLog::open(&output.log_file, level)?)
        .ok_or(LogError::AlreadyInitialized)?;
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}
