//! Configuration and CLI argument handling

use crate::countdown::{DEFAULT_INTERVAL, ONE_HOUR_MS};
use crate::hourglass::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Smallest hourglass that still shows a recognisable shape.
pub const MIN_WIDTH: usize = 6;
/// Smallest hourglass height, in rows.
pub const MIN_HEIGHT: usize = 4;

/// Errors raised while validating settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Hourglass too narrow or too short to draw.
    #[error("hourglass size {width}x{height} is too small (minimum {}x{})", MIN_WIDTH, MIN_HEIGHT)]
    CanvasTooSmall {
        /// Requested columns.
        width: usize,
        /// Requested rows.
        height: usize,
    },
    /// Tick interval of zero.
    #[error("tick interval must be at least 1 ms")]
    ZeroTickInterval,
    /// Initial time of an hour or more.
    #[error("initial time {minutes}m{seconds}s must be less than one hour")]
    InitialTimeOutOfRange {
        /// Requested minutes.
        minutes: u64,
        /// Requested seconds.
        seconds: u64,
    },
}

/// Validated runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Target time the panel starts at.
    pub initial_ms: u64,
    /// Countdown cadence.
    pub tick: Duration,
    /// Hourglass columns.
    pub width: usize,
    /// Hourglass rows.
    pub height: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            initial_ms: 0,
            tick: DEFAULT_INTERVAL,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl Settings {
    /// Builds settings, rejecting values the timer cannot use.
    ///
    /// ```rust
    /// use hourglass_timer::config::{ConfigError, Settings};
    /// use std::time::Duration;
    ///
    /// let settings = Settings::new(1, 30, Duration::from_millis(100), 24, 16).unwrap();
    /// assert_eq!(settings.initial_ms, 90_000);
    ///
    /// let err = Settings::new(60, 0, Duration::from_millis(100), 24, 16).unwrap_err();
    /// assert!(matches!(err, ConfigError::InitialTimeOutOfRange { .. }));
    /// ```
    pub fn new(
        minutes: u64,
        seconds: u64,
        tick: Duration,
        width: usize,
        height: usize,
    ) -> Result<Self, ConfigError> {
        if width < MIN_WIDTH || height < MIN_HEIGHT {
            return Err(ConfigError::CanvasTooSmall { width, height });
        }
        if tick.as_millis() == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        let initial_ms = minutes
            .checked_mul(60_000)
            .and_then(|m| seconds.checked_mul(1000).and_then(|s| m.checked_add(s)))
            .filter(|ms| *ms < ONE_HOUR_MS)
            .ok_or(ConfigError::InitialTimeOutOfRange { minutes, seconds })?;

        Ok(Self {
            initial_ms,
            tick,
            width,
            height,
        })
    }
}

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "hourglass")]
#[command(about = "A countdown timer drawn as an animated hourglass")]
#[command(version)]
pub struct Cli {
    /// Minutes to start the timer at
    #[arg(short, long, default_value = "0")]
    pub minutes: u64,

    /// Seconds to start the timer at
    #[arg(short, long, default_value = "0")]
    pub seconds: u64,

    /// Hourglass width in terminal columns
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: usize,

    /// Hourglass height in terminal rows
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: usize,

    /// Countdown tick interval in milliseconds
    #[arg(long, default_value = "100")]
    pub tick_ms: u64,

    /// Log file path (defaults to the user cache directory)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Validate the arguments into runtime settings
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        Settings::new(
            self.minutes,
            self.seconds,
            Duration::from_millis(self.tick_ms),
            self.width,
            self.height,
        )
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Where logs are written: the explicit path, or `hourglass.log` in the
    /// cache directory. `None` when no cache directory is known.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file.clone().or_else(|| {
            dirs::cache_dir().map(|dir| dir.join("hourglass-timer").join("hourglass.log"))
        })
    }
}
