//! Stderr logger behind the crate's `debug!`, `info!`, `warn!` and `error!` macros.
//!
//! Output is one line per message, optionally prefixed with a UTC timestamp
//! and the level tag. Filtering and prefixes are process-wide and set through
//! [`LogConfig::apply`].

use std::fmt::Display;
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Environment variable holding the minimum level (`debug|info|warn|error`).
pub const LEVEL_ENV: &str = "NEO_CODEC_LOG";
/// Environment variable that disables timestamps when set to `0`.
pub const TIMESTAMP_ENV: &str = "NEO_CODEC_LOG_TIMESTAMP";

/// Log level for filtering messages.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl Level {
    fn from_u8(value: u8) -> Level {
        match value {
            0 => Level::Debug,
            1 => Level::Info,
            2 => Level::Warn,
            _ => Level::Error,
        }
    }

    /// Parses a level name, case-insensitively.
    pub fn parse(name: &str) -> Option<Level> {
        match name.trim().to_ascii_lowercase().as_str() {
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" | "warning" => Some(Level::Warn),
            "error" => Some(Level::Error),
            _ => None,
        }
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Debug => write!(f, "DEBUG"),
            Level::Info => write!(f, "INFO"),
            Level::Warn => write!(f, "WARN"),
            Level::Error => write!(f, "ERROR"),
        }
    }
}

static MIN_LEVEL: AtomicU8 = AtomicU8::new(Level::Info as u8);
static SHOW_TIMESTAMP: AtomicBool = AtomicBool::new(true);
static SHOW_LEVEL: AtomicBool = AtomicBool::new(true);

/// Logger settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogConfig {
    /// Messages below this level are dropped.
    pub min_level: Level,
    pub show_timestamp: bool,
    pub show_level: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            min_level: Level::Info,
            show_timestamp: true,
            show_level: true,
        }
    }
}

impl LogConfig {
    /// Reads [`LEVEL_ENV`] and [`TIMESTAMP_ENV`], falling back to the defaults.
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var(LEVEL_ENV).ok().as_deref(),
            std::env::var(TIMESTAMP_ENV).ok().as_deref(),
        )
    }

    fn from_vars(level: Option<&str>, timestamp: Option<&str>) -> Self {
        let defaults = Self::default();
        Self {
            min_level: level.and_then(Level::parse).unwrap_or(defaults.min_level),
            show_timestamp: timestamp.map_or(defaults.show_timestamp, |v| v.trim() != "0"),
            show_level: defaults.show_level,
        }
    }

    /// Installs these settings process-wide.
    pub fn apply(&self) {
        MIN_LEVEL.store(self.min_level as u8, Ordering::Relaxed);
        SHOW_TIMESTAMP.store(self.show_timestamp, Ordering::Relaxed);
        SHOW_LEVEL.store(self.show_level, Ordering::Relaxed);
    }

    /// Settings currently in effect.
    pub fn current() -> Self {
        Self {
            min_level: Level::from_u8(MIN_LEVEL.load(Ordering::Relaxed)),
            show_timestamp: SHOW_TIMESTAMP.load(Ordering::Relaxed),
            show_level: SHOW_LEVEL.load(Ordering::Relaxed),
        }
    }
}

/// Returns whether messages at `level` pass the current filter.
pub fn enabled(level: Level) -> bool {
    level as u8 >= MIN_LEVEL.load(Ordering::Relaxed)
}

/// Converts days since Unix epoch to (year, month, day), proleptic Gregorian.
fn civil_from_days(days: u64) -> (u32, u32, u32) {
    let z = days as i64 + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097) as u32;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe as i64 + era * 400 + i64::from(month <= 2);
    (year as u32, month, day)
}

/// Formats a duration since the epoch as `YYYY-MM-DD HH:MM:SS.mmm`.
fn format_timestamp(since_epoch: Duration) -> String {
    let secs = since_epoch.as_secs();
    let (year, month, day) = civil_from_days(secs / 86_400);
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:03}",
        year,
        month,
        day,
        (secs / 3600) % 24,
        (secs / 60) % 60,
        secs % 60,
        since_epoch.subsec_millis()
    )
}

fn level_color(level: Level) -> ColorSpec {
    let mut spec = ColorSpec::new();
    match level {
        Level::Debug => {
            spec.set_fg(Some(Color::Cyan));
        }
        Level::Info => {}
        Level::Warn => {
            spec.set_fg(Some(Color::Yellow)).set_bold(true);
        }
        Level::Error => {
            spec.set_fg(Some(Color::Red)).set_bold(true);
        }
    }
    spec
}

/// Internal logging function. Use the level macros instead.
#[doc(hidden)]
pub fn log(level: Level, message: &str) {
    if !enabled(level) {
        return;
    }
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    let _ = stderr.set_color(&level_color(level));
    if SHOW_TIMESTAMP.load(Ordering::Relaxed) {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let _ = write!(stderr, "{} ", format_timestamp(now));
    }
    if SHOW_LEVEL.load(Ordering::Relaxed) {
        let _ = write!(stderr, "[{:5}] ", level);
    }
    let _ = writeln!(stderr, "{}", message);
    let _ = stderr.reset();
}

/// Logs a debug-level message.
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {{
        if cfg!(not(test)) {
            $crate::utils::log::log($crate::utils::log::Level::Debug, &format!($($arg)*))
        }
    }};
}

/// Logs an info-level message.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {{
        if cfg!(not(test)) {
            $crate::utils::log::log($crate::utils::log::Level::Info, &format!($($arg)*))
        }
    }};
}

/// Logs a warning-level message.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {{
        if cfg!(not(test)) {
            $crate::utils::log::log($crate::utils::log::Level::Warn, &format!($($arg)*))
        }
    }};
}

/// Logs an error-level message.
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {{
        if cfg!(not(test)) {
            $crate::utils::log::log($crate::utils::log::Level::Error, &format!($($arg)*))
        }
    }};
}
