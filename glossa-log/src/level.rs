//! Severity levels and output formats.

use std::fmt;
use std::str::FromStr;

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Level {
    /// Per-lookup detail
    Trace = 0,
    /// Catalog files tried, load summaries
    Debug = 1,
    Info = 2,
    /// Rejected catalogs, unusable `Plural-Forms`
    Warn = 3,
    Error = 4,
    /// Nothing is logged
    Off = 5,
}

const NAMES: [&str; 6] = ["TRACE", "DEBUG", "INFO", "WARN", "ERROR", "OFF"];

impl Level {
    /// Upper-case level name.
    pub fn as_str(self) -> &'static str {
        NAMES[self as usize]
    }

    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => Level::Trace,
            1 => Level::Debug,
            2 => Level::Info,
            3 => Level::Warn,
            4 => Level::Error,
            _ => Level::Off,
        }
    }

    /// The `log` crate's counterpart.
    pub fn to_log_filter(self) -> log::LevelFilter {
        match self {
            Level::Trace => log::LevelFilter::Trace,
            Level::Debug => log::LevelFilter::Debug,
            Level::Info => log::LevelFilter::Info,
            Level::Warn => log::LevelFilter::Warn,
            Level::Error => log::LevelFilter::Error,
            Level::Off => log::LevelFilter::Off,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Unrecognized level or format name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(pub String);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized value '{}'", self.0)
    }
}

impl std::error::Error for ParseError {}

impl FromStr for Level {
    type Err = ParseError;

    /// Case-insensitive; accepts `warning` and `none` as aliases.
    fn from_str(s: &str) -> Result<Self, ParseError> {
        let name = s.trim().to_ascii_uppercase();
        let name = match name.as_str() {
            "WARNING" => "WARN",
            "NONE" => "OFF",
            other => other,
        };
        NAMES
            .iter()
            .position(|candidate| *candidate == name)
            .map(|i| Level::from_u8(i as u8))
            .ok_or_else(|| ParseError(s.to_string()))
    }
}

/// Output format for log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `2026-01-01 12:00:00.000 WARN  [glossa::mo] message`
    Pretty,
    /// `12:00:00 W glossa::mo: message`
    Compact,
    /// One JSON object per line
    Json,
}

impl FromStr for Format {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, ParseError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Format::Pretty),
            "compact" => Ok(Format::Compact),
            "json" => Ok(Format::Json),
            _ => Err(ParseError(s.to_string())),
        }
    }
}
