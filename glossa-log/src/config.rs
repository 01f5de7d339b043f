//! Environment-driven configuration.

use crate::level::{Format, Level};
use std::env;

/// Logging configuration, read once from `GLOSSA_*` variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `GLOSSA_DEBUG`: emit debug records regardless of level
    pub debug: bool,
    /// `GLOSSA_LOG_LEVEL`
    pub level: Level,
    /// `GLOSSA_LOG_FORMAT`
    pub format: Format,
    /// `GLOSSA_LOG_COLOR` (pretty format only)
    pub color: bool,
    /// `GLOSSA_LOG_TIMESTAMPS`
    pub timestamps: bool,
    /// `GLOSSA_LOG_MODULE`: include the record target
    pub show_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            debug: false,
            level: Level::Warn,
            format: Format::Compact,
            color: false,
            timestamps: true,
            show_target: true,
        }
    }
}

impl LogConfig {
    /// Read the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source; unparseable values keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |name: &str| {
            lookup(name).map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        };
        let defaults = Self::default();

        let debug = flag("GLOSSA_DEBUG").unwrap_or(defaults.debug);
        let level = lookup("GLOSSA_LOG_LEVEL")
            .and_then(|v| v.parse().ok())
            .unwrap_or(if debug { Level::Debug } else { defaults.level });

        Self {
            debug,
            level,
            format: lookup("GLOSSA_LOG_FORMAT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.format),
            color: flag("GLOSSA_LOG_COLOR")
                .unwrap_or_else(|| lookup("NO_COLOR").is_none() && lookup("TERM").is_some()),
            timestamps: flag("GLOSSA_LOG_TIMESTAMPS").unwrap_or(defaults.timestamps),
            show_target: flag("GLOSSA_LOG_MODULE").unwrap_or(defaults.show_target),
        }
    }
}
