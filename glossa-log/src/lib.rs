//! Glossa Logging
//!
//! Leveled logging for the glossa translation runtime.
//!
//! A translation layer runs inside other programs, so it stays quiet by
//! default: only warnings and errors are emitted until the embedding
//! application raises the level with [`set_level`], [`set_debug`], or
//! [`init`] plus the environment.
//!
//! # Usage
//!
//! ```rust
//! use glossa_log::{debug, targets, warn};
//!
//! let path = "/usr/share/locale/fr/LC_MESSAGES/app.mo";
//! debug!(target: targets::DECODER, "opening catalog {}", path);
//! warn!("ignoring Plural-Forms header in {}", path);
//! ```
//!
//! # Environment Variables
//!
//! Read by [`init`]:
//!
//! - `GLOSSA_DEBUG=1` - Enable debug records
//! - `GLOSSA_LOG_LEVEL=trace|debug|info|warn|error|off` - Minimum level
//! - `GLOSSA_LOG_FORMAT=pretty|compact|json` - Output format
//! - `GLOSSA_LOG_COLOR=1|0` - Colored levels in pretty output
//! - `GLOSSA_LOG_TIMESTAMPS=1|0` - Timestamp prefix
//! - `GLOSSA_LOG_MODULE=1|0` - Include the record target
//!
//! Records are written to stderr and also forwarded to the `log` facade
//! when the host has installed a logger.

mod config;
mod level;
mod output;

pub use config::LogConfig;
pub use level::{Format, Level, ParseError};
pub use output::Record;

use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// Log targets used by the runtime.
pub mod targets {
    /// Binary catalog decoding.
    pub const DECODER: &str = "glossa::mo";
    /// Catalog loading and lookups.
    pub const CATALOG: &str = "glossa::catalog";
    /// Plural expression compilation and evaluation.
    pub const PLURAL: &str = "glossa::plural";
    /// Domain registry.
    pub const REGISTRY: &str = "glossa::registry";
}

static CONFIG: Lazy<LogConfig> = Lazy::new(LogConfig::from_env);

static MIN_LEVEL: AtomicU8 = AtomicU8::new(Level::Warn as u8);

static DEBUG: AtomicBool = AtomicBool::new(false);

/// Apply the environment's level and debug flag to the global filter.
///
/// Without this call the filter stays at `warn` until changed at runtime.
pub fn init() {
    let config = config();
    DEBUG.store(config.debug, Ordering::SeqCst);
    MIN_LEVEL.store(config.level as u8, Ordering::SeqCst);
}

/// The environment configuration (format, color, timestamps).
pub fn config() -> &'static LogConfig {
    &CONFIG
}

/// Whether debug records are forced on.
#[inline]
pub fn is_debug_enabled() -> bool {
    DEBUG.load(Ordering::Relaxed)
}

/// Whether records at `level` pass the filter.
#[inline]
pub fn is_level_enabled(level: Level) -> bool {
    level != Level::Off
        && (level as u8 >= MIN_LEVEL.load(Ordering::Relaxed)
            || (level == Level::Debug && is_debug_enabled()))
}

pub fn current_level() -> Level {
    Level::from_u8(MIN_LEVEL.load(Ordering::Relaxed))
}

pub fn set_level(level: Level) {
    MIN_LEVEL.store(level as u8, Ordering::SeqCst);
}

/// Force debug records on or off. Enabling also lowers the level to debug.
pub fn set_debug(enabled: bool) {
    DEBUG.store(enabled, Ordering::SeqCst);
    if enabled && current_level() > Level::Debug {
        set_level(Level::Debug);
    }
}

/// Emit a record that passed the filter. Used by the macros.
#[doc(hidden)]
pub fn emit(level: Level, target: &str, message: std::fmt::Arguments<'_>) {
    if let Some(lvl) = level.to_log_filter().to_level() {
        if lvl <= log::max_level() {
            log::log!(target: target, lvl, "{}", message);
        }
    }

    let message = message.to_string();
    let record = Record {
        level,
        target,
        message: &message,
    };
    let _ = record.write_to(&mut std::io::stderr().lock(), config());
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log {
    ($level:expr, target: $target:expr, $($arg:tt)+) => {
        if $crate::is_level_enabled($level) {
            $crate::emit($level, $target, format_args!($($arg)+));
        }
    };
    ($level:expr, $($arg:tt)+) => {
        $crate::__log!($level, target: module_path!(), $($arg)+)
    };
}

/// Log at trace level, with an optional `target:`.
#[macro_export]
macro_rules! trace {
    ($($arg:tt)+) => { $crate::__log!($crate::Level::Trace, $($arg)+) };
}

/// Log at debug level, with an optional `target:`.
///
/// Emitted when `GLOSSA_DEBUG=1` or the level is `debug` or lower.
///
/// ```rust
/// use glossa_log::debug;
///
/// let variant = "fr_FR";
/// debug!(target: "glossa::catalog", "trying variant {}", variant);
/// ```
#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => { $crate::__log!($crate::Level::Debug, $($arg)+) };
}

/// Log at info level, with an optional `target:`.
#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => { $crate::__log!($crate::Level::Info, $($arg)+) };
}

/// Log at warn level, with an optional `target:`.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => { $crate::__log!($crate::Level::Warn, $($arg)+) };
}

/// Log at error level, with an optional `target:`.
#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => { $crate::__log!($crate::Level::Error, $($arg)+) };
}

#[cfg(feature = "tracing")]
pub mod tracing_compat {
    //! A `tracing` subscriber following the glossa configuration.

    use super::config;

    /// Subscriber filtered at the configured level unless `RUST_LOG` is set.
    pub fn subscriber() -> impl tracing::Subscriber {
        use tracing_subscriber::prelude::*;
        use tracing_subscriber::{EnvFilter, fmt};

        let config = config();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.level.as_str().to_ascii_lowercase()));

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_ansi(config.color).with_writer(std::io::stderr))
    }
}
