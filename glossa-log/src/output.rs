//! Record rendering.

use crate::config::LogConfig;
use crate::level::{Format, Level};
use std::io::{self, Write};

/// One log record, ready to be written.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    pub level: Level,
    pub target: &'a str,
    pub message: &'a str,
}

impl Record<'_> {
    /// Render in the configured format, newline-terminated.
    pub fn write_to(&self, out: &mut impl Write, config: &LogConfig) -> io::Result<()> {
        match config.format {
            Format::Pretty => self.write_pretty(out, config),
            Format::Compact => self.write_compact(out, config),
            Format::Json => self.write_json(out, config),
        }
    }

    fn write_pretty(&self, out: &mut impl Write, config: &LogConfig) -> io::Result<()> {
        if config.timestamps {
            write!(out, "{} ", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))?;
        }

        #[cfg(feature = "color")]
        {
            if config.color {
                write!(out, "{:5} ", colored_level(self.level))?;
            } else {
                write!(out, "{:5} ", self.level)?;
            }
        }
        #[cfg(not(feature = "color"))]
        write!(out, "{:5} ", self.level)?;

        if config.show_target && !self.target.is_empty() {
            write!(out, "[{}] ", self.target)?;
        }
        writeln!(out, "{}", self.message)
    }

    fn write_compact(&self, out: &mut impl Write, config: &LogConfig) -> io::Result<()> {
        if config.timestamps {
            write!(out, "{} ", chrono::Local::now().format("%H:%M:%S"))?;
        }
        write!(out, "{} ", &self.level.as_str()[..1])?;
        if config.show_target && !self.target.is_empty() {
            write!(out, "{}: ", self.target)?;
        }
        writeln!(out, "{}", self.message)
    }

    #[cfg(feature = "json")]
    fn write_json(&self, out: &mut impl Write, config: &LogConfig) -> io::Result<()> {
        let mut object = serde_json::Map::new();
        if config.timestamps {
            object.insert("timestamp".into(), chrono::Utc::now().to_rfc3339().into());
        }
        object.insert("level".into(), self.level.as_str().into());
        object.insert("target".into(), self.target.into());
        object.insert("message".into(), self.message.into());

        serde_json::to_writer(&mut *out, &object)?;
        writeln!(out)
    }

    #[cfg(not(feature = "json"))]
    fn write_json(&self, out: &mut impl Write, config: &LogConfig) -> io::Result<()> {
        write!(out, "{{")?;
        if config.timestamps {
            write!(out, r#""timestamp":"{}","#, chrono::Utc::now().to_rfc3339())?;
        }
        writeln!(
            out,
            r#""level":"{}","target":"{}","message":"{}"}}"#,
            self.level,
            self.target.escape_default(),
            self.message.escape_default()
        )
    }
}

#[cfg(feature = "color")]
fn colored_level(level: Level) -> colored::ColoredString {
    use colored::Colorize;
    match level {
        Level::Trace => "TRACE".magenta(),
        Level::Debug => "DEBUG".blue(),
        Level::Info => "INFO".green(),
        Level::Warn => "WARN".yellow(),
        Level::Error => "ERROR".red().bold(),
        Level::Off => "OFF".normal(),
    }
}
