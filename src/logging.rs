/// Structured logging for the flood monitoring ledger
///
/// Provides context-rich logging with location identifiers, timestamps and
/// severity levels. Supports console output and an append-only log file for
/// long-running hosts.

use chrono::Utc;
use serde::Deserialize;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    #[serde(alias = "warning")]
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Log Sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSource {
    Ledger,
    Host,
    Endpoint,
    Config,
}

impl fmt::Display for LogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogSource::Ledger => write!(f, "LEDGER"),
            LogSource::Host => write!(f, "HOST"),
            LogSource::Endpoint => write!(f, "HTTP"),
            LogSource::Config => write!(f, "CFG"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to emit
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to use the full timestamped format on the console
    console_timestamps: bool,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>, console_timestamps: bool) {
        let logger = Logger {
            min_level,
            log_file,
            console_timestamps,
        };

        if let Ok(mut slot) = LOGGER.lock() {
            *slot = Some(logger);
        }
    }

    fn log(&self, level: LogLevel, source: LogSource, location: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let log_entry = format_entry(level, source, location, message);
        let location_part = location.map(|l| format!(" [{}]", l)).unwrap_or_default();

        if self.console_timestamps {
            match level {
                LogLevel::Error | LogLevel::Warn => eprintln!("{}", log_entry),
                LogLevel::Info | LogLevel::Debug => println!("{}", log_entry),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", source, location_part, message),
                LogLevel::Warn => eprintln!("   ⚠ {}{}: {}", source, location_part, message),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => println!("   [DEBUG] {}", message),
            }
        }

        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

/// Formats one log line: `<timestamp> <LEVEL> <SOURCE>[ [location]]: <message>`
pub fn format_entry(level: LogLevel, source: LogSource, location: Option<&str>, message: &str) -> String {
    let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
    let location_part = location.map(|l| format!(" [{}]", l)).unwrap_or_default();
    format!("{} {} {}{}: {}", timestamp, level, source, location_part, message)
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

fn emit(level: LogLevel, source: LogSource, location: Option<&str>, message: &str) {
    if let Ok(guard) = LOGGER.lock() {
        if let Some(logger) = guard.as_ref() {
            logger.log(level, source, location, message);
        }
    }
}

/// Log a general informational message
pub fn info(source: LogSource, location: Option<&str>, message: &str) {
    emit(LogLevel::Info, source, location, message);
}

/// Log a warning message
pub fn warn(source: LogSource, location: Option<&str>, message: &str) {
    emit(LogLevel::Warn, source, location, message);
}

/// Log an error message
pub fn error(source: LogSource, location: Option<&str>, message: &str) {
    emit(LogLevel::Error, source, location, message);
}

/// Log a debug message
pub fn debug(source: LogSource, location: Option<&str>, message: &str) {
    emit(LogLevel::Debug, source, location, message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn test_log_level_parses_from_config_strings() {
        #[derive(Deserialize)]
        struct Wrapper {
            level: LogLevel,
        }

        let w: Wrapper = toml::from_str("level = \"warning\"").unwrap();
        assert_eq!(w.level, LogLevel::Warn);
        let w: Wrapper = toml::from_str("level = \"debug\"").unwrap();
        assert_eq!(w.level, LogLevel::Debug);
    }

    #[test]
    fn test_entry_format_includes_source_and_location() {
        let entry = format_entry(LogLevel::Warn, LogSource::Ledger, Some("ZONE001"), "rejected");
        assert!(entry.contains("WARN LEDGER [ZONE001]: rejected"), "got: {}", entry);

        let entry = format_entry(LogLevel::Info, LogSource::Host, None, "mined");
        assert!(entry.ends_with("INFO HOST: mined"), "got: {}", entry);
    }
}
