//! Structured logging for the EA flood monitoring service.
//!
//! Provides context-rich logging with station references, timestamps, and
//! severity levels. Supports both console output and file-based logging
//! for daemon operations.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Log Sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Eafm,
    Endpoint,
    System,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Eafm => write!(f, "EAFM"),
            DataSource::Endpoint => write!(f, "HTTP"),
            DataSource::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - station may be closed, suspended, or in maintenance
    Expected,
    /// Unexpected failure - indicates service degradation or an API change
    Unexpected,
    /// Unknown - cannot determine if this is expected or not
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>) {
        let logger = Logger {
            min_level,
            log_file,
        };

        *LOGGER.lock().unwrap() = Some(logger);
    }

    fn log(&self, level: LogLevel, source: &DataSource, reference: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let station_part = reference.map(|r| format!(" [{}]", r)).unwrap_or_default();
        let log_entry = format!(
            "{} {} {}{}: {}",
            timestamp, level, source, station_part, message
        );

        match level {
            LogLevel::Error => eprintln!("   ✗ {}{}: {}", source, station_part, message),
            LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", source, station_part, message),
            LogLevel::Info => println!("   {}", message),
            LogLevel::Debug => println!("   [DEBUG] {}", message),
        }

        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>) {
    Logger::init(min_level, log_file.map(String::from));
}

/// Log a general informational message
pub fn info(source: DataSource, reference: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Info, &source, reference, message);
    }
}

/// Log a warning message
pub fn warn(source: DataSource, reference: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Warning, &source, reference, message);
    }
}

/// Log an error message
pub fn error(source: DataSource, reference: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Error, &source, reference, message);
    }
}

/// Log a debug message
pub fn debug(source: DataSource, reference: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Debug, &source, reference, message);
    }
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify an EA API poll failure based on the error message.
pub fn classify_eafm_failure(_reference: &str, error_message: &str) -> FailureType {
    // Stations disappear from the single-station endpoint when they are
    // decommissioned or renamed; that is a registry problem, not an outage.
    if error_message.contains("Station not found") {
        FailureType::Unknown
    }
    // HTTP errors indicate service issues on the EA side
    else if error_message.contains("HTTP error") || error_message.contains("Request error") {
        FailureType::Unexpected
    }
    // Parse errors suggest API changes or bugs
    else if error_message.contains("Parse error") {
        FailureType::Unexpected
    } else {
        FailureType::Unknown
    }
}

/// Log a poll failure with automatic classification.
pub fn log_poll_failure(reference: &str, operation: &str, err: &dyn std::error::Error) {
    let error_msg = err.to_string();
    let failure_type = classify_eafm_failure(reference, &error_msg);

    let message = format!("{} failed [{}]: {}", operation, failure_type, error_msg);

    match failure_type {
        FailureType::Expected => debug(DataSource::Eafm, Some(reference), &message),
        FailureType::Unexpected => error(DataSource::Eafm, Some(reference), &message),
        FailureType::Unknown => warn(DataSource::Eafm, Some(reference), &message),
    }
}

// ---------------------------------------------------------------------------
// Poll Summary Logging
// ---------------------------------------------------------------------------

/// Log a summary of one poll sweep across all stations.
pub fn log_poll_summary(total: usize, successful: usize, failed: usize) {
    let message = format!(
        "Poll complete: {}/{} stations updated, {} failed",
        successful, total, failed
    );

    if failed == 0 {
        info(DataSource::Eafm, None, &message);
    } else if successful == 0 {
        error(DataSource::Eafm, None, &message);
    } else {
        warn(DataSource::Eafm, None, &message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
    }

    #[test]
    fn test_failure_classification() {
        let not_found = "Station not found: 0000XX";
        assert_eq!(
            classify_eafm_failure("0000XX", not_found),
            FailureType::Unknown
        );

        let http_error = "HTTP error: 500";
        assert_eq!(
            classify_eafm_failure("3400TH", http_error),
            FailureType::Unexpected
        );

        let parse_error = "Parse error: JSON deserialization failed: EOF";
        assert_eq!(
            classify_eafm_failure("3400TH", parse_error),
            FailureType::Unexpected
        );
    }
}
