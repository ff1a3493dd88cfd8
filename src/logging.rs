//! Structured logging for the river study tool.
//!
//! Provides context-rich logging with component tags, optional site
//! context, timestamps and severity levels. Supports console output and an
//! optional append-only log file. Logging before `init_logger` is a no-op.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

use crate::form::ResetScope;
use crate::model::default_site_name;

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

impl LogLevel {
    /// Parses a level name as written in config files and environment
    /// variables. Case-insensitive; accepts `warn` and `warning`.
    pub fn parse(name: &str) -> Option<LogLevel> {
        match name.trim().to_ascii_lowercase().as_str() {
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warning),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
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
// Components
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    Form,
    Geometry,
    Export,
    Session,
    System,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Form => write!(f, "FORM"),
            Component::Geometry => write!(f, "GEOM"),
            Component::Export => write!(f, "EXPORT"),
            Component::Session => write!(f, "SESSION"),
            Component::System => write!(f, "SYS"),
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
    /// Whether to include timestamps in console output
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

    fn log(&self, level: LogLevel, component: &Component, site: Option<usize>, message: &str) {
        if level < self.min_level {
            return;
        }

        let log_entry = format_entry(level, component, site, message);
        let site_part = site_context(site);

        if self.console_timestamps {
            match level {
                LogLevel::Error | LogLevel::Warning => eprintln!("{}", log_entry),
                LogLevel::Info | LogLevel::Debug => println!("{}", log_entry),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", component, site_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", component, site_part, message),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => println!("   [DEBUG] {}{}: {}", component, site_part, message),
            }
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

fn site_context(site: Option<usize>) -> String {
    site.map(|i| format!(" [{}]", default_site_name(i))).unwrap_or_default()
}

/// Formats one log line: `timestamp LEVEL COMPONENT [Site n]: message`.
pub fn format_entry(
    level: LogLevel,
    component: &Component,
    site: Option<usize>,
    message: &str,
) -> String {
    format!(
        "{} {} {}{}: {}",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
        level,
        component,
        site_context(site),
        message
    )
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

fn emit(level: LogLevel, component: Component, site: Option<usize>, message: &str) {
    if let Ok(guard) = LOGGER.lock() {
        if let Some(logger) = guard.as_ref() {
            logger.log(level, &component, site, message);
        }
    }
}

/// Log a general informational message
pub fn info(component: Component, site: Option<usize>, message: &str) {
    emit(LogLevel::Info, component, site, message);
}

/// Log a warning message
pub fn warn(component: Component, site: Option<usize>, message: &str) {
    emit(LogLevel::Warning, component, site, message);
}

/// Log an error message
pub fn error(component: Component, site: Option<usize>, message: &str) {
    emit(LogLevel::Error, component, site, message);
}

/// Log a debug message
pub fn debug(component: Component, site: Option<usize>, message: &str) {
    emit(LogLevel::Debug, component, site, message);
}

// ---------------------------------------------------------------------------
// Domain Helpers
// ---------------------------------------------------------------------------

/// Describes data discarded by a form change.
pub fn describe_reset(scope: &ResetScope) -> String {
    match scope {
        ResetScope::AllSites { old_count, new_count } => format!(
            "Site count changed {} -> {}; all site data discarded",
            old_count, new_count
        ),
        ResetScope::SiteMeasurements { .. } => {
            "Measurement count changed; distances and depths cleared".to_string()
        }
    }
}

/// Log data discarded by a form change.
pub fn log_reset(scope: &ResetScope) {
    let site = match scope {
        ResetScope::AllSites { .. } => None,
        ResetScope::SiteMeasurements { site } => Some(*site),
    };
    info(Component::Form, site, &describe_reset(scope));
}

/// Log a summary of a prepared CSV export
pub fn log_export_summary(file_name: &str, sites: usize, rows: usize) {
    info(
        Component::Export,
        None,
        &format!("{}: exported {} rows from {} sites", file_name, rows, sites),
    );
}
