//! Configuration loading.
//!
//! Settings live in a TOML file; every section and key is optional:
//!
//! ```toml
//! [plot]
//! resample_count = 30
//!
//! [export]
//! file_name = "river_measurements.csv"
//!
//! [logging]
//! level = "info"
//! file = "river_study.log"
//! console_timestamps = false
//! ```
//!
//! `load_config_from_env` reads a `.env` file if present, then honours
//! `RIVER_STUDY_CONFIG` (path to the TOML file) and `RIVER_STUDY_LOG_LEVEL`
//! (overrides `logging.level`).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::export::DEFAULT_EXPORT_FILE;
use crate::logging::{self, Component, LogLevel};
use crate::model::DEFAULT_RESAMPLE_COUNT;

pub const CONFIG_PATH_VAR: &str = "RIVER_STUDY_CONFIG";
pub const LOG_LEVEL_VAR: &str = "RIVER_STUDY_LOG_LEVEL";

// ---------------------------------------------------------------------------
// Config structures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyConfig {
    pub plot: PlotConfig,
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Interpolated columns per site in the composite surfaces.
    pub resample_count: usize,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self { resample_count: DEFAULT_RESAMPLE_COUNT }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { file_name: DEFAULT_EXPORT_FILE.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub console_timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            console_timestamps: false,
        }
    }
}

impl StudyConfig {
    /// Checks values serde cannot: resample count, export name, log level.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.plot.resample_count < 2 {
            return Err(ConfigError::Invalid(format!(
                "plot.resample_count must be at least 2, got {}",
                self.plot.resample_count
            )));
        }
        if self.export.file_name.trim().is_empty() {
            return Err(ConfigError::Invalid("export.file_name must not be empty".to_string()));
        }
        if LogLevel::parse(&self.logging.level).is_none() {
            return Err(ConfigError::Invalid(format!(
                "logging.level '{}' is not one of debug, info, warn, error",
                self.logging.level
            )));
        }
        Ok(())
    }

    /// The configured level, falling back to `Info` if unparseable.
    pub fn log_level(&self) -> LogLevel {
        LogLevel::parse(&self.logging.level).unwrap_or(LogLevel::Info)
    }

    /// Initialises the global logger from the `[logging]` section.
    pub fn init_logging(&self) {
        logging::init_logger(
            self.log_level(),
            self.logging.file.as_deref(),
            self.logging.console_timestamps,
        );
        logging::info(
            Component::System,
            None,
            &format!(
                "Configured: resample_count={}, export file {}",
                self.plot.resample_count, self.export.file_name
            ),
        );
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// The config file could not be read.
    Io(String),
    /// The file is not valid TOML or has mistyped values.
    Parse(String),
    /// Values parsed but are out of range.
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "Config IO error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Config parse error: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parses and validates config text.
pub fn parse_config(text: &str) -> Result<StudyConfig, ConfigError> {
    let config: StudyConfig = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Reads and validates a config file.
pub fn load_config(path: &Path) -> Result<StudyConfig, ConfigError> {
    let text = fs::read_to_string(path)
        .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
    parse_config(&text)
}

/// Loads `.env`, then resolves the config from the environment.
pub fn load_config_from_env() -> Result<StudyConfig, ConfigError> {
    dotenv::dotenv().ok();
    resolve_config(
        std::env::var(CONFIG_PATH_VAR).ok().as_deref(),
        std::env::var(LOG_LEVEL_VAR).ok().as_deref(),
    )
}

/// Builds the config from an optional file path and an optional level
/// override. Without a path the defaults are used.
pub fn resolve_config(path: Option<&str>, level: Option<&str>) -> Result<StudyConfig, ConfigError> {
    let mut config = match path {
        Some(p) if !p.trim().is_empty() => load_config(Path::new(p))?,
        _ => StudyConfig::default(),
    };
    if let Some(level) = level {
        config.logging.level = level.to_string();
        config.validate()?;
    }
    Ok(config)
}
