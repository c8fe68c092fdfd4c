//! Configuration management for libreta
//!
//! This module handles loading, validation, and management of
//! libreta configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::ConfigError;
pub use error::ConfigResult;

// ==================== Configuration Types ====================

/// Record export locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// JSON export of income records
    #[serde(default = "default_incomes_file")]
    pub incomes_file: PathBuf,
    /// JSON export of expense records
    #[serde(default = "default_expenses_file")]
    pub expenses_file: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            incomes_file: default_incomes_file(),
            expenses_file: default_expenses_file(),
        }
    }
}

fn default_incomes_file() -> PathBuf {
    PathBuf::from("./data/ingresos.json")
}

fn default_expenses_file() -> PathBuf {
    PathBuf::from("./data/gastos.json")
}

/// History report settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Day of the month on which a billing period starts
    #[serde(default = "default_cycle_start_day")]
    pub cycle_start_day: u32,
    /// Output format
    #[serde(default)]
    pub format: ReportFormat,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            cycle_start_day: default_cycle_start_day(),
            format: ReportFormat::default(),
        }
    }
}

fn default_cycle_start_day() -> u32 {
    6
}

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable text
    Text,
    /// Pretty-printed JSON
    Json,
}

impl Default for ReportFormat {
    fn default() -> Self {
        ReportFormat::Text
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!("Invalid report format: {}", s)),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

/// Currency and number formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// Symbol printed before amounts
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Number of decimal places
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// Thousands separator
    #[serde(default = "default_thousands_sep")]
    pub thousands_separator: String,
    /// Decimal separator
    #[serde(default = "default_decimal_sep")]
    pub decimal_separator: String,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            decimal_places: default_decimal_places(),
            thousands_separator: default_thousands_sep(),
            decimal_separator: default_decimal_sep(),
        }
    }
}

fn default_symbol() -> String {
    "$".to_string()
}

fn default_decimal_places() -> u32 {
    2
}

fn default_thousands_sep() -> String {
    ",".to_string()
}

fn default_decimal_sep() -> String {
    ".".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Record export locations
    #[serde(default)]
    pub data: DataConfig,
    /// Report settings
    #[serde(default)]
    pub report: ReportConfig,
    /// Currency settings
    #[serde(default)]
    pub currency: CurrencyConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(ConfigError::IoError)?;
        let config = Self::from_yaml(&content)?;

        Ok(config)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        // An empty document deserializes to unit, not to a mapping
        let config: Config = if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidYaml {
                message: e.to_string(),
            })?
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if !(1..=28).contains(&self.report.cycle_start_day) {
            return Err(ConfigError::InvalidValue {
                field: "report.cycle_start_day".to_string(),
                reason: "Cycle start day must be between 1 and 28".to_string(),
            });
        }

        if self.currency.decimal_places > 10 {
            return Err(ConfigError::InvalidValue {
                field: "currency.decimal_places".to_string(),
                reason: "Decimal places must be between 0 and 10".to_string(),
            });
        }

        if self.currency.decimal_separator.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "currency.decimal_separator".to_string(),
                reason: "Decimal separator must not be empty".to_string(),
            });
        }

        if !matches!(
            self.logging.level.to_lowercase().as_str(),
            "trace" | "debug" | "info" | "warn" | "error" | "off"
        ) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: "Log level must be one of trace, debug, info, warn, error, off".to_string(),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.report.cycle_start_day, 6);
        assert_eq!(config.report.format, ReportFormat::Text);
        assert_eq!(config.currency.symbol, "$");
        assert_eq!(config.currency.decimal_places, 2);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generated_default_parses() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert_eq!(config.report.cycle_start_day, 6);
        assert_eq!(config.data.incomes_file, PathBuf::from("./data/ingresos.json"));
        assert_eq!(config.data.expenses_file, PathBuf::from("./data/gastos.json"));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = Config::from_yaml("report:\n  format: json\n").unwrap();
        assert_eq!(config.report.format, ReportFormat::Json);
        assert_eq!(config.report.cycle_start_day, 6);
        assert_eq!(config.currency.thousands_separator, ",");
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = Config::from_yaml("   \n").unwrap();
        assert_eq!(config.report.cycle_start_day, 6);
    }

    #[test]
    fn test_invalid_cycle_start_day() {
        let result = Config::from_yaml("report:\n  cycle_start_day: 31\n");
        match result {
            Err(ConfigError::InvalidValue { field, .. }) => {
                assert_eq!(field, "report.cycle_start_day");
            }
            other => panic!("Expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_log_level() {
        let result = Config::from_yaml("logging:\n  level: loud\n");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_invalid_yaml() {
        let result = Config::from_yaml("report: [unclosed");
        assert!(matches!(result, Err(ConfigError::InvalidYaml { .. })));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "currency:\n  symbol: \"€\"\n  decimal_separator: \",\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.currency.symbol, "€");
        assert_eq!(config.currency.decimal_separator, ",");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(dir.path().join("missing.yaml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_report_format_from_str() {
        assert_eq!("text".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert!("html".parse::<ReportFormat>().is_err());
        assert_eq!(ReportFormat::Json.to_string(), "json");
    }
}
