//! Configuration management for pebble-complete
//!
//! This module handles loading, parsing, and validating configuration:
//! - Configuration file (TOML format)
//! - Command-line arguments (applied by the CLI on top of the file)
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use std::sync::Arc;

use crate::completion::{
    CatalogEntry, CatalogKind, CompletionEngine, ConfiguredProvider, Syntax, TriggerPolicy,
};
use crate::error::{ConfigError, Result};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Display configuration
    pub display: DisplayConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// History configuration for the interactive playground
    pub history: HistoryConfig,

    /// Template delimiters
    pub syntax: Syntax,

    /// Completion behavior
    pub completion: CompletionConfig,
}

/// Display and output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Output format (plain, table, json, json-pretty)
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Enable colored output
    #[serde(default = "default_color_output")]
    pub color_output: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// One `name<TAB>detail` line per candidate
    Plain,

    /// ASCII table with catalog, name, detail and insert columns
    Table,

    /// Compact JSON array (single line)
    Json,

    /// Pretty-printed JSON array
    JsonPretty,
}

/// Command history configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of history entries
    #[serde(default = "default_max_history_size")]
    pub max_size: usize,

    /// Path to history file
    #[serde(default = "default_history_file")]
    pub file_path: PathBuf,

    /// Enable history persistence
    #[serde(default = "default_persist_history")]
    pub persist: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Completion configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Characters that request completion in `complete --on-trigger`
    #[serde(default = "default_trigger_characters")]
    pub trigger_characters: Vec<String>,

    /// Narrow interactive suggestions to the word under the cursor
    #[serde(default = "default_filter_by_word")]
    pub filter_by_word: bool,

    /// Additional entries, e.g. filters from a custom Pebble extension
    #[serde(default)]
    pub custom: Vec<CustomEntry>,
}

/// A user-defined catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomEntry {
    /// Catalog the entry belongs to
    pub catalog: CatalogKind,

    /// Completion label
    pub name: String,

    /// Short description
    #[serde(default)]
    pub detail: String,

    /// Optional insertion template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

// Default value functions
fn default_format() -> OutputFormat {
    OutputFormat::Plain
}

fn default_color_output() -> bool {
    true
}

fn default_max_history_size() -> usize {
    1000
}

fn default_history_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pebble-complete_history")
}

fn default_persist_history() -> bool {
    true
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    false
}

fn default_trigger_characters() -> Vec<String> {
    vec![" ".to_string(), "|".to_string(), ".".to_string()]
}

fn default_filter_by_word() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            color_output: default_color_output(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_size: default_max_history_size(),
            file_path: default_history_file(),
            persist: default_persist_history(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            trigger_characters: default_trigger_characters(),
            filter_by_word: default_filter_by_word(),
            custom: Vec::new(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a file
    ///
    /// With no explicit path the default location is used. A missing file is
    /// not an error when falling back to the default location; an explicit
    /// path that does not exist is.
    ///
    /// # Arguments
    /// * `path` - Optional path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_config_path(), false),
        };

        if !path.exists() {
            if explicit {
                return Err(ConfigError::FileNotFound(path.display().to_string()).into());
            }
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        tracing::debug!(path = %path.display(), "loading config file");
        let content = fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - `~/.pebble-complete/config.toml`
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".pebble-complete")
            .join("config.toml")
    }

    /// Serialize the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<()> {
        let syntax = &self.syntax;
        let delimiters = [
            ("syntax.statement_open", &syntax.statement_open),
            ("syntax.statement_close", &syntax.statement_close),
            ("syntax.expression_open", &syntax.expression_open),
            ("syntax.expression_close", &syntax.expression_close),
        ];
        for (field, value) in delimiters {
            if value.is_empty() {
                return Err(invalid(field, value));
            }
        }

        if syntax.statement_open == syntax.statement_close {
            return Err(invalid("syntax.statement_close", &syntax.statement_close));
        }
        if syntax.expression_open == syntax.expression_close {
            return Err(invalid("syntax.expression_close", &syntax.expression_close));
        }

        for trigger in &self.completion.trigger_characters {
            if trigger.chars().count() != 1 {
                return Err(invalid("completion.trigger_characters", trigger));
            }
        }

        for entry in &self.completion.custom {
            if entry.name.trim().is_empty() {
                return Err(invalid("completion.custom.name", &entry.name));
            }
        }

        if self.history.max_size == 0 {
            return Err(invalid("history.max_size", "0"));
        }

        Ok(())
    }

    /// Build a completion engine from the syntax and completion sections
    pub fn engine(&self) -> CompletionEngine {
        CompletionEngine::new(Arc::new(self.completion.provider())).with_syntax(self.syntax.clone())
    }
}

fn invalid(field: &str, value: &str) -> crate::error::PebbleError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
    .into()
}

impl CompletionConfig {
    /// Trigger policy built from the configured characters
    ///
    /// Entries that are not a single character are ignored here; `validate`
    /// reports them.
    pub fn trigger_policy(&self) -> TriggerPolicy {
        TriggerPolicy::new(self.trigger_characters.iter().filter_map(|s| {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => None,
            }
        }))
    }

    /// Candidate provider with the custom entries layered over the built-ins
    pub fn provider(&self) -> ConfiguredProvider {
        ConfiguredProvider::new(self.custom.iter().map(|custom| {
            let mut entry = CatalogEntry::new(custom.name.clone(), custom.detail.clone());
            if let Some(template) = &custom.template {
                entry = entry.with_template(template.clone());
            }
            (custom.catalog, entry)
        }))
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::CandidateProvider;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.display.format, OutputFormat::Plain);
        assert!(config.display.color_output);
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert_eq!(config.syntax, Syntax::default());
        assert_eq!(config.completion.trigger_characters, vec![" ", "|", "."]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [display]
            format = "json-pretty"

            [syntax]
            expression_open = "[["
            expression_close = "]]"
            "#,
        )
        .unwrap();

        assert_eq!(config.display.format, OutputFormat::JsonPretty);
        assert!(config.display.color_output);
        assert_eq!(config.syntax.expression_open, "[[");
        assert_eq!(config.syntax.statement_open, "{%");
        assert_eq!(config.history.max_size, 1000);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [logging]
            level = "debug"

            [[completion.custom]]
            catalog = "filters"
            name = "slugify"
            detail = "Make URL slug"
            "#
        )
        .unwrap();

        let config = Config::load_from_file(Some(file.path())).unwrap();
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.completion.custom.len(), 1);
        assert_eq!(config.completion.custom[0].catalog, CatalogKind::Filters);

        let filters = config.completion.provider().filters();
        assert_eq!(filters.last().unwrap().name, "slugify");
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(Config::load_from_file(Some(&path)).is_err());
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(Config::from_toml_str("[display\nformat = 1").is_err());
        assert!(Config::from_toml_str("[display]\nformat = \"xml\"").is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.display.format = OutputFormat::Table;
        config.completion.custom.push(CustomEntry {
            catalog: CatalogKind::Functions,
            name: "now".to_string(),
            detail: "Current time".to_string(),
            template: Some("now()".to_string()),
        });

        let text = config.to_toml().unwrap();
        assert_eq!(Config::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.syntax.statement_open = String::new();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.syntax.expression_close = "{{".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.completion.trigger_characters = vec!["ab".to_string()];
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.history.max_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_trigger_policy_from_config() {
        let mut completion = CompletionConfig::default();
        assert!(completion.trigger_policy().should_trigger("{{ x |"));

        completion.trigger_characters = vec!["(".to_string(), "bad".to_string()];
        let policy = completion.trigger_policy();
        assert_eq!(policy.characters(), &['(']);
    }

    #[test]
    fn test_engine_uses_configured_syntax() {
        let mut config = Config::default();
        config.syntax.expression_open = "${".to_string();
        config.syntax.expression_close = "}".to_string();

        let engine = config.engine();
        assert!(engine.classify("{{ user |").is_empty());
        assert!(!engine.classify("${ user |").is_empty());
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(LogLevel::Trace.to_tracing_level(), tracing::Level::TRACE);
        assert_eq!(LogLevel::Error.to_tracing_level(), tracing::Level::ERROR);
    }
}
