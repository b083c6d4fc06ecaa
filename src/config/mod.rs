//! Configuration management for scql
//!
//! This module handles loading, parsing, and validating configuration from:
//! - Configuration files (TOML format)
//! - Command-line arguments
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Configuration file
//! 3. Default values
//!
//! # File layout
//!
//! ```toml
//! [guesser]
//! root_type = "Person"
//! qualified_attributes = false
//! excluded = ["%@", "YES", "NO"]
//!
//! [logging]
//! level = "warn"
//! timestamps = true
//!
//! [display]
//! format = "text"
//!
//! [schema.Animal]
//! name = "String"
//!
//! [schema.Person]
//! _extends = "Animal"
//! dog = { to_one = "Dog" }
//! friends = { to_many = "Person" }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::completion::{GuesserOptions, default_excluded};
use crate::error::{ConfigError, Result, SchemaError};
use crate::parser::TokenType;
use crate::schema::{Attribute, AttributeTable, SchemaRegistry};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Guesser configuration
    #[serde(default)]
    pub guesser: GuesserConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Display configuration
    #[serde(default)]
    pub display: DisplayConfig,

    /// Record types, in declaration order
    #[serde(default)]
    pub schema: IndexMap<String, RecordTypeConfig>,
}

/// Guess materialization settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuesserConfig {
    /// Record type property paths start from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_type: Option<String>,

    /// Prefix attribute guesses with their relation path
    #[serde(default)]
    pub qualified_attributes: bool,

    /// Reserved words never offered, by token name
    #[serde(default = "default_excluded_names")]
    pub excluded: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
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

/// Display and output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Output format (text, json)
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable sections
    Text,

    /// Pretty-printed JSON
    Json,
}

/// One `[schema.<Type>]` table
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordTypeConfig {
    /// Parent type whose attributes are inherited
    #[serde(rename = "_extends", default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Own attributes, in declaration order
    #[serde(flatten)]
    pub attributes: IndexMap<String, AttributeConfig>,
}

/// Attribute value in a schema table: a type name or a relation table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum AttributeConfig {
    Scalar(String),
    Relation(RelationConfig),
}

/// `{ to_one = "Type" }` or `{ to_many = "Type" }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RelationConfig {
    ToOne(String),
    ToMany(String),
}

// Default value functions
fn default_excluded_names() -> Vec<String> {
    default_excluded()
        .iter()
        .map(|t| t.as_str().to_string())
        .collect()
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Text
}

impl Default for GuesserConfig {
    fn default() -> Self {
        Self {
            root_type: None,
            qualified_attributes: false,
            excluded: default_excluded_names(),
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

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    ///
    /// With no explicit path the default location is tried, and a missing
    /// file there yields the defaults. An explicit path must exist.
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::default_path(), false),
        };

        if !path.exists() {
            if explicit {
                return Err(ConfigError::FileNotFound(path.display().to_string()).into());
            }
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        debug!("Loading config from {}", path.display());
        let content = fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Get the default configuration file path
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".scql")
            .join("config.toml")
    }

    /// Save configuration to a file, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Validate the configuration
    ///
    /// Checks that excluded names are token types, the root type is
    /// declared, and every parent and relation target exists.
    pub fn validate(&self) -> Result<()> {
        self.excluded_token_types()?;

        if let Some(root_type) = &self.guesser.root_type {
            if !self.schema.contains_key(root_type) {
                return Err(invalid("guesser.root_type", root_type));
            }
        }

        for (type_name, record_type) in &self.schema {
            if let Some(parent) = &record_type.extends {
                if !self.schema.contains_key(parent) {
                    return Err(invalid(&format!("schema.{type_name}._extends"), parent));
                }
            }
            for (attr_name, attribute) in &record_type.attributes {
                if let AttributeConfig::Relation(relation) = attribute {
                    let target = relation.target();
                    if !self.schema.contains_key(target) {
                        return Err(invalid(&format!("schema.{type_name}.{attr_name}"), target));
                    }
                }
            }
        }

        self.build_registry().map(|_| ())
    }

    /// Excluded token names as token types
    pub fn excluded_token_types(&self) -> Result<Vec<TokenType>> {
        self.guesser
            .excluded
            .iter()
            .map(|name| {
                name.parse::<TokenType>()
                    .map_err(|_| invalid("guesser.excluded", name))
            })
            .collect()
    }

    /// Options for the engine
    pub fn guesser_options(&self) -> Result<GuesserOptions> {
        Ok(GuesserOptions {
            qualified_attributes: self.guesser.qualified_attributes,
            excluded: self.excluded_token_types()?,
        })
    }

    /// Populate a registry from the `[schema]` tables
    ///
    /// Parents are defined before the types extending them, whatever the
    /// order in the file.
    pub fn build_registry(&self) -> Result<SchemaRegistry> {
        let registry = SchemaRegistry::new();
        let mut pending: Vec<(&String, &RecordTypeConfig)> = self.schema.iter().collect();

        while !pending.is_empty() {
            let before = pending.len();
            let mut deferred = Vec::new();

            for (name, record_type) in pending {
                match &record_type.extends {
                    None => registry.define(name.clone(), record_type.attribute_table()),
                    Some(parent) if registry.contains(parent) => {
                        registry.extend(parent, name.clone(), record_type.attribute_table())?
                    }
                    Some(_) => deferred.push((name, record_type)),
                }
            }

            if deferred.len() == before {
                if let Some((name, record_type)) = deferred.first() {
                    let parent = record_type.extends.clone().unwrap_or_default();
                    let err = if self.schema.contains_key(&parent) {
                        SchemaError::InheritanceCycle(name.to_string())
                    } else {
                        SchemaError::UnknownParent {
                            record_type: name.to_string(),
                            parent,
                        }
                    };
                    return Err(err.into());
                }
            }
            pending = deferred;
        }

        debug!("Built schema registry with {} record type(s)", self.schema.len());
        Ok(registry)
    }
}

fn invalid(field: &str, value: &str) -> crate::error::GuesserError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
    .into()
}

impl RecordTypeConfig {
    /// Own attributes as a registry table
    pub fn attribute_table(&self) -> AttributeTable {
        self.attributes
            .iter()
            .map(|(name, attribute)| (name.clone(), attribute.to_attribute()))
            .collect()
    }
}

impl AttributeConfig {
    pub fn to_attribute(&self) -> Attribute {
        match self {
            AttributeConfig::Scalar(type_name) => Attribute::scalar(type_name.as_str()),
            AttributeConfig::Relation(RelationConfig::ToOne(target)) => {
                Attribute::to_one(target.as_str())
            }
            AttributeConfig::Relation(RelationConfig::ToMany(target)) => {
                Attribute::to_many(target.as_str())
            }
        }
    }
}

impl RelationConfig {
    /// Record type on the other end
    pub fn target(&self) -> &str {
        match self {
            RelationConfig::ToOne(target) | RelationConfig::ToMany(target) => target,
        }
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

impl OutputFormat {
    /// Check if format is JSON-based
    pub fn is_json(&self) -> bool {
        matches!(self, OutputFormat::Json)
    }
}
