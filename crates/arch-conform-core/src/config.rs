//! Configuration types for arch-conform.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::lineage::DEFAULT_LINEAGE_ROOTS;

/// Top-level configuration for arch-conform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Preset to use (e.g., "recommended", "strict", "minimal").
    #[serde(default)]
    pub preset: Option<String>,

    /// Severity threshold for failure (default: "error").
    /// Violations at or above this severity fail `check!()` and the CLI.
    #[serde(default)]
    pub fail_on: Option<String>,

    /// Engine configuration.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Per-rule configurations.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        self.rules
            .get(rule_name)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule_name: &str) -> Option<crate::Severity> {
        self.rules.get(rule_name).and_then(|c| c.severity)
    }

    /// Gets the configuration table of a rule.
    #[must_use]
    pub fn rule(&self, rule_name: &str) -> Option<&RuleConfig> {
        self.rules.get(rule_name)
    }

    /// Parses `fail_on`, defaulting to `error`.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown severity name.
    pub fn fail_on_severity(&self) -> Result<crate::Severity, ConfigError> {
        match self.fail_on.as_deref() {
            None => Ok(crate::Severity::Error),
            Some(s) => s.parse().map_err(|e: crate::types::UnknownSeverity| {
                ConfigError::Invalid {
                    message: format!("fail_on: {e}"),
                }
            }),
        }
    }
}

/// Engine-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory scanned for `*.symbols.json` snapshots (default: current directory).
    #[serde(default = "default_snapshots")]
    pub snapshots: PathBuf,

    /// Glob patterns matched against type file paths; matching types are not evaluated.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether snapshot discovery respects .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Worker threads for evaluation (default: all cores).
    #[serde(default)]
    pub parallelism: Option<usize>,

    /// Ancestor names that make a type part of the entity lineage.
    #[serde(default = "default_lineage_roots")]
    pub lineage_roots: Vec<String>,

    /// Prefix joined onto every remediation document reference.
    #[serde(default)]
    pub docs_base: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            snapshots: default_snapshots(),
            exclude: Vec::new(),
            respect_gitignore: true,
            parallelism: None,
            lineage_roots: default_lineage_roots(),
            docs_base: String::new(),
        }
    }
}

fn default_snapshots() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

fn default_lineage_roots() -> Vec<String> {
    DEFAULT_LINEAGE_ROOTS.iter().map(|s| (*s).to_string()).collect()
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default)]
    pub severity: Option<crate::Severity>,

    /// Rule-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

impl RuleConfig {
    /// Gets an option value as a specific type.
    #[must_use]
    pub fn get_option<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.options
            .get(key)
            .and_then(|v| v.clone().try_into().ok())
    }

    /// Gets a boolean option with a default value.
    #[must_use]
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.options
            .get(key)
            .and_then(toml::Value::as_bool)
            .unwrap_or(default)
    }

    /// Gets an integer option with a default value.
    #[must_use]
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.options
            .get(key)
            .and_then(toml::Value::as_integer)
            .unwrap_or(default)
    }

    /// Gets a string option with a default value.
    #[must_use]
    pub fn get_str<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.options
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or(default)
    }

    /// Gets a string array option.
    #[must_use]
    pub fn get_str_array(&self, key: &str) -> Vec<String> {
        self.options
            .get(key)
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// A value parsed but is not acceptable.
    #[error("Invalid config: {message}")]
    Invalid {
        /// What is wrong.
        message: String,
    },
}
