// core/config.rs

//! # Configuration Module
//!
//! Reporter configuration: the output format of rendered diagnostics, how far the
//! cause chain is walked, and whether text output is coloured.
//!
//! Settings are layered: defaults, then an optional YAML file, then environment
//! variables (from a `.env` file and the process environment), then `KEY=VALUE`
//! overrides passed in by the host.
//!
//! ```yaml
//! format: json
//! maxChainDepth: 8
//! color: false
//! includeDetail: true
//! ```

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::core::env::{parse_overrides, process_env, read_env_file};
use crate::error::ConfigError;

pub const ENV_FORMAT: &str = "TEMPLATE_DIAG_FORMAT";
pub const ENV_MAX_DEPTH: &str = "TEMPLATE_DIAG_MAX_DEPTH";
pub const ENV_COLOR: &str = "TEMPLATE_DIAG_COLOR";
pub const ENV_NO_COLOR: &str = "NO_COLOR";

pub const DEFAULT_MAX_CHAIN_DEPTH: usize = 32;

/// How a diagnostic record is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Multi-line human-readable text.
    #[default]
    Text,
    /// A single line of `key=value` pairs.
    KeyValue,
    Json,
    Yaml,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Text => "text",
            OutputFormat::KeyValue => "key-value",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "key-value" | "keyvalue" | "kv" => Ok(OutputFormat::KeyValue),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            _ => Err(ConfigError::InvalidValue {
                key: ENV_FORMAT.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Settings for the diagnostic reporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportConfig {
    pub format: OutputFormat,
    /// Maximum number of cause links listed in a record.
    pub max_chain_depth: usize,
    /// Colour text output.
    pub color: bool,
    /// Include variant-specific fields in records.
    pub include_detail: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            max_chain_depth: DEFAULT_MAX_CHAIN_DEPTH,
            color: true,
            include_detail: true,
        }
    }
}

impl ReportConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env(&process_env());
        config
    }

    /// Applies recognised variables from `vars`. Invalid values are logged and ignored.
    pub fn apply_env(&mut self, vars: &HashMap<String, String>) {
        for key in [ENV_FORMAT, ENV_MAX_DEPTH, ENV_COLOR, ENV_NO_COLOR] {
            if let Some(value) = vars.get(key) {
                if let Err(e) = self.apply_var(key, value) {
                    warn!("Ignoring configuration override: {}", e);
                }
            }
        }
    }

    fn apply_var(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };

        match key {
            ENV_FORMAT => self.format = value.parse()?,
            ENV_MAX_DEPTH => self.max_chain_depth = value.trim().parse().map_err(|_| invalid())?,
            ENV_COLOR => self.color = parse_bool(value).ok_or_else(invalid)?,
            // Any non-empty value disables colour.
            ENV_NO_COLOR => {
                if !value.is_empty() {
                    self.color = false;
                }
            }
            _ => {}
        }
        debug!("Applied configuration override {}={}", key, value);
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "always" => Some(true),
        "0" | "false" | "no" | "off" | "never" => Some(false),
        _ => None,
    }
}

/// Load reporter configuration from a YAML file. An empty file yields the defaults.
pub fn load_config(path: &Path) -> Result<ReportConfig, ConfigError> {
    debug!("Loading reporter configuration from: {}", path.display());
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(ReportConfig::default());
    }
    Ok(serde_yaml::from_str(&content)?)
}

/// Build the effective configuration from every layer.
///
/// Layers, lowest precedence first: defaults, the YAML file, the `.env` file, the
/// process environment, then `overrides`.
///
/// # Arguments
/// * `config_file` - Optional YAML configuration file
/// * `env_file` - Optional `.env` file
/// * `overrides` - `KEY=VALUE` pairs supplied by the host
pub fn resolve_config(
    config_file: Option<&Path>,
    env_file: Option<&Path>,
    overrides: &[String],
) -> Result<ReportConfig, ConfigError> {
    let override_vars = parse_overrides(overrides)?;

    let mut config = match config_file {
        Some(path) => load_config(path)?,
        None => ReportConfig::default(),
    };

    if let Some(path) = env_file {
        config.apply_env(&read_env_file(path));
    }
    config.apply_env(&process_env());
    config.apply_env(&override_vars);

    debug!("Effective reporter configuration: {:?}", config);
    Ok(config)
}
