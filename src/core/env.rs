// core/env.rs

//! # Environment Variable Handling
//!
//! Collects the variables that override reporter configuration. Three sources feed
//! [`crate::core::config::resolve_config`], lowest precedence first: a `.env` file,
//! the process environment, and explicit `KEY=VALUE` overrides from the host.

use std::collections::HashMap;
use std::path::Path;

use log::debug;

use crate::error::ConfigError;

/// Read variables from a `.env` file.
///
/// A missing or unreadable file is not an error; it contributes no variables.
pub fn read_env_file(env_file: &Path) -> HashMap<String, String> {
    if !env_file.exists() {
        debug!("No .env file found at: {}", env_file.display());
        return HashMap::new();
    }

    debug!("Loading environment variables from: {}", env_file.display());
    match dotenvy::from_path_iter(env_file) {
        Ok(iter) => iter
            .flatten()
            .inspect(|(key, _)| debug!("  Loaded env var: {}", key))
            .collect(),
        Err(e) => {
            debug!("Warning: could not load .env file: {}", e);
            HashMap::new()
        }
    }
}

/// Variables of the running process.
pub fn process_env() -> HashMap<String, String> {
    std::env::vars().collect()
}

/// Parse host-supplied `KEY=VALUE` overrides. Later entries win.
///
/// # Errors
/// Returns [`ConfigError::InvalidValue`] for an entry without `=` or with an empty key.
pub fn parse_overrides(overrides: &[String]) -> Result<HashMap<String, String>, ConfigError> {
    let mut vars = HashMap::new();
    for entry in overrides {
        let (key, value) = parse_env_var(entry).ok_or_else(|| ConfigError::InvalidValue {
            key: "override".to_string(),
            value: entry.clone(),
        })?;
        debug!("  Override env var: {}", key);
        vars.insert(key, value);
    }
    Ok(vars)
}

/// Parse a single KEY=VALUE string.
fn parse_env_var(s: &str) -> Option<(String, String)> {
    let (key, value) = s.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), value.to_string()))
}
