//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::LedgerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Overrides `client.api_key`.
pub const API_KEY_ENV: &str = "SOZ_LEDGER_API_KEY";
/// Overrides `receiver.secret`.
pub const WEBHOOK_SECRET_ENV: &str = "SOZ_LEDGER_WEBHOOK_SECRET";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load, apply env overrides and validate a TOML configuration file.
pub fn load_config(path: &Path) -> Result<LedgerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content, |key| std::env::var(key).ok())
}

/// Parse configuration text; `env` resolves override variables.
pub fn parse_config<F>(content: &str, env: F) -> Result<LedgerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config: LedgerConfig = toml::from_str(content)?;
    apply_env_overrides(&mut config, env);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Defaults plus env overrides, validated like a file would be.
///
/// Used when no configuration file is given.
pub fn config_from_env<F>(env: F) -> Result<LedgerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = LedgerConfig::default();
    apply_env_overrides(&mut config, env);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Secrets may come from the environment instead of the file.
pub fn apply_env_overrides<F>(config: &mut LedgerConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = env(API_KEY_ENV).filter(|v| !v.is_empty()) {
        config.client.api_key = key;
    }
    if let Some(secret) = env(WEBHOOK_SECRET_ENV).filter(|v| !v.is_empty()) {
        config.receiver.secret = secret;
    }
}
