// SPDX-FileCopyrightText: 2026 Nudge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as socket addresses and non-empty paths.

use crate::ConfigError;
use crate::model::NudgeConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &NudgeConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.engine.tick_interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "engine.tick_interval_secs must be greater than zero".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.engine.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "engine.log_level must be one of {LOG_LEVELS:?}, got `{}`",
                config.engine.log_level
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.http.bind_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(ConfigError::Validation {
            message: format!(
                "http.bind_address `{}` is not a valid socket address",
                config.http.bind_address
            ),
        });
    }

    if let Some(url) = &config.discord.webhook_url
        && !url.starts_with("https://")
    {
        errors.push(ConfigError::Validation {
            message: format!("discord.webhook_url must be an https URL, got `{url}`"),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
