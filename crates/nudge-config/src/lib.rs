// SPDX-FileCopyrightText: 2026 Nudge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Nudge reminder engine.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, and environment
//! variable overrides.
//!
//! # Usage
//!
//! ```no_run
//! use nudge_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("tick interval: {}s", config.engine.tick_interval_secs);
//! ```

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::NudgeConfig;

use thiserror::Error;

/// A configuration parse or validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML/env extraction failed (syntax error, type mismatch, unknown key).
    #[error("{0}")]
    Parse(#[from] figment::Error),

    /// A semantic constraint failed after deserialization.
    #[error("{message}")]
    Validation { message: String },
}

/// Load configuration from the XDG hierarchy and validate it.
///
/// Returns either a valid `NudgeConfig` or the list of collected errors.
pub fn load_and_validate() -> Result<NudgeConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(vec![ConfigError::Parse(err)]),
    }
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<NudgeConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(vec![ConfigError::Parse(err)]),
    }
}

/// Load configuration from an explicit file path and validate it.
///
/// Skips the XDG hierarchy; env overrides still apply.
pub fn load_and_validate_path(path: &std::path::Path) -> Result<NudgeConfig, Vec<ConfigError>> {
    match loader::load_config_from_path(path) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(vec![ConfigError::Parse(err)]),
    }
}

/// Print collected configuration errors to stderr, one per line.
pub fn render_errors(errors: &[ConfigError]) {
    for err in errors {
        eprintln!("nudge: config error: {err}");
    }
}
