// SPDX-FileCopyrightText: 2026 Nudge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Nudge reminder engine.

use thiserror::Error;

/// The primary error type used across all Nudge crates.
///
/// "Not found" lookups and duplicate completions are normal outcomes and are
/// represented in return types (`Option`, silent no-op), never as variants here.
#[derive(Debug, Error)]
pub enum NudgeError {
    /// Configuration errors (invalid TOML, missing required fields, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend unavailable or failed (connection, query execution).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Caller supplied invalid input (e.g. neither or both identity selectors).
    /// Raised before any store access.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A write referenced a reminder or user that does not exist.
    #[error("invalid reference: {message}")]
    InvalidReference { message: String },

    /// Delivery channel errors (webhook failure, malformed payload).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
