// SPDX-FileCopyrightText: 2026 Nudge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All access is serialized through tokio-rusqlite's single background thread.
//! Every public storage operation scopes its own `conn.call` -- connections
//! are never held across calls to external collaborators.

use std::path::Path;

use nudge_core::NudgeError;
use tracing::debug;

/// Handle to the SQLite database.
///
/// Cheap to clone; all clones share the single background connection thread.
/// Opening runs the embedded migrations and applies connection PRAGMAs
/// (`foreign_keys = ON` is required for `InvalidReference` detection).
#[derive(Clone, Debug)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (creating if necessary) the database at `path` with WAL mode.
    pub async fn open(path: &str) -> Result<Self, NudgeError> {
        Self::open_with_journal(path, true).await
    }

    /// Open the database, optionally without WAL journaling.
    pub async fn open_with_journal(path: &str, wal: bool) -> Result<Self, NudgeError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| NudgeError::Storage {
                source: Box::new(e),
            })?;
        }

        // Migrations and durable PRAGMAs run on a short-lived blocking
        // connection before the async handle is opened.
        let migrate_path = path.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), NudgeError> {
            let mut conn =
                rusqlite::Connection::open(&migrate_path).map_err(|e| NudgeError::Storage {
                    source: Box::new(e),
                })?;
            if wal {
                conn.pragma_update(None, "journal_mode", "WAL")
                    .map_err(|e| NudgeError::Storage {
                        source: Box::new(e),
                    })?;
            }
            crate::migrations::run_migrations(&mut conn)
        })
        .await
        .map_err(|e| NudgeError::Internal(format!("migration task failed: {e}")))??;

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| NudgeError::Storage {
                source: Box::new(e),
            })?;

        // foreign_keys is per-connection, not persistent; it must be set on
        // the connection the queries actually run on.
        conn.call(|conn| {
            conn.execute_batch(
                "PRAGMA foreign_keys = ON;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA busy_timeout = 5000;",
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, wal, "database opened");
        Ok(Self { conn })
    }

    /// Returns the underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL and close the background connection.
    pub async fn close(self) -> Result<(), NudgeError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Convert a tokio-rusqlite error into NudgeError::Storage.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> NudgeError {
    NudgeError::Storage {
        source: Box::new(e),
    }
}
