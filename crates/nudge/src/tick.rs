// SPDX-FileCopyrightText: 2026 Nudge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `nudge tick` command implementation.
//!
//! One scheduling pass: select due reminders, drop the ones already completed
//! today, deliver the rest, exit. Intended to be driven by an external cron.

use nudge_config::NudgeConfig;
use nudge_core::NudgeError;
use nudge_engine::Engine;
use nudge_storage::Database;

use crate::channel::build_channel;

/// Runs the `nudge tick` command.
pub async fn run_tick(config: NudgeConfig) -> Result<(), NudgeError> {
    let db = Database::open_with_journal(&config.storage.database_path, config.storage.wal_mode)
        .await?;
    let engine = Engine::new(db.clone(), build_channel(&config));

    let delivered = engine.tick_now().await?;
    if delivered.is_empty() {
        println!("No reminders right now.");
    } else {
        for reminder in &delivered {
            println!("Delivered: {}", reminder.title);
        }
    }

    db.close().await?;
    Ok(())
}
