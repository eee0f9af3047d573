// SPDX-FileCopyrightText: 2026 Nudge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `nudge serve` command implementation.
//!
//! Runs the scheduler on a fixed interval and serves the completion-event
//! webhook. Completion events mark reminders done for/by a user; delivery
//! confirmations never do.

use std::time::Duration;

use axum::http::StatusCode;
use axum::{Json, Router, extract::State, routing::post};
use serde::Deserialize;
use tracing::{error, info};

use nudge_config::NudgeConfig;
use nudge_core::{CompletionOutcome, NudgeError};
use nudge_engine::Engine;
use nudge_storage::Database;

use crate::channel::build_channel;

/// Runs the `nudge serve` command.
pub async fn run_serve(config: NudgeConfig) -> Result<(), NudgeError> {
    let db = Database::open_with_journal(&config.storage.database_path, config.storage.wal_mode)
        .await?;
    let engine = Engine::new(db, build_channel(&config));

    let app = router(engine.clone());
    let listener = tokio::net::TcpListener::bind(&config.http.bind_address)
        .await
        .map_err(|e| {
            NudgeError::Internal(format!(
                "failed to bind {}: {e}",
                config.http.bind_address
            ))
        })?;
    info!(addr = %config.http.bind_address, "completion webhook listening");

    let server = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "completion webhook server exited");
        }
    });

    let mut interval =
        tokio::time::interval(Duration::from_secs(config.engine.tick_interval_secs));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    info!(
        interval_secs = config.engine.tick_interval_secs,
        "scheduler running"
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {
                // A failed tick is logged and retried at the next interval;
                // retry policy belongs to the trigger layer, not the engine.
                if let Err(e) = engine.tick_now().await {
                    error!(error = %e, "tick failed");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    server.abort();
    Ok(())
}

/// Build the completion webhook router.
fn router(engine: Engine) -> Router {
    Router::new()
        .route("/completions", post(handle_completion_event))
        .with_state(engine)
}

/// Inbound completion event from a chat platform or SMS gateway.
///
/// Exactly one of `chat_id` / `phone` attributes the event to a user.
#[derive(Debug, Deserialize)]
struct CompletionEvent {
    reminder_id: String,
    #[serde(default)]
    chat_id: Option<String>,
    #[serde(default)]
    phone: Option<String>,
}

async fn handle_completion_event(
    State(engine): State<Engine>,
    Json(event): Json<CompletionEvent>,
) -> (StatusCode, String) {
    match engine
        .handle_completion(
            event.chat_id.as_deref(),
            event.phone.as_deref(),
            &event.reminder_id,
        )
        .await
    {
        Ok(CompletionOutcome::Recorded) => (StatusCode::NO_CONTENT, String::new()),
        Ok(CompletionOutcome::UnknownUser) => {
            (StatusCode::NOT_FOUND, "unknown user".to_string())
        }
        Err(NudgeError::InvalidArgument(message)) => (StatusCode::BAD_REQUEST, message),
        Err(NudgeError::InvalidReference { message }) => (StatusCode::NOT_FOUND, message),
        Err(e) => {
            error!(error = %e, "completion event failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_string(),
            )
        }
    }
}
