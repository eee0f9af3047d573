// SPDX-FileCopyrightText: 2026 Nudge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scheduling engine for the Nudge reminder system.
//!
//! The engine is the composition root: an external periodic trigger drives
//! [`Engine::tick`], which fetches the due set, drops reminders already
//! completed today, and hands the remainder to the delivery channel. Inbound
//! completion events (Discord reply, SMS callback) arrive independently
//! through [`Engine::handle_completion`]; delivery success never implies
//! completion.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tracing::{debug, info};

use nudge_core::{CompletionOutcome, DeliveryChannel, DueReminder, NudgeError};
use nudge_storage::Database;
use nudge_storage::queries::{completions, reminders, users};

/// The scheduling engine.
///
/// Cheap to clone: clones share the database handle and channel. Each tick
/// runs fetch -> filter -> deliver and returns to idle; all store access
/// completes before the channel is invoked, so no connection is held across
/// the delivery call.
#[derive(Clone)]
pub struct Engine {
    db: Database,
    channel: Arc<dyn DeliveryChannel>,
}

impl Engine {
    pub fn new(db: Database, channel: Arc<dyn DeliveryChannel>) -> Self {
        Self { db, channel }
    }

    /// Run one tick at the current local wall-clock instant.
    pub async fn tick_now(&self) -> Result<Vec<DueReminder>, NudgeError> {
        self.tick(Local::now().naive_local()).await
    }

    /// Run one tick at the given instant.
    ///
    /// Returns the filtered set that was handed to the delivery channel
    /// (empty when nothing was due or everything was already completed).
    pub async fn tick(&self, now: NaiveDateTime) -> Result<Vec<DueReminder>, NudgeError> {
        debug!(%now, "tick: fetching due reminders");
        let due = reminders::get_due_reminders(&self.db, now).await?;

        let today = now.date();
        let mut ready = Vec::with_capacity(due.len());
        for reminder in due {
            if completions::is_completed_on(&self.db, &reminder.reminder_id, &reminder.user_id, today)
                .await?
            {
                debug!(
                    reminder_id = %reminder.reminder_id,
                    user_id = %reminder.user_id,
                    "skipping reminder already completed today"
                );
                continue;
            }
            ready.push(reminder);
        }

        if ready.is_empty() {
            debug!("tick: nothing due");
            return Ok(ready);
        }

        self.channel.deliver(&ready).await?;
        info!(
            count = ready.len(),
            channel = self.channel.name(),
            "handed due reminders to delivery channel"
        );
        Ok(ready)
    }

    /// Attribute an inbound completion event and record it for today.
    ///
    /// Exactly one of `chat_id` / `phone` identifies the user; an unmatched
    /// credential is the normal [`CompletionOutcome::UnknownUser`] outcome,
    /// not an error. Recording is idempotent per day.
    pub async fn handle_completion(
        &self,
        chat_id: Option<&str>,
        phone: Option<&str>,
        reminder_id: &str,
    ) -> Result<CompletionOutcome, NudgeError> {
        let Some(user) = users::resolve_user(&self.db, chat_id, phone).await? else {
            debug!("completion event for unknown user");
            return Ok(CompletionOutcome::UnknownUser);
        };

        let today = Local::now().date_naive();
        completions::mark_completed_on(&self.db, reminder_id, &user.id, today).await?;
        info!(reminder_id, user_id = %user.id, "completion recorded");
        Ok(CompletionOutcome::Recorded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use nudge_core::{Reminder, User};
    use std::sync::Mutex;
    use tempfile::tempdir;

    /// Records every batch handed to it; optionally fails.
    struct RecordingChannel {
        batches: Mutex<Vec<Vec<DueReminder>>>,
        fail: bool,
    }

    impl RecordingChannel {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                batches: Mutex::new(Vec::new()),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                batches: Mutex::new(Vec::new()),
                fail: true,
            })
        }

        fn batches(&self) -> Vec<Vec<DueReminder>> {
            self.batches.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DeliveryChannel for RecordingChannel {
        fn name(&self) -> &str {
            "recording"
        }

        async fn deliver(&self, due: &[DueReminder]) -> Result<(), NudgeError> {
            if self.fail {
                return Err(NudgeError::Channel {
                    message: "simulated delivery failure".to_string(),
                    source: None,
                });
            }
            self.batches.lock().unwrap().push(due.to_vec());
            Ok(())
        }
    }

    // 2026-08-26 is a Wednesday (weekday code 2).
    fn wednesday_0903() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 26)
            .unwrap()
            .and_hms_opt(9, 3, 0)
            .unwrap()
    }

    async fn seed_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("engine_test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();

        let user = User {
            id: "user-1".to_string(),
            chat_id: Some("111222333".to_string()),
            phone: Some("+15551234567".to_string()),
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        };
        users::create_user(&db, &user).await.unwrap();

        let reminder = Reminder {
            id: "rem-1".to_string(),
            user_id: "user-1".to_string(),
            title: "Stretch".to_string(),
            active: true,
            days_of_week: vec![2],
            fire_times: vec!["09:00".to_string()],
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            updated_at: "2026-01-01T00:00:00.000Z".to_string(),
        };
        reminders::create_reminder(&db, &reminder).await.unwrap();

        (db, dir)
    }

    #[tokio::test]
    async fn tick_delivers_due_uncompleted_reminders() {
        let (db, _dir) = seed_db().await;
        let channel = RecordingChannel::new();
        let engine = Engine::new(db, channel.clone());

        let ready = engine.tick(wednesday_0903()).await.unwrap();
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].reminder_id, "rem-1");

        let batches = channel.batches();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0], ready);
    }

    #[tokio::test]
    async fn tick_skips_reminders_completed_today() {
        let (db, _dir) = seed_db().await;
        let today = NaiveDate::from_ymd_opt(2026, 8, 26).unwrap();
        completions::mark_completed_on(&db, "rem-1", "user-1", today)
            .await
            .unwrap();

        let channel = RecordingChannel::new();
        let engine = Engine::new(db, channel.clone());

        let ready = engine.tick(wednesday_0903()).await.unwrap();
        assert!(ready.is_empty());
        // Empty ticks never invoke the channel.
        assert!(channel.batches().is_empty());
    }

    #[tokio::test]
    async fn tick_with_nothing_due_does_not_touch_channel() {
        let (db, _dir) = seed_db().await;
        let channel = RecordingChannel::new();
        let engine = Engine::new(db, channel.clone());

        // Thursday: day-of-week does not match.
        let thursday = NaiveDate::from_ymd_opt(2026, 8, 27)
            .unwrap()
            .and_hms_opt(9, 3, 0)
            .unwrap();
        let ready = engine.tick(thursday).await.unwrap();
        assert!(ready.is_empty());
        assert!(channel.batches().is_empty());
    }

    #[tokio::test]
    async fn delivery_failure_surfaces_and_marks_nothing() {
        let (db, _dir) = seed_db().await;
        let channel = RecordingChannel::failing();
        let engine = Engine::new(db.clone(), channel);

        let err = engine.tick(wednesday_0903()).await.unwrap_err();
        assert!(matches!(err, NudgeError::Channel { .. }));

        // Failed delivery must not record a completion; the reminder is
        // still due on the next tick.
        let today = NaiveDate::from_ymd_opt(2026, 8, 26).unwrap();
        assert!(
            !completions::is_completed_on(&db, "rem-1", "user-1", today)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn successful_delivery_does_not_mark_completed() {
        let (db, _dir) = seed_db().await;
        let channel = RecordingChannel::new();
        let engine = Engine::new(db.clone(), channel.clone());

        engine.tick(wednesday_0903()).await.unwrap();

        // "Was it sent" is decoupled from "was it done": a second tick in the
        // same window re-delivers.
        let ready = engine.tick(wednesday_0903()).await.unwrap();
        assert_eq!(ready.len(), 1);
        assert_eq!(channel.batches().len(), 2);
    }

    #[tokio::test]
    async fn handle_completion_records_for_resolved_user() {
        let (db, _dir) = seed_db().await;
        let engine = Engine::new(db.clone(), RecordingChannel::new());

        let outcome = engine
            .handle_completion(Some("111222333"), None, "rem-1")
            .await
            .unwrap();
        assert_eq!(outcome, CompletionOutcome::Recorded);

        let today = Local::now().date_naive();
        assert!(
            completions::is_completed_on(&db, "rem-1", "user-1", today)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn handle_completion_unknown_credential_is_not_an_error() {
        let (db, _dir) = seed_db().await;
        let engine = Engine::new(db, RecordingChannel::new());

        let outcome = engine
            .handle_completion(None, Some("+19998887777"), "rem-1")
            .await
            .unwrap();
        assert_eq!(outcome, CompletionOutcome::UnknownUser);
    }

    #[tokio::test]
    async fn handle_completion_requires_exactly_one_selector() {
        let (db, _dir) = seed_db().await;
        let engine = Engine::new(db, RecordingChannel::new());

        let err = engine
            .handle_completion(None, None, "rem-1")
            .await
            .unwrap_err();
        assert!(matches!(err, NudgeError::InvalidArgument(_)));

        let err = engine
            .handle_completion(Some("111222333"), Some("+15551234567"), "rem-1")
            .await
            .unwrap_err();
        assert!(matches!(err, NudgeError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn duplicate_completion_events_are_idempotent() {
        let (db, _dir) = seed_db().await;
        let engine = Engine::new(db.clone(), RecordingChannel::new());

        engine
            .handle_completion(Some("111222333"), None, "rem-1")
            .await
            .unwrap();
        engine
            .handle_completion(Some("111222333"), None, "rem-1")
            .await
            .unwrap();

        let count: i64 = db
            .connection()
            .call(|conn| -> Result<i64, rusqlite::Error> {
                conn.query_row("SELECT COUNT(*) FROM completions", [], |row| row.get(0))
            })
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
