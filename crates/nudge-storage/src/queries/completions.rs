// SPDX-FileCopyrightText: 2026 Nudge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion ledger: at most one completion per reminder, user, and day.

use chrono::NaiveDate;
use nudge_core::NudgeError;
use rusqlite::params;

use crate::database::Database;
use crate::models::Completion;

/// True iff a completion exists for the pair on the given calendar date.
pub async fn is_completed_on(
    db: &Database,
    reminder_id: &str,
    user_id: &str,
    day: NaiveDate,
) -> Result<bool, NudgeError> {
    let reminder_id = reminder_id.to_string();
    let user_id = user_id.to_string();
    let day = day.format("%Y-%m-%d").to_string();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            conn.query_row(
                "SELECT EXISTS (
                     SELECT 1 FROM completions
                     WHERE reminder_id = ?1 AND user_id = ?2 AND completed_on = ?3
                 )",
                params![reminder_id, user_id, day],
                |row| row.get(0),
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Idempotently record a completion for the pair on the given calendar date.
///
/// The insert itself is the race-safe operation: the schema's UNIQUE
/// constraint plus `ON CONFLICT DO NOTHING` makes a duplicate a silent no-op
/// with post-state identical to the first write. There is no check-then-insert
/// gap for concurrent callers to fall into.
///
/// Referencing an unknown reminder or user yields `InvalidReference`.
pub async fn mark_completed_on(
    db: &Database,
    reminder_id: &str,
    user_id: &str,
    day: NaiveDate,
) -> Result<(), NudgeError> {
    let reminder = reminder_id.to_string();
    let user = user_id.to_string();
    let day = day.format("%Y-%m-%d").to_string();
    let references_ok = db
        .connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let result = conn.execute(
                "INSERT INTO completions (reminder_id, user_id, completed_on)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT (reminder_id, user_id, completed_on) DO NOTHING",
                params![reminder, user, day],
            );
            match result {
                Ok(_) => Ok(true),
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
                {
                    Ok(false)
                }
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    if !references_ok {
        return Err(NudgeError::InvalidReference {
            message: format!("unknown reminder `{reminder_id}` or user `{user_id}`"),
        });
    }
    Ok(())
}

/// All completions recorded on the given calendar date.
///
/// Reporting primitive; the scheduler itself only needs the EXISTS check.
pub async fn completions_for_day(
    db: &Database,
    day: NaiveDate,
) -> Result<Vec<Completion>, NudgeError> {
    let day_str = day.format("%Y-%m-%d").to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT reminder_id, user_id, completed_on FROM completions
                 WHERE completed_on = ?1
                 ORDER BY created_at ASC",
            )?;
            let rows = stmt.query_map(params![day_str], |row| {
                let completed_on: String = row.get(2)?;
                let completed_on = NaiveDate::parse_from_str(&completed_on, "%Y-%m-%d")
                    .map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            2,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?;
                Ok(Completion {
                    reminder_id: row.get(0)?,
                    user_id: row.get(1)?,
                    completed_on,
                })
            })?;
            let mut completions = Vec::new();
            for row in rows {
                completions.push(row?);
            }
            Ok(completions)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Reminder, User};
    use crate::queries::reminders::create_reminder;
    use crate::queries::users::create_user;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();

        let user = User {
            id: "user-1".to_string(),
            chat_id: Some("111222333".to_string()),
            phone: None,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        };
        create_user(&db, &user).await.unwrap();

        let reminder = Reminder {
            id: "rem-1".to_string(),
            user_id: "user-1".to_string(),
            title: "Stretch".to_string(),
            active: true,
            days_of_week: vec![0, 1, 2, 3, 4],
            fire_times: vec!["09:00".to_string()],
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            updated_at: "2026-01-01T00:00:00.000Z".to_string(),
        };
        create_reminder(&db, &reminder).await.unwrap();

        (db, dir)
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn completion_count(db: &Database) -> i64 {
        db.connection()
            .call(|conn| -> Result<i64, rusqlite::Error> {
                conn.query_row("SELECT COUNT(*) FROM completions", [], |row| row.get(0))
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn mark_then_check_roundtrips() {
        let (db, _dir) = setup_db().await;
        let today = day(2026, 8, 26);

        assert!(!is_completed_on(&db, "rem-1", "user-1", today).await.unwrap());
        mark_completed_on(&db, "rem-1", "user-1", today).await.unwrap();
        assert!(is_completed_on(&db, "rem-1", "user-1", today).await.unwrap());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn double_mark_same_day_is_silent_noop() {
        let (db, _dir) = setup_db().await;
        let today = day(2026, 8, 26);

        mark_completed_on(&db, "rem-1", "user-1", today).await.unwrap();
        // Second write must not error and must not add a row.
        mark_completed_on(&db, "rem-1", "user-1", today).await.unwrap();

        assert_eq!(completion_count(&db).await, 1);
        assert!(is_completed_on(&db, "rem-1", "user-1", today).await.unwrap());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn yesterdays_completion_does_not_count_today() {
        let (db, _dir) = setup_db().await;
        let yesterday = day(2026, 8, 25);
        let today = day(2026, 8, 26);

        mark_completed_on(&db, "rem-1", "user-1", yesterday)
            .await
            .unwrap();

        assert!(!is_completed_on(&db, "rem-1", "user-1", today).await.unwrap());
        assert!(
            is_completed_on(&db, "rem-1", "user-1", yesterday)
                .await
                .unwrap()
        );

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn unknown_reminder_is_invalid_reference() {
        let (db, _dir) = setup_db().await;

        let err = mark_completed_on(&db, "no-such-reminder", "user-1", day(2026, 8, 26))
            .await
            .unwrap_err();
        assert!(matches!(err, NudgeError::InvalidReference { .. }));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn unknown_user_is_invalid_reference() {
        let (db, _dir) = setup_db().await;

        let err = mark_completed_on(&db, "rem-1", "no-such-user", day(2026, 8, 26))
            .await
            .unwrap_err();
        assert!(matches!(err, NudgeError::InvalidReference { .. }));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn completions_for_day_returns_typed_records() {
        let (db, _dir) = setup_db().await;
        let today = day(2026, 8, 26);
        let yesterday = day(2026, 8, 25);

        mark_completed_on(&db, "rem-1", "user-1", today).await.unwrap();
        mark_completed_on(&db, "rem-1", "user-1", yesterday)
            .await
            .unwrap();

        let completions = completions_for_day(&db, today).await.unwrap();
        assert_eq!(completions.len(), 1);
        assert_eq!(
            completions[0],
            Completion {
                reminder_id: "rem-1".to_string(),
                user_id: "user-1".to_string(),
                completed_on: today,
            }
        );

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn concurrent_marks_produce_exactly_one_row() {
        let (db, _dir) = setup_db().await;
        let today = day(2026, 8, 26);

        // Simulates duplicate delivery webhooks arriving near-simultaneously.
        let mut handles = Vec::new();
        for _ in 0..8 {
            let db = db.clone();
            handles.push(tokio::spawn(async move {
                mark_completed_on(&db, "rem-1", "user-1", today).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(completion_count(&db).await, 1);
        assert!(is_completed_on(&db, "rem-1", "user-1", today).await.unwrap());

        db.close().await.unwrap();
    }
}
