// SPDX-FileCopyrightText: 2026 Nudge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Due-reminder selector: which reminders match "now".

use chrono::{Datelike, Duration, NaiveDateTime, Timelike};
use nudge_core::NudgeError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{DueReminder, Reminder};

/// Tolerance around the evaluation instant, inclusive on both sides.
///
/// Absorbs the external trigger not firing on an exact minute boundary.
/// Policy constant, not configuration.
const DUE_WINDOW_MINUTES: i64 = 5;

/// Create a new reminder.
///
/// Reminder editing is managed externally; this primitive is the store
/// operation such an editor writes through.
pub async fn create_reminder(db: &Database, reminder: &Reminder) -> Result<(), NudgeError> {
    let reminder = reminder.clone();
    let days_of_week = encode_json(&reminder.days_of_week)?;
    let fire_times = encode_json(&reminder.fire_times)?;
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO reminders (id, user_id, title, active, days_of_week, fire_times,
                                        created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    reminder.id,
                    reminder.user_id,
                    reminder.title,
                    reminder.active,
                    days_of_week,
                    fire_times,
                    reminder.created_at,
                    reminder.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Activate or deactivate a reminder.
pub async fn set_active(db: &Database, id: &str, active: bool) -> Result<(), NudgeError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE reminders SET active = ?1,
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?2",
                params![active, id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Select all reminders due at `now`, joined with owner contact fields.
///
/// A reminder is due iff it is active, `now`'s weekday (Monday=0) is in its
/// days_of_week, and some fire_time falls within an inclusive ±5-minute
/// window of `now`'s time-of-day. Comparison is time-only: the window bounds
/// wrap modulo 24h but the BETWEEN does not wrap across midnight, so a
/// 00:02 fire time never matches 23:58 the prior day.
///
/// An empty result is normal ("nothing due right now"). Ordering is
/// unspecified.
pub async fn get_due_reminders(
    db: &Database,
    now: NaiveDateTime,
) -> Result<Vec<DueReminder>, NudgeError> {
    // Monday=0 .. Sunday=6.
    let today_dow = i64::from(now.weekday().num_days_from_monday());
    let time_of_day = now.time().with_nanosecond(0).unwrap_or(now.time());
    let window = Duration::minutes(DUE_WINDOW_MINUTES);
    let lower = (time_of_day - window).format("%H:%M:%S").to_string();
    let upper = (time_of_day + window).format("%H:%M:%S").to_string();

    db.connection()
        .call(move |conn| {
            // time() normalizes HH:MM fire times to HH:MM:SS so the inclusive
            // boundary compares exactly.
            let mut stmt = conn.prepare(
                "SELECT r.id, r.title, r.user_id, u.chat_id, u.phone
                 FROM reminders r
                 JOIN users u ON u.id = r.user_id
                 WHERE r.active = 1
                   AND EXISTS (
                       SELECT 1 FROM json_each(r.days_of_week)
                       WHERE json_each.value = ?1
                   )
                   AND EXISTS (
                       SELECT 1 FROM json_each(r.fire_times)
                       WHERE time(json_each.value) BETWEEN time(?2) AND time(?3)
                   )",
            )?;
            let rows = stmt.query_map(params![today_dow, lower, upper], |row| {
                Ok(DueReminder {
                    reminder_id: row.get(0)?,
                    title: row.get(1)?,
                    user_id: row.get(2)?,
                    chat_id: row.get(3)?,
                    phone: row.get(4)?,
                })
            })?;
            let mut due = Vec::new();
            for row in rows {
                due.push(row?);
            }
            Ok(due)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

fn encode_json<T: serde::Serialize>(value: &T) -> Result<String, NudgeError> {
    serde_json::to_string(value)
        .map_err(|e| NudgeError::Internal(format!("failed to encode JSON column: {e}")))
}
