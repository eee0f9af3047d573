// SPDX-FileCopyrightText: 2026 Nudge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Nudge workspace.
//!
//! Row shapes are decoded into these records once, at the storage boundary.
//! No query result leaves `nudge-storage` as anything but one of these.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A user who owns reminders and receives deliveries.
///
/// Created and mutated externally; read-only inside this engine. At least one
/// contact field is expected to be set, but that is not enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    /// Chat-platform identifier (e.g. a Discord user id). Opaque exact string,
    /// unique when present.
    pub chat_id: Option<String>,
    /// Phone number in whatever form the SMS gateway uses. Opaque exact
    /// string, unique when present; no normalization is performed here.
    pub phone: Option<String>,
    pub created_at: String,
}

/// A recurring reminder schedule.
///
/// `days_of_week` uses Monday=0 .. Sunday=6. `fire_times` are times of day
/// with no date component, formatted `HH:MM` or `HH:MM:SS`. Both must be
/// non-empty for the reminder to ever fire; `active = false` reminders are
/// never selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub active: bool,
    pub days_of_week: Vec<u8>,
    pub fire_times: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A persisted fact that a user finished a reminder on a calendar date.
///
/// At most one exists per (reminder_id, user_id, completed_on); the date in
/// the key is what resets completion state each new day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub reminder_id: String,
    pub user_id: String,
    pub completed_on: NaiveDate,
}

/// A reminder that is due right now, joined with its owner's contact fields.
///
/// This is what the due-reminder selector returns and what delivery channels
/// consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueReminder {
    pub reminder_id: String,
    pub title: String,
    pub user_id: String,
    pub chat_id: Option<String>,
    pub phone: Option<String>,
}

/// Result of recording an inbound completion event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The completion was attributed and recorded (or already existed today).
    Recorded,
    /// No user matched the supplied credential. Normal outcome, not an error.
    UnknownUser,
}
