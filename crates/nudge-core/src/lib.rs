// SPDX-FileCopyrightText: 2026 Nudge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Nudge reminder engine.
//!
//! Provides the error taxonomy, domain record types, and the delivery-channel
//! trait used throughout the workspace. Storage and orchestration crates
//! build on these; nothing here touches I/O.

pub mod error;
pub mod traits;
pub mod types;

pub use error::NudgeError;
pub use traits::DeliveryChannel;
pub use types::{Completion, CompletionOutcome, DueReminder, Reminder, User};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nudge_error_has_all_variants() {
        let _config = NudgeError::Config("test".into());
        let _storage = NudgeError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _invalid_arg = NudgeError::InvalidArgument("test".into());
        let _invalid_ref = NudgeError::InvalidReference {
            message: "test".into(),
        };
        let _channel = NudgeError::Channel {
            message: "test".into(),
            source: None,
        };
        let _internal = NudgeError::Internal("test".into());
    }

    #[test]
    fn due_reminder_serializes_with_optional_contacts() {
        let due = DueReminder {
            reminder_id: "rem-1".into(),
            title: "Stretch".into(),
            user_id: "user-1".into(),
            chat_id: Some("111222333".into()),
            phone: None,
        };
        let json = serde_json::to_string(&due).expect("should serialize");
        let parsed: DueReminder = serde_json::from_str(&json).expect("should deserialize");
        assert_eq!(due, parsed);
    }

    #[test]
    fn completion_outcome_distinguishes_unknown_user() {
        assert_ne!(CompletionOutcome::Recorded, CompletionOutcome::UnknownUser);
    }
}
