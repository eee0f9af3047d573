// SPDX-FileCopyrightText: 2026 Nudge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery channel trait for notification backends (Discord webhook, SMS, etc.).

use async_trait::async_trait;

use crate::error::NudgeError;
use crate::types::DueReminder;

/// Adapter for outbound reminder delivery.
///
/// The engine hands each tick's filtered due set to a channel and observes no
/// return value beyond success/failure. Delivery success does NOT imply
/// completion -- completion arrives separately through an inbound event.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Human-readable name of this channel instance (for logs).
    fn name(&self) -> &str;

    /// Deliver a batch of due reminders.
    ///
    /// A channel should attempt every reminder in the batch; a single failed
    /// send must not abandon the rest. Returns an error only if the batch as
    /// a whole could not be attempted.
    async fn deliver(&self, due: &[DueReminder]) -> Result<(), NudgeError>;
}
