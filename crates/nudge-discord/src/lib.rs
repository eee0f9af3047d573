// SPDX-FileCopyrightText: 2026 Nudge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Discord webhook delivery channel.
//!
//! Posts one message per due reminder to a configured webhook URL. Only
//! reminders whose owner has a chat id are sent; a failed send is logged and
//! the rest of the batch is still attempted.

use async_trait::async_trait;
use tracing::{debug, warn};

use nudge_core::{DeliveryChannel, DueReminder, NudgeError};

/// Discord webhooks answer 204 No Content on success.
const WEBHOOK_SUCCESS: u16 = 204;

/// Delivery channel backed by a Discord webhook.
pub struct DiscordWebhook {
    webhook_url: String,
    client: reqwest::Client,
}

impl DiscordWebhook {
    pub fn new(webhook_url: String) -> Self {
        Self {
            webhook_url,
            client: reqwest::Client::new(),
        }
    }

    async fn send_one(&self, reminder: &DueReminder) -> Result<(), NudgeError> {
        let payload = serde_json::json!({ "content": nudge_message(&reminder.title) });
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NudgeError::Channel {
                message: "failed to send Discord webhook".to_string(),
                source: Some(Box::new(e)),
            })?;

        let status = response.status().as_u16();
        if status != WEBHOOK_SUCCESS {
            return Err(NudgeError::Channel {
                message: format!("Discord webhook returned unexpected status: {status}"),
                source: None,
            });
        }
        Ok(())
    }
}

/// The message body posted for a due reminder.
fn nudge_message(title: &str) -> String {
    format!("Hey, you haven't done **{title}** yet. Get on it!")
}

#[async_trait]
impl DeliveryChannel for DiscordWebhook {
    fn name(&self) -> &str {
        "discord"
    }

    async fn deliver(&self, due: &[DueReminder]) -> Result<(), NudgeError> {
        for reminder in due {
            if reminder.chat_id.is_none() {
                debug!(
                    reminder_id = %reminder.reminder_id,
                    "owner has no chat id, skipping Discord delivery"
                );
                continue;
            }
            match self.send_one(reminder).await {
                Ok(()) => debug!(
                    reminder_id = %reminder.reminder_id,
                    "Discord notification sent"
                ),
                // One failed send must not abandon the rest of the batch.
                Err(e) => warn!(
                    reminder_id = %reminder.reminder_id,
                    error = %e,
                    "Discord delivery failed"
                ),
            }
        }
        Ok(())
    }
}
