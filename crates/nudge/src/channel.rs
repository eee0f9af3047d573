// SPDX-FileCopyrightText: 2026 Nudge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery channel selection from configuration.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use nudge_config::NudgeConfig;
use nudge_core::{DeliveryChannel, DueReminder, NudgeError};
use nudge_discord::DiscordWebhook;

/// Pick the configured delivery channel.
///
/// Falls back to log-only delivery when no webhook is configured, so `tick`
/// and `serve` remain usable during local development.
pub fn build_channel(config: &NudgeConfig) -> Arc<dyn DeliveryChannel> {
    match &config.discord.webhook_url {
        Some(url) => Arc::new(DiscordWebhook::new(url.clone())),
        None => {
            warn!("discord.webhook_url not set, due reminders will only be logged");
            Arc::new(LogDelivery)
        }
    }
}

/// Delivery channel that only logs, for development and dry runs.
struct LogDelivery;

#[async_trait]
impl DeliveryChannel for LogDelivery {
    fn name(&self) -> &str {
        "log"
    }

    async fn deliver(&self, due: &[DueReminder]) -> Result<(), NudgeError> {
        for reminder in due {
            info!(
                reminder_id = %reminder.reminder_id,
                user_id = %reminder.user_id,
                title = %reminder.title,
                "due reminder"
            );
        }
        Ok(())
    }
}
