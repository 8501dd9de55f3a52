//! Gateway — the event loop connecting the channel to the intent resolver
//! and the countdown tasks.

mod countdown;
mod pipeline;
mod trigger;

use std::sync::Arc;
use tempo_core::{
    config::Config,
    error::TempoError,
    traits::{Channel, Provider},
};
use tracing::info;

/// Routes trigger messages into countdowns.
pub struct Gateway {
    provider: Arc<dyn Provider>,
    channel: Arc<dyn Channel>,
    /// Chat where countdown messages are posted and pinned.
    group_target: String,
    trigger: trigger::TriggerWord,
}

impl Gateway {
    /// Create a new gateway. Fails when the configured trigger word does
    /// not compile into a matcher.
    pub fn new(
        provider: Arc<dyn Provider>,
        channel: Arc<dyn Channel>,
        config: &Config,
    ) -> Result<Self, TempoError> {
        let group_chat_id = config
            .channel
            .telegram
            .as_ref()
            .map(|tg| tg.group_chat_id)
            .ok_or_else(|| TempoError::Config("telegram channel is not configured".into()))?;
        let trigger = trigger::TriggerWord::new(&config.timer.trigger_word)?;

        Ok(Self {
            provider,
            channel,
            group_target: group_chat_id.to_string(),
            trigger,
        })
    }

    /// Run the main event loop.
    pub async fn run(self: Arc<Self>) -> anyhow::Result<()> {
        info!(
            "Tempo gateway running | provider: {} | channel: {} | trigger: {:?} | countdown chat: {}",
            self.provider.name(),
            self.channel.name(),
            self.trigger.word(),
            self.group_target,
        );

        let mut rx = self
            .channel
            .start()
            .await
            .map_err(|e| anyhow::anyhow!("failed to start channel: {e}"))?;

        // Each message is handled on its own task: a slow completion call
        // stalls only that message, never the poll loop or running
        // countdowns.
        while let Some(msg) = rx.recv().await {
            let gw = self.clone();
            tokio::spawn(async move {
                gw.handle_message(msg).await;
            });
        }

        info!("channel receiver closed, shutting down");
        self.channel.stop().await?;
        Ok(())
    }
}
