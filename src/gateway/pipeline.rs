//! Message processing pipeline — trigger filter, intent resolution, and
//! the countdown announcement.

use super::countdown::{self, TimerJob};
use super::Gateway;
use chrono::{Duration, Utc};
use tempo_core::{context::Context, message::IncomingMessage};
use tempo_providers::intent::{parse_intent, TimerIntent, INTENT_SYSTEM_PROMPT};
use tracing::{debug, error, info, warn};

impl Gateway {
    /// Process a single incoming message through the full pipeline.
    pub(super) async fn handle_message(&self, incoming: IncomingMessage) {
        let preview = if incoming.text.chars().count() > 60 {
            let truncated: String = incoming.text.chars().take(60).collect();
            format!("{truncated}...")
        } else {
            incoming.text.clone()
        };
        info!(
            "[{}] {} says: {}",
            incoming.channel,
            incoming.sender_name.as_deref().unwrap_or("unknown"),
            preview
        );

        // --- 1. TRIGGER FILTER ---
        // The channel already dropped non-allow-listed senders.
        if !self.trigger.matches(&incoming.text) {
            debug!("no trigger word, ignoring");
            return;
        }

        // --- 2. INTENT RESOLUTION ---
        // The AI is untrusted and optional: a failed call takes the same
        // fallback path as an unparsable response.
        let ctx = Context::new(INTENT_SYSTEM_PROMPT, &incoming.text);
        let raw = match self.provider.complete(&ctx).await {
            Ok(resp) => {
                debug!(
                    "intent resolved in {}ms (model: {})",
                    resp.metadata.processing_time_ms,
                    resp.metadata.model.as_deref().unwrap_or("unknown")
                );
                resp.text
            }
            Err(e) => {
                error!("intent call failed, using defaults: {e}");
                String::new()
            }
        };

        let (duration_secs, caption, answer) = match parse_intent(&raw) {
            TimerIntent::Skip => {
                info!("AI reported no timer intent, doing nothing");
                return;
            }
            TimerIntent::Countdown {
                duration_secs,
                caption,
                answer,
            } => (duration_secs, caption, answer),
        };

        info!("starting {duration_secs}s countdown: {caption}");

        // --- 3. COUNTDOWN ANNOUNCEMENT ---
        self.announce(&incoming, duration_secs, caption, answer)
            .await;
    }

    /// Post the countdown message, pin it best-effort, and spawn the
    /// updater task.
    async fn announce(
        &self,
        incoming: &IncomingMessage,
        duration_secs: u64,
        caption: String,
        answer: String,
    ) {
        let label = countdown::button_label(duration_secs as i64);
        let message_id = match self
            .channel
            .post_countdown(&self.group_target, &caption, &label)
            .await
        {
            Ok(id) => id,
            Err(e) => {
                error!("failed to post countdown message: {e}");
                return;
            }
        };

        if let Err(e) = self
            .channel
            .pin_message(&self.group_target, &message_id)
            .await
        {
            warn!("failed to pin countdown message {message_id}: {e}");
        }

        let job = TimerJob {
            group_target: self.group_target.clone(),
            message_id,
            finish_time: Utc::now()
                + Duration::seconds(duration_secs as i64 + countdown::SCHEDULING_SLACK_SECS),
            source_target: incoming.reply_target.clone(),
            source_message_id: incoming.message_id.clone(),
            answer,
            changed_interval: false,
        };

        let channel = self.channel.clone();
        let tick = countdown::initial_tick_secs(duration_secs);
        tokio::spawn(async move {
            countdown::countdown_loop(channel, job, tick).await;
        });
    }
}
