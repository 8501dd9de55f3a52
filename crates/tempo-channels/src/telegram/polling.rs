//! Long-polling update loop and Channel trait implementation.

use super::types::{TgResponse, TgUpdate};
use super::TelegramChannel;
use async_trait::async_trait;
use tempo_core::{
    error::TempoError,
    message::{IncomingMessage, OutgoingMessage},
    traits::Channel,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Allow-list check. Fails closed: an empty list admits nobody, so the
/// channel never forwards messages even if startup validation was skipped.
pub(crate) fn is_allowed(allowed_users: &[i64], user_id: i64) -> bool {
    allowed_users.contains(&user_id)
}

fn parse_chat_id(target: &str) -> Result<i64, TempoError> {
    target
        .parse()
        .map_err(|e| TempoError::Channel(format!("invalid telegram chat_id '{target}': {e}")))
}

fn parse_message_id(id: &str) -> Result<i64, TempoError> {
    id.parse()
        .map_err(|e| TempoError::Channel(format!("invalid telegram message_id '{id}': {e}")))
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn start(&self) -> Result<mpsc::Receiver<IncomingMessage>, TempoError> {
        let (tx, rx) = mpsc::channel(64);
        let client = self.client.clone();
        let base_url = self.base_url.clone();
        let allowed_users = self.config.allowed_users.clone();
        let last_update_id = self.last_update_id.clone();

        info!("Telegram channel starting long polling...");

        tokio::spawn(async move {
            let mut backoff_secs: u64 = 1;

            loop {
                let last = last_update_id.lock().await;
                let offset = last.map(|id| id + 1);
                drop(last);

                let mut url = format!("{base_url}/getUpdates?timeout=30");
                if let Some(off) = offset {
                    url.push_str(&format!("&offset={off}"));
                }

                let resp = match client
                    .get(&url)
                    .timeout(std::time::Duration::from_secs(35))
                    .send()
                    .await
                {
                    Ok(r) => r,
                    Err(e) => {
                        error!("telegram poll error (retry in {backoff_secs}s): {e}");
                        tokio::time::sleep(std::time::Duration::from_secs(backoff_secs)).await;
                        backoff_secs = (backoff_secs * 2).min(60);
                        continue;
                    }
                };

                let body: TgResponse<Vec<TgUpdate>> = match resp.json().await {
                    Ok(b) => b,
                    Err(e) => {
                        error!("telegram parse error (retry in {backoff_secs}s): {e}");
                        tokio::time::sleep(std::time::Duration::from_secs(backoff_secs)).await;
                        backoff_secs = (backoff_secs * 2).min(60);
                        continue;
                    }
                };

                if !body.ok {
                    error!(
                        "telegram API error (retry in {backoff_secs}s): {}",
                        body.description.unwrap_or_default()
                    );
                    tokio::time::sleep(std::time::Duration::from_secs(backoff_secs)).await;
                    backoff_secs = (backoff_secs * 2).min(60);
                    continue;
                }

                // Successful poll -- reset backoff.
                backoff_secs = 1;

                let updates = body.result.unwrap_or_default();

                if let Some(last_update) = updates.last() {
                    *last_update_id.lock().await = Some(last_update.update_id);
                }

                for update in updates {
                    // Button presses on the countdown control: acknowledge
                    // and move on, nothing else happens.
                    if let Some(cb) = update.callback_query {
                        debug!(
                            "acknowledging countdown button press (data: {:?})",
                            cb.data
                        );
                        answer_callback_query(&client, &base_url, &cb.id).await;
                        continue;
                    }

                    let msg = match update.message {
                        Some(m) => m,
                        None => continue,
                    };

                    let text = match msg.text {
                        Some(t) => t,
                        None => continue,
                    };

                    let user = match msg.from {
                        Some(u) => u,
                        None => continue,
                    };

                    // Auth check. Unauthorized senders are dropped with no
                    // side effects.
                    if !is_allowed(&allowed_users, user.id) {
                        warn!("ignoring message from unauthorized user {}", user.id);
                        continue;
                    }

                    let sender_name = if let Some(ref un) = user.username {
                        format!("@{un}")
                    } else if let Some(ref ln) = user.last_name {
                        format!("{} {ln}", user.first_name)
                    } else {
                        user.first_name.clone()
                    };

                    let incoming = IncomingMessage {
                        id: Uuid::new_v4(),
                        channel: "telegram".to_string(),
                        sender_id: user.id.to_string(),
                        sender_name: Some(sender_name),
                        text,
                        timestamp: chrono::Utc::now(),
                        reply_target: msg.chat.id.to_string(),
                        message_id: msg.message_id.to_string(),
                    };

                    if tx.send(incoming).await.is_err() {
                        info!("telegram channel receiver dropped, stopping poll");
                        return;
                    }
                }
            }
        });

        Ok(rx)
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), TempoError> {
        let chat_id_str = message
            .reply_target
            .as_deref()
            .ok_or_else(|| TempoError::Channel("no reply_target on outgoing message".into()))?;
        let chat_id = parse_chat_id(chat_id_str)?;

        let reply_to = match message.reply_to.as_deref() {
            Some(id) => Some(parse_message_id(id)?),
            None => None,
        };

        self.send_text(chat_id, &message.text, reply_to).await
    }

    async fn post_countdown(
        &self,
        target: &str,
        caption: &str,
        label: &str,
    ) -> Result<String, TempoError> {
        let chat_id = parse_chat_id(target)?;
        let message_id = self.post_countdown_message(chat_id, caption, label).await?;
        Ok(message_id.to_string())
    }

    async fn pin_message(&self, target: &str, message_id: &str) -> Result<(), TempoError> {
        let chat_id = parse_chat_id(target)?;
        let message_id = parse_message_id(message_id)?;
        self.pin_chat_message(chat_id, message_id).await
    }

    async fn update_countdown(
        &self,
        target: &str,
        message_id: &str,
        label: &str,
    ) -> Result<(), TempoError> {
        let chat_id = parse_chat_id(target)?;
        let message_id = parse_message_id(message_id)?;
        self.edit_countdown_button(chat_id, message_id, label).await
    }

    async fn stop(&self) -> Result<(), TempoError> {
        info!("Telegram channel stopped");
        Ok(())
    }
}

/// Acknowledge an inline button press (clears the client's spinner).
/// Best-effort: logs failures but does not propagate errors.
async fn answer_callback_query(client: &reqwest::Client, base_url: &str, callback_id: &str) {
    let url = format!("{base_url}/answerCallbackQuery");
    let body = serde_json::json!({ "callback_query_id": callback_id });

    match client.post(&url).json(&body).send().await {
        Ok(resp) if resp.status().is_success() => {}
        Ok(resp) => {
            let text = resp.text().await.unwrap_or_default();
            warn!("failed to answer callback query: {text}");
        }
        Err(e) => {
            warn!("failed to answer callback query: {e}");
        }
    }
}
