//! Message sending: text replies, the countdown post, pinning, and
//! in-place button edits.

use super::types::{TgMessage, TgResponse};
use super::TelegramChannel;
use crate::utils::split_message;
use tempo_core::error::TempoError;

/// The callback_data carried by the countdown button. Presses are
/// acknowledged and otherwise ignored.
pub(crate) const COUNTDOWN_CALLBACK: &str = "timer";

/// Build the single-button inline keyboard for a countdown message.
pub(crate) fn countdown_markup(label: &str) -> serde_json::Value {
    serde_json::json!({
        "inline_keyboard": [[
            { "text": label, "callback_data": COUNTDOWN_CALLBACK }
        ]]
    })
}

impl TelegramChannel {
    /// Send a text message, optionally as a reply.
    ///
    /// `allow_sending_without_reply` keeps delivery working when the
    /// replied-to message has been deleted in the meantime.
    pub(crate) async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i64>,
    ) -> Result<(), TempoError> {
        let chunks = split_message(text, 4096);

        for (i, chunk) in chunks.iter().enumerate() {
            let url = format!("{}/sendMessage", self.base_url);
            let mut body = serde_json::json!({
                "chat_id": chat_id,
                "text": chunk,
            });
            // Only the first chunk replies to the original.
            if i == 0 {
                if let Some(mid) = reply_to {
                    body["reply_to_message_id"] = serde_json::json!(mid);
                    body["allow_sending_without_reply"] = serde_json::json!(true);
                }
            }

            let resp = self
                .client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| TempoError::Channel(format!("telegram send failed: {e}")))?;

            if !resp.status().is_success() {
                let status = resp.status();
                let error_text = resp.text().await.unwrap_or_default();
                return Err(TempoError::Channel(format!(
                    "telegram send failed ({status}): {error_text}"
                )));
            }
        }

        Ok(())
    }

    /// Post the countdown message with its button. Returns the new
    /// message's id for later edits.
    pub(crate) async fn post_countdown_message(
        &self,
        chat_id: i64,
        caption: &str,
        label: &str,
    ) -> Result<i64, TempoError> {
        let url = format!("{}/sendMessage", self.base_url);
        let body = serde_json::json!({
            "chat_id": chat_id,
            "text": caption,
            "reply_markup": countdown_markup(label),
        });

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| TempoError::Channel(format!("telegram send failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp.text().await.unwrap_or_default();
            return Err(TempoError::Channel(format!(
                "telegram send failed ({status}): {error_text}"
            )));
        }

        let parsed: TgResponse<TgMessage> = resp
            .json()
            .await
            .map_err(|e| TempoError::Channel(format!("telegram send parse failed: {e}")))?;

        parsed
            .result
            .map(|m| m.message_id)
            .ok_or_else(|| {
                TempoError::Channel(format!(
                    "telegram sendMessage returned no message: {}",
                    parsed.description.unwrap_or_default()
                ))
            })
    }

    /// Pin a message in a chat.
    pub(crate) async fn pin_chat_message(
        &self,
        chat_id: i64,
        message_id: i64,
    ) -> Result<(), TempoError> {
        let url = format!("{}/pinChatMessage", self.base_url);
        let body = serde_json::json!({
            "chat_id": chat_id,
            "message_id": message_id,
        });

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| TempoError::Channel(format!("telegram pin failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp.text().await.unwrap_or_default();
            return Err(TempoError::Channel(format!(
                "telegram pin failed ({status}): {error_text}"
            )));
        }

        Ok(())
    }

    /// Replace the countdown button label on an existing message.
    pub(crate) async fn edit_countdown_button(
        &self,
        chat_id: i64,
        message_id: i64,
        label: &str,
    ) -> Result<(), TempoError> {
        let url = format!("{}/editMessageReplyMarkup", self.base_url);
        let body = serde_json::json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "reply_markup": countdown_markup(label),
        });

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| TempoError::Channel(format!("telegram edit failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp.text().await.unwrap_or_default();
            return Err(TempoError::Channel(format!(
                "telegram edit failed ({status}): {error_text}"
            )));
        }

        Ok(())
    }
}
