use crate::{
    context::Context,
    error::TempoError,
    message::{IncomingMessage, OutgoingMessage},
};
use async_trait::async_trait;

/// AI Provider trait — the brain.
///
/// Every completion backend implements this trait to provide a uniform
/// interface for the intent resolver.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Whether this provider requires an API key to function.
    fn requires_api_key(&self) -> bool;

    /// Send a request to the provider and get the raw response text.
    async fn complete(&self, context: &Context) -> Result<OutgoingMessage, TempoError>;

    /// Check if the provider is available and ready.
    async fn is_available(&self) -> bool;
}

/// Messaging Channel trait — the nervous system.
///
/// Implemented by messaging platforms that can receive trigger messages
/// and host a live countdown message.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Start listening for incoming messages.
    /// Returns a receiver that yields incoming messages.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<IncomingMessage>, TempoError>;

    /// Send a message through this channel. Honors `reply_target` and
    /// `reply_to` when set.
    async fn send(&self, message: OutgoingMessage) -> Result<(), TempoError>;

    /// Post the countdown message: `caption` as body with a single
    /// interactive control labeled `label`. Returns the platform id of the
    /// posted message so it can be edited in place.
    async fn post_countdown(
        &self,
        target: &str,
        caption: &str,
        label: &str,
    ) -> Result<String, TempoError>;

    /// Pin a previously posted message. Callers treat failures as
    /// non-fatal.
    async fn pin_message(&self, target: &str, message_id: &str) -> Result<(), TempoError>;

    /// Update the countdown control's label in place.
    async fn update_countdown(
        &self,
        target: &str,
        message_id: &str,
        label: &str,
    ) -> Result<(), TempoError>;

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), TempoError>;
}
