use serde::{Deserialize, Serialize};

/// A single-shot request passed to an AI provider.
///
/// Tempo never carries conversation history: every trigger message is
/// interpreted on its own against a fixed instruction prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Context {
    /// System prompt prepended to the request.
    pub system_prompt: String,
    /// The user message being interpreted.
    pub current_message: String,
    /// Override the provider's default model. When `Some`, the provider
    /// uses this value instead of its configured default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// A structured message for API-based providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    /// "system" or "user".
    pub role: String,
    /// The message content.
    pub content: String,
}

impl Context {
    /// Create a new context from a system prompt and a user message.
    pub fn new(system_prompt: &str, message: &str) -> Self {
        Self {
            system_prompt: system_prompt.to_string(),
            current_message: message.to_string(),
            model: None,
        }
    }

    /// Convert the context to structured API messages.
    pub fn to_api_messages(&self) -> Vec<ApiMessage> {
        let mut messages = Vec::with_capacity(2);
        if !self.system_prompt.is_empty() {
            messages.push(ApiMessage {
                role: "system".to_string(),
                content: self.system_prompt.clone(),
            });
        }
        messages.push(ApiMessage {
            role: "user".to_string(),
            content: self.current_message.clone(),
        });
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_api_messages_basic() {
        let ctx = Context::new("Interpret timers.", "Roma, 5 minutes");
        let messages = ctx.to_api_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, "Interpret timers.");
        assert_eq!(messages[1].role, "user");
        assert_eq!(messages[1].content, "Roma, 5 minutes");
    }

    #[test]
    fn test_to_api_messages_empty_system() {
        let ctx = Context::new("", "hello");
        let messages = ctx.to_api_messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "user");
    }

    #[test]
    fn test_context_serde_round_trip() {
        let ctx = Context::new("sys", "msg");
        let json = serde_json::to_string(&ctx).unwrap();
        let back: Context = serde_json::from_str(&json).unwrap();
        assert_eq!(back.system_prompt, "sys");
        assert_eq!(back.current_message, "msg");
        assert!(back.model.is_none());
    }
}
