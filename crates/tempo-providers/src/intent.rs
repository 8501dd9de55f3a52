//! Timer intent parsing.
//!
//! The AI is asked to answer with a single JSON object, either
//! `{"duration": <secs>, "caption": "...", "answer": "..."}` or
//! `{"timer": false}`. The model is untrusted: anything that does not
//! parse degrades to defaults, keeping only a digit-run heuristic for the
//! duration.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::debug;

/// Fallback duration when the AI gives nothing usable.
pub const DEFAULT_DURATION_SECS: u64 = 60;
/// Upper clamp for AI-supplied durations (one year). Keeps the deadline
/// arithmetic well inside `chrono::Duration` range.
pub const MAX_DURATION_SECS: u64 = 31_536_000;
/// Fallback body for the countdown message.
pub const DEFAULT_CAPTION: &str = "THE CHAT WILL BE DELETED IN";
/// Fallback terminal reply.
pub const DEFAULT_ANSWER: &str = "Timer finished!";

/// Fixed instruction prompt for the completion request. The user text is
/// the only variable content.
pub const INTENT_SYSTEM_PROMPT: &str = "You interpret countdown timer requests. From the user's \
message, determine the duration in seconds, invent a creative caption for the timer message \
based on the context, and compose an answer to deliver once the timer completes. Respond with \
JSON only, for example: {\"duration\": 60, \"caption\": \"\", \"answer\": \"\"}. If the message \
does not imply any duration, respond with {\"timer\": false}";

/// What the AI asked us to do with a trigger message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerIntent {
    /// Explicit `{"timer": false}` — do nothing, post nothing.
    Skip,
    /// Start a countdown.
    Countdown {
        duration_secs: u64,
        caption: String,
        answer: String,
    },
}

fn digit_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("valid digit regex"))
}

/// Parse the raw completion text into a [`TimerIntent`].
///
/// An empty string (e.g. when the completion call itself failed) takes the
/// full fallback path and yields the default countdown.
pub fn parse_intent(raw: &str) -> TimerIntent {
    match parse_json_object(raw) {
        Some(obj) => {
            if obj.get("timer").and_then(Value::as_bool) == Some(false) {
                return TimerIntent::Skip;
            }
            TimerIntent::Countdown {
                duration_secs: extract_duration(&obj).unwrap_or(DEFAULT_DURATION_SECS),
                caption: extract_text(&obj, "caption", DEFAULT_CAPTION),
                answer: extract_text(&obj, "answer", DEFAULT_ANSWER),
            }
        }
        None => {
            debug!("intent: response not parsable as JSON, using digit fallback");
            let duration_secs = digit_run()
                .find(raw)
                .and_then(|m| m.as_str().parse::<u64>().ok())
                .map(|d| d.clamp(1, MAX_DURATION_SECS))
                .unwrap_or(DEFAULT_DURATION_SECS);
            TimerIntent::Countdown {
                duration_secs,
                caption: DEFAULT_CAPTION.to_string(),
                answer: DEFAULT_ANSWER.to_string(),
            }
        }
    }
}

/// Try to read a JSON object out of the raw text. Models often wrap the
/// object in prose or code fences, so retry on the outermost brace slice.
fn parse_json_object(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if let Ok(v @ Value::Object(_)) = serde_json::from_str::<Value>(trimmed) {
        return Some(v);
    }
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<Value>(&trimmed[start..=end]) {
        Ok(v @ Value::Object(_)) => Some(v),
        _ => None,
    }
}

/// Duration as a JSON integer, or a numeric string, clamped to
/// `1..=MAX_DURATION_SECS`.
fn extract_duration(obj: &Value) -> Option<u64> {
    let raw = obj.get("duration")?;
    let secs = match raw {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    Some(secs.clamp(1, MAX_DURATION_SECS as i64) as u64)
}

fn extract_text(obj: &Value, key: &str, default: &str) -> String {
    match obj.get(key).and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => default.to_string(),
    }
}
