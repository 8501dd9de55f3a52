//! Tests for the Telegram channel module.

use super::polling::is_allowed;
use super::send::{countdown_markup, COUNTDOWN_CALLBACK};
use super::types::*;

#[test]
fn test_allow_list_admits_listed_sender() {
    assert!(is_allowed(&[1273867987, 1534121473], 1273867987));
}

#[test]
fn test_allow_list_drops_unlisted_sender() {
    assert!(!is_allowed(&[1273867987], 42));
}

#[test]
fn test_empty_allow_list_drops_everyone() {
    assert!(!is_allowed(&[], 1273867987));
}

#[test]
fn test_countdown_markup_shape() {
    let markup = countdown_markup("30 sec");
    let rows = markup["inline_keyboard"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    let row = rows[0].as_array().unwrap();
    assert_eq!(row.len(), 1);
    assert_eq!(row[0]["text"], "30 sec");
    assert_eq!(row[0]["callback_data"], COUNTDOWN_CALLBACK);
}

#[test]
fn test_tg_update_with_text_message() {
    let json = r#"{
        "update_id": 10,
        "message": {
            "message_id": 42,
            "from": {"id": 1273867987, "first_name": "Artem"},
            "chat": {"id": -1001235922002, "type": "supergroup"},
            "text": "Roma, 5 minutes"
        }
    }"#;
    let update: TgUpdate = serde_json::from_str(json).unwrap();
    assert_eq!(update.update_id, 10);
    let msg = update.message.unwrap();
    assert_eq!(msg.message_id, 42);
    assert_eq!(msg.from.unwrap().id, 1273867987);
    assert_eq!(msg.chat.id, -1001235922002);
    assert_eq!(msg.text.as_deref(), Some("Roma, 5 minutes"));
    assert!(update.callback_query.is_none());
}

#[test]
fn test_tg_update_with_callback_query() {
    let json = r#"{
        "update_id": 11,
        "callback_query": {
            "id": "cb-123",
            "from": {"id": 7, "first_name": "Someone"},
            "data": "timer"
        }
    }"#;
    let update: TgUpdate = serde_json::from_str(json).unwrap();
    assert!(update.message.is_none());
    let cb = update.callback_query.unwrap();
    assert_eq!(cb.id, "cb-123");
    assert_eq!(cb.data.as_deref(), Some("timer"));
}

#[test]
fn test_tg_message_without_sender() {
    // Channel posts carry no `from`; the poller skips them.
    let json = r#"{
        "message_id": 5,
        "chat": {"id": 100, "type": "channel"},
        "text": "broadcast"
    }"#;
    let msg: TgMessage = serde_json::from_str(json).unwrap();
    assert!(msg.from.is_none());
}

#[test]
fn test_tg_chat_type_defaults_when_missing() {
    let chat: TgChat = serde_json::from_str(r#"{"id": 123}"#).unwrap();
    assert_eq!(chat.chat_type, "");
}

#[test]
fn test_send_message_response_yields_message_id() {
    let json = r#"{
        "ok": true,
        "result": {
            "message_id": 777,
            "chat": {"id": -1001235922002, "type": "supergroup"}
        }
    }"#;
    let resp: TgResponse<TgMessage> = serde_json::from_str(json).unwrap();
    assert!(resp.ok);
    assert_eq!(resp.result.unwrap().message_id, 777);
}

#[test]
fn test_api_error_response() {
    let json = r#"{"ok": false, "description": "Bad Request: chat not found"}"#;
    let resp: TgResponse<TgMessage> = serde_json::from_str(json).unwrap();
    assert!(!resp.ok);
    assert!(resp.result.is_none());
    assert!(resp.description.unwrap().contains("chat not found"));
}
