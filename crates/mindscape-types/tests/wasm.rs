//! WASM-target tests for mindscape-types.
//!
//! Mirrors a subset of the native unit tests under wasm32-unknown-unknown
//! via `wasm-pack test --node`. Provisional ids and timestamps need the
//! `js` / `wasmbind` features to work there.

use wasm_bindgen_test::*;

use mindscape_types::message::*;
use mindscape_types::entry::*;
use mindscape_types::config::*;

#[wasm_bindgen_test]
fn provisional_message_has_id_and_timestamp() {
    let msg = ChatMessage::user("hello");
    assert!(!msg.id.as_str().is_empty());
    assert!(msg.created_at.timestamp() > 0);
}

#[wasm_bindgen_test]
fn provisional_ids_differ() {
    assert_ne!(MessageId::provisional(), MessageId::provisional());
}

#[wasm_bindgen_test]
fn chat_turn_serializes_lowercase_role() {
    let json = serde_json::to_string(&ChatTurn::assistant("ok")).unwrap();
    assert_eq!(json, r#"{"role":"assistant","content":"ok"}"#);
}

#[wasm_bindgen_test]
fn mood_labels_round_trip() {
    for mood in Mood::all() {
        assert_eq!(Mood::from_label(mood.label()), Some(*mood));
    }
}

#[wasm_bindgen_test]
fn default_config_limits() {
    let config = AppConfig::default();
    assert_eq!(config.chat.history_limit, 50);
    assert_eq!(config.chat.fallback_reply, FALLBACK_REPLY);
}
