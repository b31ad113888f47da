//! Line codec: one compact JSON object per line, `\n` terminated.

use std::sync::Arc;

use serde::Serialize;

use crate::action::Action;
use crate::event::{EVENT_TYPES, Event};
use crate::menu::Menu;

/// Field carrying the message tag on every line.
pub const TAG_FIELD: &str = "type";

/// Errors produced while decoding an inbound line.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid JSON in line {line:?}: {source}")]
    InvalidJson {
        line: String,
        #[source]
        source: Arc<serde_json::Error>,
    },

    #[error("line is not valid UTF-8 ({line:?}): {source}")]
    InvalidUtf8 {
        /// The line with invalid sequences replaced.
        line: String,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("line exceeds {limit} bytes and was skipped")]
    LineTooLong { limit: usize },

    #[error("line has no string `type` field: {line:?}")]
    MissingType { line: String },

    #[error("unknown event type {kind:?}")]
    UnknownType { kind: String },

    #[error("invalid `{kind}` payload: {source}")]
    InvalidPayload {
        kind: String,
        #[source]
        source: Arc<serde_json::Error>,
    },
}

/// Encodes an action as a single wire line, including the trailing newline.
pub fn encode_action(action: &Action) -> Result<String, serde_json::Error> {
    encode_line(action)
}

/// Encodes a bare menu object, the bootstrap shape older renderers expect.
pub fn encode_menu(menu: &Menu) -> Result<String, serde_json::Error> {
    encode_line(menu)
}

/// Encodes an event as a wire line. Used by renderer-side fakes.
pub fn encode_event(event: &Event) -> Result<String, serde_json::Error> {
    encode_line(event)
}

fn encode_line<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let mut line = serde_json::to_string(value)?;
    line.push('\n');
    Ok(line)
}

/// Decodes one inbound line into an [`Event`].
///
/// The tag is validated before the payload is interpreted, so an unknown
/// tag is reported as such rather than as a payload shape mismatch.
pub fn decode_event(line: &str) -> Result<Event, DecodeError> {
    let value: serde_json::Value =
        serde_json::from_str(line.trim()).map_err(|e| DecodeError::InvalidJson {
            line: line.to_string(),
            source: Arc::new(e),
        })?;

    let kind = match value.get(TAG_FIELD).and_then(serde_json::Value::as_str) {
        Some(kind) => kind.to_string(),
        None => {
            return Err(DecodeError::MissingType {
                line: line.to_string(),
            });
        }
    };

    if !EVENT_TYPES.contains(&kind.as_str()) {
        return Err(DecodeError::UnknownType { kind });
    }

    serde_json::from_value(value).map_err(|e| DecodeError::InvalidPayload {
        kind,
        source: Arc::new(e),
    })
}

/// Decodes one inbound line given as raw bytes, checking UTF-8 first.
pub fn decode_event_bytes(line: &[u8]) -> Result<Event, DecodeError> {
    let text = std::str::from_utf8(line).map_err(|e| DecodeError::InvalidUtf8 {
        line: String::from_utf8_lossy(line).into_owned(),
        source: e,
    })?;
    decode_event(text)
}

/// Decodes one outbound line back into an [`Action`]. Used by
/// renderer-side fakes and compatibility tests.
pub fn decode_action(line: &str) -> Result<Action, DecodeError> {
    let value: serde_json::Value =
        serde_json::from_str(line.trim()).map_err(|e| DecodeError::InvalidJson {
            line: line.to_string(),
            source: Arc::new(e),
        })?;
    let kind = value
        .get(TAG_FIELD)
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| DecodeError::MissingType {
            line: line.to_string(),
        })?;
    serde_json::from_value(value).map_err(|e| DecodeError::InvalidPayload {
        kind,
        source: Arc::new(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ClickEvent;
    use crate::menu::MenuItem;

    #[test]
    fn non_utf8_bytes_are_a_decode_error() {
        let err = decode_event_bytes(b"\xff\xfe garbage").unwrap_err();
        match err {
            DecodeError::InvalidUtf8 { line, .. } => assert!(line.ends_with(" garbage")),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(decode_event_bytes(br#"{"type":"ready"}"#).unwrap(), Event::Ready);
    }

    #[test]
    fn encoded_line_is_single_line_with_newline() {
        let action = Action::UpdateItem {
            item: MenuItem::new("B\nwith newline").with_tooltip("tip"),
            seq_id: 7,
        };
        let line = encode_action(&action).unwrap();
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);
    }

    #[test]
    fn decode_ready() {
        assert_eq!(decode_event(r#"{"type":"ready"}"#).unwrap(), Event::Ready);
    }

    #[test]
    fn decode_clicked() {
        let line =
            r#"{"type":"clicked","item":{"title":"B (√)","tooltip":"","checked":true,"enabled":true},"seq_id":7}"#;
        let Event::Clicked(click) = decode_event(line).unwrap() else {
            panic!("expected click");
        };
        assert_eq!(click.seq_id, 7);
        assert_eq!(click.item.title, "B (√)");
        assert!(click.item.checked);
    }

    #[test]
    fn decode_tolerates_trailing_newline() {
        assert_eq!(decode_event("{\"type\":\"ready\"}\r\n").unwrap(), Event::Ready);
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = decode_event("not json {{{").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidJson { .. }));
    }

    #[test]
    fn decode_rejects_missing_type() {
        let err = decode_event(r#"{"item":{"title":"x"}}"#).unwrap_err();
        assert!(matches!(err, DecodeError::MissingType { .. }));

        let err = decode_event(r#"{"type":5}"#).unwrap_err();
        assert!(matches!(err, DecodeError::MissingType { .. }));
    }

    #[test]
    fn decode_rejects_unknown_type() {
        let err = decode_event(r#"{"type":"update-item","item":{"title":"x"},"seq_id":1}"#)
            .unwrap_err();
        match err {
            DecodeError::UnknownType { kind } => assert_eq!(kind, "update-item"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn decode_rejects_bad_click_payload() {
        let err = decode_event(r#"{"type":"clicked","seq_id":"seven"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidPayload { ref kind, .. } if kind == "clicked"));
    }

    #[test]
    fn action_payload_survives_the_wire() {
        let menu = Menu {
            icon: "aWNvbg==".into(),
            title: "Tray".into(),
            tooltip: "Tooltip".into(),
            items: vec![
                MenuItem::new("One").with_tooltip("first"),
                MenuItem::new("Two").with_checked(true).with_enabled(false),
            ],
        };
        let action = Action::UpdateMenuAndItem {
            menu: menu.clone(),
            item: menu.items[1].clone(),
            seq_id: 42,
        };
        let decoded = decode_action(&encode_action(&action).unwrap()).unwrap();
        assert_eq!(decoded, action);
    }

    #[test]
    fn click_echo_preserves_fields() {
        let event = Event::Clicked(ClickEvent {
            item: MenuItem::new("Two").with_tooltip("t").with_enabled(false),
            seq_id: 1,
        });
        let decoded = decode_event(&encode_event(&event).unwrap()).unwrap();
        assert_eq!(decoded, event);
    }

    #[test]
    fn legacy_menu_has_no_tag() {
        let line = encode_menu(&Menu::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert!(value.get(TAG_FIELD).is_none());
        assert!(value.get("items").is_some());
    }
}
