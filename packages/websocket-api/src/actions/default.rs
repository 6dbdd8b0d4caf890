use serde_json::Value;
use shared::models::events::{ClientEvent, ServerEvent};
use tracing::debug;

use crate::actions::reply;
use crate::state::AppState;

/// Parses one text frame. On failure returns the event name, when one could
/// be read, and a message for the client.
pub fn parse_frame(text: &str) -> Result<ClientEvent, (Option<String>, String)> {
    let mut frame: Value =
        serde_json::from_str(text).map_err(|_| (None, "Invalid JSON format".to_string()))?;

    let name = frame
        .get("event")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or((None, "No event specified".to_string()))?;

    if !ClientEvent::is_known(&name) {
        return Err((None, format!("Unknown event: {}", name)));
    }

    // Payload-less events may still arrive with an empty or null body.
    if let Some(object) = frame.as_object_mut() {
        let empty = match object.get("data") {
            Some(Value::Null) => true,
            Some(Value::Object(data)) => data.is_empty() && name == "leave_queue",
            _ => false,
        };
        if empty {
            object.remove("data");
        }
    }

    serde_json::from_value(frame).map_err(|e| (Some(name), format!("Invalid payload: {}", e)))
}

/// Answers a frame that could not be turned into an event.
pub fn handle_default_message(
    connection_id: &str,
    event: Option<String>,
    message: String,
    state: &AppState,
) {
    debug!(
        "Rejecting frame from {} (event: {:?}): {}",
        connection_id, event, message
    );
    reply(
        state,
        connection_id,
        ServerEvent::error(event.as_deref(), message),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frame_accepts_empty_leave_payload() {
        assert!(matches!(
            parse_frame(r#"{"event":"leave_queue","data":{}}"#),
            Ok(ClientEvent::LeaveQueue)
        ));
        assert!(matches!(
            parse_frame(r#"{"event":"leave_queue","data":null}"#),
            Ok(ClientEvent::LeaveQueue)
        ));
    }

    #[test]
    fn test_parse_frame_errors() {
        assert_eq!(
            parse_frame("not json").unwrap_err(),
            (None, "Invalid JSON format".to_string())
        );
        assert_eq!(
            parse_frame(r#"{"data":{}}"#).unwrap_err(),
            (None, "No event specified".to_string())
        );
        assert_eq!(
            parse_frame(r#"{"event":"make_move","data":{}}"#).unwrap_err(),
            (None, "Unknown event: make_move".to_string())
        );

        let (event, _) = parse_frame(r#"{"event":"send_message","data":{"text":"hi"}}"#)
            .unwrap_err();
        assert_eq!(event.as_deref(), Some("send_message"));
    }

    #[test]
    fn test_unknown_payload_value_is_scoped_to_its_event() {
        let (event, message) =
            parse_frame(r#"{"event":"join_queue","data":{"language":"en","mode":"audio"}}"#)
                .unwrap_err();

        assert_eq!(event.as_deref(), Some("join_queue"));
        assert!(message.starts_with("Invalid payload: "), "{}", message);
    }

    #[test]
    fn test_every_known_name_parses() {
        for name in ClientEvent::NAMES {
            let result = parse_frame(&format!(r#"{{"event":"{}"}}"#, name));
            match result {
                Ok(event) => assert_eq!(event.name(), name),
                Err((event, _)) => assert_eq!(event.as_deref(), Some(name)),
            }
        }
    }
}
