//! Inbound webhook update parsing.
//!
//! Telegram delivers each update as one JSON document. A message carries
//! at most one of text/voice/location; the raw shape is decoded here in a
//! single step and turned into a tagged [`Inbound`] value so downstream
//! dispatch stays exhaustive instead of testing for key presence.

use serde::Deserialize;

#[derive(Deserialize)]
struct WebhookUpdate {
    message: Option<RawMessage>,
}

#[derive(Deserialize)]
struct RawMessage {
    message_id: i64,
    chat: RawChat,
    text: Option<String>,
    voice: Option<RawVoice>,
    location: Option<RawLocation>,
}

#[derive(Deserialize)]
struct RawChat {
    id: i64,
}

#[derive(Deserialize)]
struct RawVoice {
    file_id: String,
    duration: u32,
}

#[derive(Deserialize)]
struct RawLocation {
    latitude: f64,
    longitude: f64,
}

/// One parsed message, addressed back to its chat.
#[derive(Debug, Clone, PartialEq)]
pub struct Inbound {
    pub message_id: i64,
    pub chat_id: i64,
    pub kind: InboundKind,
}

/// Message kinds the bot distinguishes.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundKind {
    /// `/start` or `/help`.
    Command(String),
    /// Free text, treated as a place name.
    Text(String),
    Voice { file_id: String, duration: u32 },
    Location { latitude: f64, longitude: f64 },
    /// Anything else: stickers, photos, polls...
    Unsupported,
}

/// Decode a webhook body. `Ok(None)` means the update carries no message
/// (edited messages, channel posts) and there is nothing to answer.
pub fn parse_update(body: &str) -> Result<Option<Inbound>, serde_json::Error> {
    let update: WebhookUpdate = serde_json::from_str(body)?;
    let Some(message) = update.message else {
        return Ok(None);
    };

    let kind = if let Some(text) = message.text {
        if text == "/start" || text == "/help" {
            InboundKind::Command(text)
        } else {
            InboundKind::Text(text)
        }
    } else if let Some(voice) = message.voice {
        InboundKind::Voice {
            file_id: voice.file_id,
            duration: voice.duration,
        }
    } else if let Some(location) = message.location {
        InboundKind::Location {
            latitude: location.latitude,
            longitude: location.longitude,
        }
    } else {
        InboundKind::Unsupported
    };

    Ok(Some(Inbound {
        message_id: message.message_id,
        chat_id: message.chat.id,
        kind,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Inbound {
        parse_update(body)
            .expect("body should decode")
            .expect("update should carry a message")
    }

    #[test]
    fn test_text_message() {
        let inbound = parse(
            r#"{"update_id": 1, "message": {"message_id": 42, "chat": {"id": 100}, "text": "Казань"}}"#,
        );
        assert_eq!(inbound.message_id, 42);
        assert_eq!(inbound.chat_id, 100);
        assert_eq!(inbound.kind, InboundKind::Text("Казань".to_string()));
    }

    #[test]
    fn test_start_and_help_are_commands() {
        for cmd in ["/start", "/help"] {
            let body = format!(
                r#"{{"message": {{"message_id": 1, "chat": {{"id": 2}}, "text": "{cmd}"}}}}"#
            );
            assert_eq!(parse(&body).kind, InboundKind::Command(cmd.to_string()));
        }
    }

    #[test]
    fn test_other_slash_text_is_a_place_lookup() {
        let inbound =
            parse(r#"{"message": {"message_id": 1, "chat": {"id": 2}, "text": "/weather"}}"#);
        assert_eq!(inbound.kind, InboundKind::Text("/weather".to_string()));
    }

    #[test]
    fn test_voice_message() {
        let inbound = parse(
            r#"{"message": {"message_id": 7, "chat": {"id": 3}, "voice": {"file_id": "AwACAg", "duration": 4, "mime_type": "audio/ogg"}}}"#,
        );
        assert_eq!(
            inbound.kind,
            InboundKind::Voice {
                file_id: "AwACAg".to_string(),
                duration: 4
            }
        );
    }

    #[test]
    fn test_location_message() {
        let inbound = parse(
            r#"{"message": {"message_id": 8, "chat": {"id": 3}, "location": {"latitude": 55.75, "longitude": 37.62}}}"#,
        );
        assert_eq!(
            inbound.kind,
            InboundKind::Location {
                latitude: 55.75,
                longitude: 37.62
            }
        );
    }

    #[test]
    fn test_sticker_is_unsupported() {
        let inbound = parse(
            r#"{"message": {"message_id": 9, "chat": {"id": 3}, "sticker": {"file_id": "xyz"}}}"#,
        );
        assert_eq!(inbound.kind, InboundKind::Unsupported);
    }

    #[test]
    fn test_update_without_message() {
        let parsed = parse_update(r#"{"update_id": 5, "edited_message": {"message_id": 1}}"#)
            .expect("body should decode");
        assert!(parsed.is_none());
    }

    #[test]
    fn test_malformed_body() {
        assert!(parse_update("not json at all").is_err());
    }
}
