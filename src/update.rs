//! Incoming updates: webhook bodies and helper queries.

use botwire_value::{Record, Value};

use crate::codec::json_kind;
use crate::descriptor::TypeDesc;
use crate::envelope::handle_response;
use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::types::Update;

/// Decode a webhook request body as an `Update` record.
///
/// Webhook bodies are bare updates without an envelope; an enveloped body is
/// accepted as well.
pub fn webhook_handler(registry: &Registry, body: &str) -> Result<Value> {
    let desc = TypeDesc::record("Update");
    handle_response(registry, body, &desc)?.ok_or_else(|| {
        let found = serde_json::from_str::<serde_json::Value>(body)
            .map(|json| json_kind(&json))
            .unwrap_or("invalid JSON");
        Error::ShapeMismatch {
            expected: "object",
            found,
        }
    })
}

/// [`webhook_handler`] followed by conversion to the native [`Update`].
pub fn webhook_update(registry: &Registry, body: &str) -> Result<Update> {
    Ok(Update::try_from(webhook_handler(registry, body)?)?)
}

/// Read-only queries over a decoded `Update` record.
#[derive(Debug, Clone, Copy)]
pub struct UpdateView<'a> {
    update: &'a Record,
}

impl<'a> UpdateView<'a> {
    pub fn new(update: &'a Record) -> Option<Self> {
        (update.type_name() == "Update").then_some(Self { update })
    }

    pub fn update_id(&self) -> Option<i64> {
        self.update.get("update_id").and_then(Value::as_int)
    }

    /// The message carried by the update, of any message kind.
    pub fn message(&self) -> Option<&'a Record> {
        ["message", "edited_message", "channel_post", "edited_channel_post"]
            .iter()
            .find_map(|field| self.update.get(field).and_then(Value::as_record))
    }

    pub fn message_text(&self) -> Option<&'a str> {
        self.message()?.get("text").and_then(Value::as_str)
    }

    pub fn is_start_command(&self) -> bool {
        self.message_text()
            .map_or(false, |text| text.split_whitespace().next() == Some("/start"))
    }

    pub fn chat_id(&self) -> Option<i64> {
        self.message()?
            .get("chat")
            .and_then(Value::as_record)?
            .get("id")
            .and_then(Value::as_int)
    }

    pub fn poll_id(&self) -> Option<&'a str> {
        self.update
            .get("poll")
            .and_then(Value::as_record)?
            .get("id")
            .and_then(Value::as_str)
    }

    pub fn document_id(&self) -> Option<&'a str> {
        self.message()?
            .get("document")
            .and_then(Value::as_record)?
            .get("file_id")
            .and_then(Value::as_str)
    }

    pub fn has_photo(&self) -> bool {
        self.message()
            .and_then(|m| m.get("photo"))
            .and_then(Value::as_list)
            .map_or(false, |sizes| !sizes.is_empty())
    }

    pub fn has_document(&self) -> bool {
        self.message().map_or(false, |m| m.contains("document"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(message: Record) -> Record {
        Record::new("Update").with("update_id", 9).with("message", message)
    }

    fn message(text: &str) -> Record {
        Record::new("Message")
            .with("message_id", 1)
            .with("date", 0)
            .with("chat", Record::new("Chat").with("id", 77).with("type", "private"))
            .with("text", text)
    }

    #[test]
    fn start_command_with_payload() {
        let rec = update(message("/start deep-link"));
        let view = UpdateView::new(&rec).expect("update");
        assert!(view.is_start_command());
        assert_eq!(view.chat_id(), Some(77));
        assert_eq!(view.update_id(), Some(9));
    }

    #[test]
    fn plain_text_is_not_start() {
        let rec = update(message("/starting"));
        let view = UpdateView::new(&rec).expect("update");
        assert!(!view.is_start_command());
        assert_eq!(view.message_text(), Some("/starting"));
        assert!(!view.has_photo());
        assert!(!view.has_document());
        assert_eq!(view.document_id(), None);
    }

    #[test]
    fn edited_channel_posts_count_as_messages() {
        let rec = Record::new("Update")
            .with("update_id", 1)
            .with("edited_channel_post", message("hello"));
        let view = UpdateView::new(&rec).expect("update");
        assert_eq!(view.message_text(), Some("hello"));
    }

    #[test]
    fn only_update_records_have_views() {
        assert!(UpdateView::new(&message("x")).is_none());
    }
}
