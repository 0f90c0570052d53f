use botwire::update::{webhook_handler, webhook_update, UpdateView};
use botwire::{Error, Registry, Value};
use serde_json::json;

fn registry() -> &'static Registry {
    Registry::bot_api().expect("bot api registry")
}

#[test]
fn start_command_from_webhook() {
    let body = json!({
        "update_id": 10_000,
        "message": {
            "message_id": 1365,
            "date": 1_441_645_532,
            "chat": {"id": 1_111_111, "type": "private", "first_name": "Test"},
            "from": {"id": 1_111_111, "is_bot": false, "first_name": "Test", "last_name": "User"},
            "text": "/start",
            "entities": [{"type": "bot_command", "offset": 0, "length": 6}]
        }
    })
    .to_string();

    let update = webhook_handler(registry(), &body).unwrap();
    let record = update.as_record().unwrap();
    let view = UpdateView::new(record).unwrap();
    assert!(view.is_start_command());
    assert_eq!(view.chat_id(), Some(1_111_111));
    assert_eq!(view.message_text(), Some("/start"));

    let message = view.message().unwrap();
    let from = message.get("from_").and_then(Value::as_record).unwrap();
    assert_eq!(from.get("last_name"), Some(&Value::Str("User".into())));
}

#[test]
fn document_and_photo_helpers() {
    let body = json!({
        "update_id": 2,
        "message": {
            "message_id": 7,
            "date": 0,
            "chat": {"id": -5, "type": "group", "title": "Team"},
            "document": {"file_id": "BQACAgIAAx", "file_name": "notes.pdf", "mime_type": "application/pdf"},
            "photo": [{"file_id": "AgAD", "width": 90, "height": 51}]
        }
    })
    .to_string();

    let update = webhook_handler(registry(), &body).unwrap();
    let view = UpdateView::new(update.as_record().unwrap()).unwrap();
    assert!(view.has_document());
    assert!(view.has_photo());
    assert_eq!(view.document_id(), Some("BQACAgIAAx"));
    assert!(!view.is_start_command());
}

#[test]
fn poll_updates() {
    let body = json!({
        "update_id": 3,
        "poll": {
            "id": "5877123",
            "question": "Lunch?",
            "options": [{"text": "Yes", "voter_count": 2}, {"text": "No", "voter_count": 1}],
            "is_closed": false
        }
    })
    .to_string();

    let update = webhook_handler(registry(), &body).unwrap();
    let view = UpdateView::new(update.as_record().unwrap()).unwrap();
    assert_eq!(view.poll_id(), Some("5877123"));
    assert!(view.message().is_none());
    assert_eq!(view.chat_id(), None);
}

#[test]
fn typed_update_view() {
    let body = r#"{"update_id": 4, "edited_message": {"message_id": 2, "date": 5, "edit_date": 6,
        "chat": {"id": 9, "type": "private"}, "text": "fixed typo"}}"#;
    let update = webhook_update(registry(), body).unwrap();
    assert_eq!(update.update_id, 4);
    assert!(update.message.is_none());
    assert_eq!(
        update.edited_message.and_then(|m| m.text),
        Some("fixed typo".to_string())
    );
}

#[test]
fn non_object_body_is_rejected() {
    let err = webhook_handler(registry(), "[1, 2]").unwrap_err();
    assert!(matches!(
        err,
        Error::ShapeMismatch {
            expected: "object",
            found: "array"
        }
    ));
}
