use botwire::envelope::{handle_response, unwrap};
use botwire::types::{ResponseParameters, User};
use botwire::{Error, Registry, TypeDesc, Value};
use serde_json::json;

#[test]
fn failure_carries_code_and_description() {
    let err = unwrap(r#"{"ok": false, "error_code": 400, "description": "Bad Request"}"#).unwrap_err();
    match err {
        Error::RemoteRequestFailed {
            error_code,
            description,
            parameters,
        } => {
            assert_eq!(error_code, Some(400));
            assert_eq!(description.as_deref(), Some("Bad Request"));
            assert_eq!(parameters, None);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn body_without_ok_is_the_result() {
    let raw = r#"{"id": 123, "is_bot": false, "first_name": "X"}"#;
    assert_eq!(
        unwrap(raw).unwrap(),
        json!({"id": 123, "is_bot": false, "first_name": "X"})
    );
}

#[test]
fn migrate_parameters_are_decoded() {
    let raw = r#"{
        "ok": false,
        "error_code": 400,
        "description": "Bad Request: group chat was upgraded to a supergroup chat",
        "parameters": {"migrate_to_chat_id": -1001234567890}
    }"#;
    match unwrap(raw).unwrap_err() {
        Error::RemoteRequestFailed { parameters, .. } => assert_eq!(
            parameters,
            Some(ResponseParameters {
                migrate_to_chat_id: Some(-1_001_234_567_890),
                retry_after: None,
            })
        ),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn handle_response_decodes_result() {
    let registry = Registry::bot_api().unwrap();
    let raw = r#"{"ok": true, "result": {"id": 1, "is_bot": true, "first_name": "Bot", "username": "bw_bot"}}"#;
    let value = handle_response(registry, raw, &TypeDesc::record("User"))
        .unwrap()
        .unwrap();
    let user = User::try_from(value).unwrap();
    assert_eq!(user.username.as_deref(), Some("bw_bot"));
    assert!(user.is_bot);
}

#[test]
fn handle_response_accepts_bare_fixtures() {
    let registry = Registry::bot_api().unwrap();
    let raw = r#"{"id": 123, "is_bot": false, "first_name": "X"}"#;
    let value = handle_response(registry, raw, &TypeDesc::record("User")).unwrap();
    assert_eq!(
        value.as_ref().and_then(Value::as_record).and_then(|r| r.get("id")),
        Some(&Value::Int(123))
    );
}

#[test]
fn boolean_results() {
    let registry = Registry::bot_api().unwrap();
    let returns = &registry.method("deleteMessage").unwrap().returns;
    assert_eq!(
        handle_response(registry, r#"{"ok": true, "result": true}"#, returns).unwrap(),
        Some(Value::Bool(true))
    );
}

#[test]
fn remote_failure_is_not_decoded() {
    let registry = Registry::bot_api().unwrap();
    let raw = r#"{"ok": false, "error_code": 401, "description": "Unauthorized"}"#;
    let err = handle_response(registry, raw, &TypeDesc::record("User")).unwrap_err();
    assert!(err.is_remote());
    assert_eq!(err.to_string(), "remote request failed: 401 Unauthorized");
}
