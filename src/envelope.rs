//! Response envelope handling.
//!
//! Every Bot API response is wrapped as `{"ok": true, "result": ...}` or
//! `{"ok": false, "error_code": 400, "description": "..."}`.

use botwire_value::Value;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::codec::{rename_from_on_ingress, to_typed_value};
use crate::descriptor::TypeDesc;
use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::types::ResponseParameters;

/// Parse a response body and extract its result.
///
/// A body without an `ok` key is returned whole, as if it were the result.
pub fn unwrap(raw: &str) -> Result<JsonValue> {
    let json: JsonValue = serde_json::from_str(raw)?;
    unwrap_value(json)
}

pub fn unwrap_value(json: JsonValue) -> Result<JsonValue> {
    let mut map = match json {
        JsonValue::Object(map) if map.contains_key("ok") => map,
        other => return Ok(other),
    };

    if map.get("ok").and_then(JsonValue::as_bool) == Some(true) {
        return Ok(map.remove("result").unwrap_or(JsonValue::Null));
    }

    let error_code = map.get("error_code").and_then(read_error_code);
    let description = map
        .get("description")
        .and_then(JsonValue::as_str)
        .map(str::to_string);
    let parameters = map
        .remove("parameters")
        .and_then(|p| serde_json::from_value::<ResponseParameters>(p).ok());

    warn!(?error_code, description = description.as_deref().unwrap_or(""), "remote request failed");
    Err(Error::RemoteRequestFailed {
        error_code,
        description,
        parameters,
    })
}

// Integral codes sent as floats or numeric strings are accepted.
fn read_error_code(json: &JsonValue) -> Option<i64> {
    let code = match json {
        JsonValue::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    if code.is_none() {
        debug!(error_code = %json, "error_code is not an integer, dropping it");
    }
    code
}

/// Unwrap the envelope, rename `from`, and decode the result as `desc`.
pub fn handle_response(registry: &Registry, raw: &str, desc: &TypeDesc) -> Result<Option<Value>> {
    let result = rename_from_on_ingress(unwrap(raw)?);
    to_typed_value(registry, &result, desc)
}
