//! The `from` field rename.
//!
//! `from` is reserved in the declaration language, so records declare the
//! field as `from_`. Payloads going out rename `from_` to `from` and
//! responses coming in do the reverse, at every depth of the tree.

use serde_json::{Map, Value as JsonValue};

pub const INTERNAL_FROM: &str = "from_";
pub const WIRE_FROM: &str = "from";

pub fn rename_from_on_egress(json: JsonValue) -> JsonValue {
    rename_key(json, INTERNAL_FROM, WIRE_FROM)
}

pub fn rename_from_on_ingress(json: JsonValue) -> JsonValue {
    rename_key(json, WIRE_FROM, INTERNAL_FROM)
}

// Objects are rebuilt so the renamed key keeps its position.
fn rename_key(json: JsonValue, from: &str, to: &str) -> JsonValue {
    match json {
        JsonValue::Object(map) => {
            let renamed: Map<String, JsonValue> = map
                .into_iter()
                .map(|(key, value)| {
                    let key = if key == from { to.to_string() } else { key };
                    (key, rename_key(value, from, to))
                })
                .collect();
            JsonValue::Object(renamed)
        }
        JsonValue::Array(items) => JsonValue::Array(
            items
                .into_iter()
                .map(|item| rename_key(item, from, to))
                .collect(),
        ),
        other => other,
    }
}
