//! Encoding of decoded values back into wire JSON.

use botwire_value::{Record, Value};
use serde_json::{Map, Number, Value as JsonValue};

use super::rename::rename_from_on_egress;
use crate::error::{Error, Result};
use crate::registry::Registry;

/// Encode a value as a wire payload.
///
/// Record fields are emitted in declared order, absent fields are left out
/// at every depth, and `from_` is renamed to `from`.
pub fn to_wire_payload(registry: &Registry, value: &Value) -> Result<JsonValue> {
    let tree = value_to_json(registry, value)?;
    Ok(rename_from_on_egress(prune_nulls(tree)))
}

pub fn to_wire_string(registry: &Registry, value: &Value) -> Result<String> {
    let payload = to_wire_payload(registry, value)?;
    Ok(serde_json::to_string(&payload)?)
}

/// Drop every object entry whose value is `null`. Array items are kept.
pub fn prune_nulls(json: JsonValue) -> JsonValue {
    match json {
        JsonValue::Object(map) => JsonValue::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, prune_nulls(v)))
                .collect(),
        ),
        JsonValue::Array(items) => JsonValue::Array(items.into_iter().map(prune_nulls).collect()),
        other => other,
    }
}

pub(crate) fn value_to_json(registry: &Registry, value: &Value) -> Result<JsonValue> {
    Ok(match value {
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Int(i) => JsonValue::from(*i),
        // JSON has no NaN or infinity
        Value::Float(f) => Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
        Value::Str(s) => JsonValue::String(s.clone()),
        Value::List(items) => JsonValue::Array(
            items
                .iter()
                .map(|item| value_to_json(registry, item))
                .collect::<Result<Vec<_>>>()?,
        ),
        Value::Record(record) => record_to_json(registry, record)?,
    })
}

fn record_to_json(registry: &Registry, record: &Record) -> Result<JsonValue> {
    let def = registry
        .record(record.type_name())
        .ok_or_else(|| Error::UnknownRecord(record.type_name().to_string()))?;

    if let Some(extra) = record.field_names().find(|name| def.field(name).is_none()) {
        return Err(Error::UnknownField {
            record: def.name.clone(),
            field: extra.to_string(),
        });
    }

    let mut map = Map::new();
    for field in &def.fields {
        if let Some(value) = record.get(&field.name) {
            map.insert(field.name.clone(), value_to_json(registry, value)?);
        }
    }
    Ok(JsonValue::Object(map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> Registry {
        Registry::from_schema(
            r#"
            record User { id: int  is_bot: bool  first_name: str  last_name: Optional[str] }
            record Location { longitude: float  latitude: float }
            record Message { message_id: int  from_: Optional[User]  text: Optional[str] }
            "#,
        )
        .expect("registry")
    }

    #[test]
    fn keys_follow_declared_order() {
        let user = Record::new("User")
            .with("first_name", "X")
            .with("is_bot", false)
            .with("id", 1);
        let text = to_wire_string(&registry(), &Value::Record(user)).unwrap();
        assert_eq!(text, r#"{"id":1,"is_bot":false,"first_name":"X"}"#);
    }

    #[test]
    fn undeclared_field_is_rejected() {
        let user = Record::new("User").with("id", 1).with("nickname", "x");
        let err = to_wire_payload(&registry(), &Value::Record(user)).unwrap_err();
        assert!(matches!(err, Error::UnknownField { ref field, .. } if field == "nickname"));
    }

    #[test]
    fn unregistered_record_is_rejected() {
        let err = to_wire_payload(&registry(), &Value::Record(Record::new("Sticker"))).unwrap_err();
        assert!(matches!(err, Error::UnknownRecord(name) if name == "Sticker"));
    }

    #[test]
    fn non_finite_floats_are_omitted() {
        let loc = Record::new("Location")
            .with("longitude", f64::NAN)
            .with("latitude", 1.5);
        let payload = to_wire_payload(&registry(), &Value::Record(loc)).unwrap();
        assert_eq!(payload, json!({"latitude": 1.5}));
    }

    #[test]
    fn from_is_renamed_inside_lists() {
        let msg = Record::new("Message")
            .with("message_id", 1)
            .with("from_", Record::new("User").with("id", 2));
        let payload = to_wire_payload(&registry(), &Value::from(vec![msg])).unwrap();
        assert_eq!(payload, json!([{"message_id": 1, "from": {"id": 2}}]));
    }

    #[test]
    fn prune_keeps_array_nulls() {
        let pruned = prune_nulls(json!({"a": null, "b": [null, {"c": null}]}));
        assert_eq!(pruned, json!({"b": [null, {}]}));
    }
}
