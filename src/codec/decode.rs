//! Descriptor-driven decoding of wire JSON.

use botwire_value::{Record, Value};
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use crate::descriptor::TypeDesc;
use crate::error::{Error, Result};
use crate::registry::Registry;

/// A union the decoder knows how to resolve.
struct UnionResolution {
    literal: &'static str,
    record: &'static str,
    /// JSON values that are returned as the primitive branch.
    passthrough: fn(&JsonValue) -> bool,
}

/// Unions are resolved by their canonical spelling, not by inspecting the
/// branches. Anything else is `UnsupportedUnion`.
const UNION_TABLE: &[UnionResolution] = &[
    UnionResolution {
        literal: "Union[Message, bool]",
        record: "Message",
        passthrough: JsonValue::is_boolean,
    },
    UnionResolution {
        literal: "Union[InputFile, str]",
        record: "InputFile",
        passthrough: JsonValue::is_string,
    },
];

/// Decode `json` as the type described by `desc`.
///
/// `Ok(None)` means absent: JSON `null` under `Optional`, or a value that
/// does not have the shape of a bare record. Lists and unions are strict and
/// fail instead.
pub fn to_typed_value(
    registry: &Registry,
    json: &JsonValue,
    desc: &TypeDesc,
) -> Result<Option<Value>> {
    let desc_inner = desc.strip_optional();

    // Primitives pass through without checking the declared kind.
    if desc_inner.is_primitive() {
        let leaf = primitive_leaf(json);
        if leaf.is_none() && !json.is_null() {
            debug!(%desc, found = json_kind(json), "compound value under a primitive descriptor");
        }
        return Ok(leaf);
    }

    if json.is_null() && desc.is_optional() {
        return Ok(None);
    }

    match desc_inner {
        TypeDesc::List(elem) => decode_list(registry, json, elem, desc_inner).map(Some),
        TypeDesc::ListOfList(elem) => {
            let rows = expect_array(json)?;
            let decoded = rows
                .iter()
                .map(|row| decode_list(registry, row, elem, desc_inner))
                .collect::<Result<Vec<_>>>()?;
            Ok(Some(Value::List(decoded)))
        }
        TypeDesc::Union(_) => decode_union(registry, json, desc_inner),
        TypeDesc::Record(name) => match json {
            JsonValue::Object(map) => decode_record(registry, map, name).map(|r| Some(Value::Record(r))),
            other => {
                debug!(record = %name, found = json_kind(other), "non-object under a record descriptor, treating as absent");
                Ok(None)
            }
        },
        TypeDesc::Primitive(_) | TypeDesc::Optional(_) => Err(Error::malformed(
            desc.to_string(),
            "Optional cannot wrap another Optional",
        )),
    }
}

/// Parse `text` and decode it as `desc`.
pub fn decode_str(registry: &Registry, text: &str, desc: &TypeDesc) -> Result<Option<Value>> {
    let json: JsonValue = serde_json::from_str(text)?;
    to_typed_value(registry, &json, desc)
}

/// Decode a JSON object field by field, in declared order.
///
/// Keys with no declared field are ignored.
pub fn decode_record(
    registry: &Registry,
    map: &Map<String, JsonValue>,
    name: &str,
) -> Result<Record> {
    let mut record = Record::new(name);

    for field in registry.fields_of(name)? {
        let decoded = match map.get(&field.name) {
            Some(json) => to_typed_value(registry, json, &field.ty)?,
            None => None,
        };
        match decoded {
            Some(value) => {
                record.set(field.name.as_str(), value);
            }
            None if field.required => {
                return Err(Error::MissingField {
                    record: name.to_string(),
                    field: field.name.clone(),
                })
            }
            None => {}
        }
    }

    Ok(record)
}

fn decode_list(
    registry: &Registry,
    json: &JsonValue,
    elem: &TypeDesc,
    list_desc: &TypeDesc,
) -> Result<Value> {
    let items = expect_array(json)?;

    let decoded = match elem {
        TypeDesc::Record(name) => items
            .iter()
            .map(|item| match item {
                JsonValue::Object(map) => decode_record(registry, map, name).map(Value::Record),
                other => Err(Error::ShapeMismatch {
                    expected: "object",
                    found: json_kind(other),
                }),
            })
            .collect::<Result<Vec<_>>>()?,
        TypeDesc::Primitive(_) => items
            .iter()
            .map(|item| {
                primitive_leaf(item).ok_or(Error::ShapeMismatch {
                    expected: "primitive",
                    found: json_kind(item),
                })
            })
            .collect::<Result<Vec<_>>>()?,
        TypeDesc::Union(_) => return Err(Error::UnsupportedUnion(list_desc.to_string())),
        _ => {
            return Err(Error::malformed(
                list_desc.to_string(),
                "list elements must be records or primitives",
            ))
        }
    };

    Ok(Value::List(decoded))
}

fn decode_union(registry: &Registry, json: &JsonValue, desc: &TypeDesc) -> Result<Option<Value>> {
    let literal = desc.to_string();
    let Some(resolution) = UNION_TABLE.iter().find(|r| r.literal == literal) else {
        return Err(Error::UnsupportedUnion(literal));
    };

    if (resolution.passthrough)(json) {
        return Ok(primitive_leaf(json));
    }
    to_typed_value(registry, json, &TypeDesc::record(resolution.record))
}

fn expect_array(json: &JsonValue) -> Result<&Vec<JsonValue>> {
    json.as_array().ok_or(Error::ShapeMismatch {
        expected: "array",
        found: json_kind(json),
    })
}

/// Numbers that fit in `i64` stay integers, everything else is a float.
fn primitive_leaf(json: &JsonValue) -> Option<Value> {
    match json {
        JsonValue::Bool(b) => Some(Value::Bool(*b)),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Some(Value::Int(i)),
            None => n.as_f64().map(Value::Float),
        },
        JsonValue::String(s) => Some(Value::Str(s.clone())),
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => None,
    }
}

pub(crate) fn json_kind(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> Registry {
        Registry::from_schema(
            r#"
            record User { id: int  is_bot: bool  first_name: str  last_name: Optional[str] }
            record Chat { id: int  type: str }
            record Message {
                message_id: int
                chat: Chat
                from_: Optional[User]
                reply_to_message: Optional[Message]
            }
            record InputFile {}
            record Poll { id: str  options: List[PollOption] }
            record PollOption { text: str  voter_count: int }
            "#,
        )
        .expect("registry")
    }

    fn ty(s: &str) -> TypeDesc {
        TypeDesc::classify(s).expect("classify")
    }

    #[test]
    fn primitive_kind_is_not_checked() {
        let r = registry();
        assert_eq!(
            to_typed_value(&r, &json!("12"), &ty("int")).unwrap(),
            Some(Value::Str("12".into()))
        );
        assert_eq!(
            to_typed_value(&r, &json!(3), &ty("Optional[float]")).unwrap(),
            Some(Value::Int(3))
        );
    }

    #[test]
    fn null_under_optional_is_absent() {
        let r = registry();
        assert_eq!(to_typed_value(&r, &json!(null), &ty("Optional[User]")).unwrap(), None);
        assert_eq!(
            to_typed_value(&r, &json!(null), &ty("Optional[List[User]]")).unwrap(),
            None
        );
    }

    #[test]
    fn bare_record_degrades_to_absent() {
        let r = registry();
        assert_eq!(to_typed_value(&r, &json!(true), &ty("User")).unwrap(), None);
        assert_eq!(to_typed_value(&r, &json!([]), &ty("User")).unwrap(), None);
    }

    #[test]
    fn list_of_records_is_strict() {
        let r = registry();
        let err = to_typed_value(&r, &json!([1, 2]), &ty("List[User]")).unwrap_err();
        assert!(matches!(
            err,
            Error::ShapeMismatch {
                expected: "object",
                found: "number"
            }
        ));
        let err = to_typed_value(&r, &json!({"id": 1}), &ty("List[User]")).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { expected: "array", .. }));
    }

    #[test]
    fn list_of_primitives_passes_through() {
        let r = registry();
        let decoded = to_typed_value(&r, &json!(["message", "poll"]), &ty("List[str]")).unwrap();
        assert_eq!(decoded, Some(Value::from(vec!["message", "poll"])));
    }

    #[test]
    fn list_of_union_is_unsupported() {
        let r = registry();
        let err = to_typed_value(&r, &json!([]), &ty("List[Union[Message, bool]]")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedUnion(lit) if lit == "List[Union[Message, bool]]"));
    }

    #[test]
    fn list_of_optional_is_malformed() {
        let r = registry();
        let err = to_typed_value(&r, &json!([]), &ty("List[Optional[User]]")).unwrap_err();
        assert!(matches!(err, Error::MalformedAnnotation { .. }));
    }

    #[test]
    fn input_file_union_keeps_strings() {
        let r = registry();
        assert_eq!(
            to_typed_value(&r, &json!("AgADBAAD"), &ty("Union[InputFile, str]")).unwrap(),
            Some(Value::Str("AgADBAAD".into()))
        );
        assert_eq!(
            to_typed_value(&r, &json!({}), &ty("Optional[Union[InputFile, str]]")).unwrap(),
            Some(Value::Record(Record::new("InputFile")))
        );
    }

    #[test]
    fn other_unions_are_unsupported() {
        let r = registry();
        let err = to_typed_value(&r, &json!(1), &ty("Union[int, str]")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedUnion(lit) if lit == "Union[int, str]"));
    }

    #[test]
    fn missing_required_field_fails() {
        let r = registry();
        let err = to_typed_value(&r, &json!({"id": 1, "first_name": "X"}), &ty("User"))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::MissingField { ref record, ref field } if record == "User" && field == "is_bot"
        ));
    }

    #[test]
    fn recursive_message_decodes() {
        let r = registry();
        let json = json!({
            "message_id": 2,
            "chat": {"id": 10, "type": "group"},
            "reply_to_message": {
                "message_id": 1,
                "chat": {"id": 10, "type": "group"},
                "from_": {"id": 5, "is_bot": false, "first_name": "A"}
            }
        });
        let msg = to_typed_value(&r, &json, &ty("Message"))
            .unwrap()
            .and_then(Value::into_record)
            .expect("message");
        let reply = msg
            .get("reply_to_message")
            .and_then(Value::as_record)
            .expect("reply");
        assert_eq!(reply.get("message_id"), Some(&Value::Int(1)));
        assert!(reply.get("from_").is_some());
        assert!(msg.get("from_").is_none());
    }

    #[test]
    fn nested_list_field_decodes() {
        let r = registry();
        let json = json!({
            "id": "p1",
            "options": [{"text": "yes", "voter_count": 3}, {"text": "no", "voter_count": 0}]
        });
        let poll = to_typed_value(&r, &json, &ty("Poll"))
            .unwrap()
            .and_then(Value::into_record)
            .expect("poll");
        assert_eq!(poll.get("options").and_then(Value::as_list).map(<[_]>::len), Some(2));
    }

    #[test]
    fn large_unsigned_numbers_become_floats() {
        let r = registry();
        let decoded = to_typed_value(&r, &json!(u64::MAX), &ty("int")).unwrap();
        assert!(matches!(decoded, Some(Value::Float(_))));
    }

    #[test]
    fn decode_str_reports_invalid_json() {
        let r = registry();
        assert!(matches!(
            decode_str(&r, "{not json", &ty("User")),
            Err(Error::InvalidJson(_))
        ));
    }
}
