//! Named records and a reader for pulling typed fields out of them

use std::collections::BTreeMap;

use crate::{ConversionError, FromValue, Value};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An instance of a registered record type.
///
/// Only fields that were present (and non-null) on the wire are stored.
/// Field order is not significant: two records with the same type name and
/// the same fields compare equal.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Record {
    type_name: String,
    fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Set a field, returning the previous value if there was one.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }

    /// Builder form of [`Record::set`].
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Typed field access over a [`Record`] of a known type.
///
/// Used by the typed views in `botwire::types`:
///
/// ```
/// use botwire_value::{Record, RecordReader, Value};
///
/// let chat = Record::new("Chat").with("id", 42).with("type", "private");
/// let mut reader = RecordReader::new(Value::Record(chat), "Chat").unwrap();
/// let id: i64 = reader.required("id").unwrap();
/// let title: Option<String> = reader.optional("title").unwrap();
/// assert_eq!(id, 42);
/// assert!(title.is_none());
/// ```
#[derive(Debug)]
pub struct RecordReader {
    record: Record,
}

impl RecordReader {
    pub fn new(value: Value, type_name: &str) -> Result<Self, ConversionError> {
        let record = Record::try_from(value)?;
        if record.type_name != type_name {
            return Err(ConversionError::WrongRecord {
                expected: type_name.to_string(),
                got: record.type_name,
            });
        }
        Ok(Self { record })
    }

    pub fn required<T: FromValue>(&mut self, field: &str) -> Result<T, ConversionError> {
        match self.record.remove(field) {
            Some(v) => {
                T::from_value(v).map_err(|e| ConversionError::FieldError(field.into(), Box::new(e)))
            }
            None => Err(ConversionError::MissingField(field.to_string())),
        }
    }

    pub fn optional<T: FromValue>(&mut self, field: &str) -> Result<Option<T>, ConversionError> {
        self.record
            .remove(field)
            .map(|v| {
                T::from_value(v).map_err(|e| ConversionError::FieldError(field.into(), Box::new(e)))
            })
            .transpose()
    }

    /// Fields not yet consumed by the reader.
    pub fn into_rest(self) -> Record {
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_insertion_order() {
        let a = Record::new("User").with("id", 1).with("first_name", "X");
        let b = Record::new("User").with("first_name", "X").with("id", 1);
        assert_eq!(a, b);
    }

    #[test]
    fn different_type_names_are_not_equal() {
        assert_ne!(Record::new("User"), Record::new("Chat"));
    }

    #[test]
    fn reader_rejects_wrong_record() {
        let err = RecordReader::new(Value::Record(Record::new("User")), "Chat").unwrap_err();
        assert_eq!(
            err,
            ConversionError::WrongRecord {
                expected: "Chat".into(),
                got: "User".into()
            }
        );
    }

    #[test]
    fn reader_wraps_field_errors() {
        let rec = Record::new("User").with("id", "not a number");
        let mut reader = RecordReader::new(Value::Record(rec), "User").unwrap();
        let err = reader.required::<i64>("id").unwrap_err();
        assert!(matches!(err, ConversionError::FieldError(ref f, _) if f == "id"));
        assert_eq!(
            reader.required::<bool>("is_bot").unwrap_err(),
            ConversionError::MissingField("is_bot".into())
        );
    }

    #[test]
    fn reader_leaves_unread_fields() {
        let rec = Record::new("User").with("id", 7).with("language_code", "en");
        let mut reader = RecordReader::new(Value::Record(rec), "User").unwrap();
        let _: i64 = reader.required("id").unwrap();
        let rest = reader.into_rest();
        assert_eq!(rest.field_names().collect::<Vec<_>>(), vec!["language_code"]);
    }
}
