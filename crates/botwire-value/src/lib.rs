//! Dynamic values for the Bot API wire codec.
//!
//! The codec in `botwire` decodes JSON into this small value model, driven by
//! a type descriptor and the record registry. The model deliberately has no
//! `null`: an absent value is `Option::None` at the point where it is read,
//! and a [`Record`] simply does not hold fields that were absent on the wire.
//!
//! ```
//! use botwire_value::{Record, Value};
//!
//! let user = Record::new("User")
//!     .with("id", 1)
//!     .with("is_bot", false)
//!     .with("first_name", "X");
//!
//! assert_eq!(user.get("id"), Some(&Value::Int(1)));
//! assert!(user.get("last_name").is_none());
//! ```

mod record;
mod value;

pub use record::{Record, RecordReader};
pub use value::{FromValue, Value};

use thiserror::Error;

/// Errors produced when converting a [`Value`] into a native Rust type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("value {value} does not fit in {ty}")]
    OutOfRange { ty: &'static str, value: i64 },

    #[error("expected a {expected} record, got {got}")]
    WrongRecord { expected: String, got: String },

    #[error("missing required field `{0}`")]
    MissingField(String),

    #[error("field `{0}`: {1}")]
    FieldError(String, Box<ConversionError>),

    #[error("index {0}: {1}")]
    IndexError(usize, Box<ConversionError>),
}
