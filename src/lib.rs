//! botwire: a schema-driven client core for the Telegram Bot API
//!
//! Bot API records and methods are declared once in a small schema language
//! and loaded into a read-only [`Registry`]. The wire codec uses the registry
//! and parsed [`TypeDesc`] descriptors to turn response JSON into typed
//! values and typed values back into request payloads.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  client    - method calls, uploads      │
//! │  envelope  - {ok, result} unwrapping    │
//! ├─────────────────────────────────────────┤
//! │  codec     - decode / encode / rename   │
//! ├─────────────────────────────────────────┤
//! │  registry  - records and methods        │
//! │  schema    - declaration parser         │
//! │  descriptor- type annotations           │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Decoding
//!
//! ```
//! use botwire::{handle_response, Registry, TypeDesc};
//!
//! let registry = Registry::bot_api().unwrap();
//! let body = r#"{"ok": true, "result": {"id": 1, "is_bot": true, "first_name": "Bot"}}"#;
//! let user = handle_response(registry, body, &TypeDesc::record("User"))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(user.as_record().unwrap().type_name(), "User");
//! ```

pub mod client;
pub mod codec;
pub mod config;
pub mod descriptor;
pub mod envelope;
pub mod error;
pub mod registry;
pub mod schema;
pub mod types;
pub mod update;

pub use botwire_value::{ConversionError, FromValue, Record, RecordReader, Value};

#[cfg(feature = "http")]
pub use client::HttpTransport;
pub use client::{wire_method_name, Api, Arguments, InputFile, Transport};
pub use codec::{to_typed_value, to_wire_payload, to_wire_string};
pub use config::ClientConfig;
pub use descriptor::{Shape, TypeDesc};
pub use envelope::{handle_response, unwrap};
pub use error::{Error, Result};
pub use registry::Registry;
pub use update::{webhook_handler, UpdateView};
