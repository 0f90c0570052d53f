//! Wire codec: JSON to typed values and back.
//!
//! Decoding is driven by a [`TypeDesc`](crate::descriptor::TypeDesc) and the
//! [`Registry`](crate::registry::Registry); encoding walks the registry's
//! field lists so that payload keys come out in declared order.

mod decode;
mod encode;
pub mod rename;

pub use decode::{decode_record, decode_str, to_typed_value};
pub use encode::{prune_nulls, to_wire_payload, to_wire_string};
pub use rename::{rename_from_on_egress, rename_from_on_ingress};

pub(crate) use decode::json_kind;
pub(crate) use encode::value_to_json;
