//! Error types for the descriptor, registry, codec and client layers.

use botwire_value::ConversionError;
use thiserror::Error;

use crate::descriptor::ParseError;
use crate::types::ResponseParameters;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// A type annotation did not classify into any known shape.
    #[error("malformed annotation `{annotation}`: {reason}")]
    MalformedAnnotation { annotation: String, reason: String },

    #[error("`{0}` is not an Optional descriptor")]
    NotOptional(String),

    #[error("`{0}` is not a List descriptor")]
    NotList(String),

    #[error("`{0}` is not a Union descriptor")]
    NotUnion(String),

    #[error("unknown record type: {0}")]
    UnknownRecord(String),

    #[error("record {record} has no field `{field}`")]
    UnknownField { record: String, field: String },

    #[error("unknown API method: {0}")]
    UnknownMethod(String),

    #[error("method {method} has no parameter `{param}`")]
    UnknownArgument { method: String, param: String },

    #[error("method {method} requires argument `{param}`")]
    MissingArgument { method: String, param: String },

    #[error("{record} is missing required field `{field}`")]
    MissingField { record: String, field: String },

    #[error("duplicate definition: {0}")]
    DuplicateDefinition(String),

    /// A union outside the fixed resolution table.
    #[error("unsupported union: {0}")]
    UnsupportedUnion(String),

    #[error("expected {expected}, found {found}")]
    ShapeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A call succeeded but its result decoded as absent.
    #[error("{method} returned no result")]
    MissingResult { method: String },

    #[error("schema error: {0}")]
    Schema(#[from] ParseError),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The remote service answered with `ok: false`.
    #[error("remote request failed: {}", remote_summary(.error_code, .description))]
    RemoteRequestFailed {
        error_code: Option<i64>,
        description: Option<String>,
        parameters: Option<ResponseParameters>,
    },

    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

impl Error {
    /// True for failures reported by the remote service. Everything else is
    /// a local bug or a transport problem.
    pub fn is_remote(&self) -> bool {
        matches!(self, Error::RemoteRequestFailed { .. })
    }

    /// Seconds to wait before retrying, when the remote asked for it.
    pub fn retry_after(&self) -> Option<i64> {
        match self {
            Error::RemoteRequestFailed {
                parameters: Some(params),
                ..
            } => params.retry_after,
            _ => None,
        }
    }

    pub(crate) fn malformed(annotation: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedAnnotation {
            annotation: annotation.into(),
            reason: reason.into(),
        }
    }
}

fn remote_summary(error_code: &Option<i64>, description: &Option<String>) -> String {
    match (error_code, description) {
        (Some(code), Some(desc)) => format!("{code} {desc}"),
        (Some(code), None) => code.to_string(),
        (None, Some(desc)) => desc.clone(),
        (None, None) => "no description".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_failure_display() {
        let err = Error::RemoteRequestFailed {
            error_code: Some(400),
            description: Some("Bad Request".into()),
            parameters: None,
        };
        assert_eq!(err.to_string(), "remote request failed: 400 Bad Request");
        assert!(err.is_remote());
        assert_eq!(err.retry_after(), None);
    }

    #[test]
    fn retry_after_comes_from_parameters() {
        let err = Error::RemoteRequestFailed {
            error_code: Some(429),
            description: None,
            parameters: Some(ResponseParameters {
                migrate_to_chat_id: None,
                retry_after: Some(5),
            }),
        };
        assert_eq!(err.retry_after(), Some(5));
        assert_eq!(err.to_string(), "remote request failed: 429");
    }

    #[test]
    fn local_errors_are_not_remote() {
        assert!(!Error::UnknownRecord("Nope".into()).is_remote());
    }
}
