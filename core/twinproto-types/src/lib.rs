//! Core wire types for twinproto.
//!
//! This crate defines the building blocks every signal and entity rendering
//! depends on:
//! - [`SchemaVersion`]: the protocol generation gating which fields exist
//! - [`JsonPointer`]: hierarchical paths into a JSON object
//! - [`ThingId`] and [`FeatureId`]: validated entity identifiers
//! - [`codec`]: declarative field tables and version-aware render/parse
//! - [`FieldSelector`]: partial-field projections with feature wildcards
//!
//! Nothing here knows about concrete commands or responses; those live in
//! `twinproto-signals` and reuse these types for their wire form.

pub mod codec;
mod ids;
mod pointer;
mod selector;
mod version;

pub use codec::{
    FieldKind, FieldSpec, FieldValues, JsonFieldDefinition, JsonObjectBuilder, ValueType,
};
pub use ids::{FeatureId, ThingId};
pub use pointer::JsonPointer;
pub use selector::{FEATURES_ROOT, FieldSelector, WILDCARD};
pub use version::SchemaVersion;

/// A JSON object with insertion-ordered keys.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading, validating or projecting wire data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("missing required field '{pointer}'")]
    MissingField { pointer: String },

    #[error("field '{pointer}' has the wrong type: expected {expected}")]
    WrongFieldType {
        pointer: String,
        expected: &'static str,
    },

    #[error("field '{pointer}' has an invalid value: {reason}")]
    InvalidFieldValue { pointer: String, reason: String },

    #[error("invalid field selection '{selector}': {reason}")]
    InvalidFieldSelector { selector: String, reason: String },

    #[error("invalid JSON pointer '{0}'")]
    InvalidPointer(String),

    #[error("invalid thing id '{id}': {reason}")]
    InvalidThingId { id: String, reason: &'static str },

    #[error("invalid feature id '{id}': {reason}")]
    InvalidFeatureId { id: String, reason: &'static str },

    #[error("unknown schema version '{0}'")]
    UnknownSchemaVersion(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl Error {
    /// Re-targets a field-level error to a field nested under `parent`.
    ///
    /// Used when a nested object (a feature inside `features`, a thing inside
    /// a response) fails to parse, so the reported pointer is absolute.
    #[must_use]
    pub fn nested_under(self, parent: &str) -> Self {
        let join = |pointer: String| format!("/{}{}", parent.trim_start_matches('/'), pointer);
        match self {
            Self::MissingField { pointer } => Self::MissingField {
                pointer: join(pointer),
            },
            Self::WrongFieldType { pointer, expected } => Self::WrongFieldType {
                pointer: join(pointer),
                expected,
            },
            Self::InvalidFieldValue { pointer, reason } => Self::InvalidFieldValue {
                pointer: join(pointer),
                reason,
            },
            other => other,
        }
    }
}
