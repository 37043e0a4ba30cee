//! Error types for signal parsing, rendering and dispatch.

use thiserror::Error;
use twinproto_types::SchemaVersion;

/// Result type for signal operations.
pub type SignalResult<T> = Result<T, SignalError>;

/// Errors that can occur while handling signals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    /// Malformed wire data: missing or mistyped fields, invalid values.
    #[error(transparent)]
    Json(#[from] twinproto_types::Error),

    /// The `type` discriminator is missing or not registered.
    #[error("unknown signal type: {}", discriminator.as_deref().unwrap_or("<missing>"))]
    UnknownType { discriminator: Option<String> },

    /// A parser was handed an object of another signal type.
    #[error("expected signal type '{expected}', found '{found}'")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },

    /// The signal type does not exist in the requested schema version.
    #[error("signal type '{signal_type}' does not support schema version {requested} (supported: {})", format_versions(supported))]
    UnsupportedSchemaVersion {
        signal_type: &'static str,
        requested: SchemaVersion,
        supported: &'static [SchemaVersion],
    },

    /// Batch identifiers span more than one namespace, or none while one
    /// was required.
    #[error("thing ids must share one namespace, found: [{}]", namespaces.join(", "))]
    InconsistentNamespaces { namespaces: Vec<String> },

    /// The explicit namespace differs from the one the ids carry.
    #[error("namespace '{namespace}' does not match the thing ids' namespace '{found}'")]
    NamespaceMismatch { namespace: String, found: String },

    /// A well-known header carries a value of the wrong form.
    #[error("invalid header '{key}': {reason}")]
    InvalidHeader { key: String, reason: String },

    /// The addressed part of a thing does not exist.
    #[error("'{path}' of thing '{thing_id}' does not exist or is not accessible")]
    NotAccessible { thing_id: String, path: String },
}

fn format_versions(versions: &[SchemaVersion]) -> String {
    versions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
