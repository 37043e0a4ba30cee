//! Signal headers.
//!
//! Headers travel next to the signal body rather than inside it. They are
//! immutable once built; derivations go through [`Headers::to_builder`].

use crate::error::{SignalError, SignalResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use twinproto_types::{JsonObject, SchemaVersion};
use uuid::Uuid;

/// Correlates a response with the command it answers.
pub const CORRELATION_ID: &str = "correlation-id";
/// The schema version the signal was (or is to be) rendered in.
pub const VERSION: &str = "version";
/// Whether the sender waits for a response. Defaults to `true`.
pub const RESPONSE_REQUIRED: &str = "response-required";
/// Whether the command should be validated without effect. Defaults to `false`.
pub const DRY_RUN: &str = "dry-run";
/// Media type of the payload.
pub const CONTENT_TYPE: &str = "content-type";

/// Case-insensitive string headers, stored with lowercase keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Arc<BTreeMap<String, String>>,
}

impl Headers {
    /// Headers without any entry.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn builder() -> HeadersBuilder {
        HeadersBuilder::default()
    }

    /// Starts a builder pre-filled with these headers.
    #[must_use]
    pub fn to_builder(&self) -> HeadersBuilder {
        HeadersBuilder {
            entries: (*self.entries).clone(),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&key.to_ascii_lowercase()).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn correlation_id(&self) -> Option<&str> {
        self.get(CORRELATION_ID)
    }

    /// The schema version header; validated when the headers were built.
    #[must_use]
    pub fn schema_version(&self) -> Option<SchemaVersion> {
        self.get(VERSION).and_then(|v| v.parse().ok())
    }

    #[must_use]
    pub fn is_response_required(&self) -> bool {
        self.get(RESPONSE_REQUIRED) != Some("false")
    }

    #[must_use]
    pub fn is_dry_run(&self) -> bool {
        self.get(DRY_RUN) == Some("true")
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.get(CONTENT_TYPE)
    }

    /// Renders the headers as a JSON object of strings.
    #[must_use]
    pub fn to_json(&self) -> JsonObject {
        self.iter()
            .map(|(k, v)| (k.to_string(), Value::from(v)))
            .collect()
    }

    /// Reads headers from a JSON object. Booleans and numbers are accepted
    /// in their string form.
    pub fn from_json(object: &JsonObject) -> SignalResult<Self> {
        let mut builder = Self::builder();
        for (key, value) in object {
            let value = match value {
                Value::String(s) => s.clone(),
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                other => {
                    return Err(SignalError::InvalidHeader {
                        key: key.clone(),
                        reason: format!("expected a string, found {other}"),
                    });
                }
            };
            builder = builder.set(key, value);
        }
        builder.build()
    }
}

/// Builds [`Headers`]; well-known values are checked by [`HeadersBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct HeadersBuilder {
    entries: BTreeMap<String, String>,
}

impl HeadersBuilder {
    /// Sets a raw header. The key is lowercased.
    #[must_use]
    pub fn set(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.entries
            .insert(key.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    #[must_use]
    pub fn remove(mut self, key: &str) -> Self {
        self.entries.remove(&key.to_ascii_lowercase());
        self
    }

    #[must_use]
    pub fn correlation_id(self, id: impl Into<String>) -> Self {
        self.set(CORRELATION_ID, id)
    }

    /// Sets a freshly generated correlation id.
    #[must_use]
    pub fn random_correlation_id(self) -> Self {
        self.set(CORRELATION_ID, Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn schema_version(self, version: SchemaVersion) -> Self {
        self.set(VERSION, version.to_string())
    }

    #[must_use]
    pub fn response_required(self, required: bool) -> Self {
        self.set(RESPONSE_REQUIRED, required.to_string())
    }

    #[must_use]
    pub fn dry_run(self, dry_run: bool) -> Self {
        self.set(DRY_RUN, dry_run.to_string())
    }

    #[must_use]
    pub fn content_type(self, content_type: impl Into<String>) -> Self {
        self.set(CONTENT_TYPE, content_type)
    }

    /// Validates the well-known headers and freezes the map.
    pub fn build(self) -> SignalResult<Headers> {
        for (key, value) in &self.entries {
            validate(key, value)?;
        }
        Ok(Headers {
            entries: Arc::new(self.entries),
        })
    }
}

fn validate(key: &str, value: &str) -> SignalResult<()> {
    let invalid = |reason: String| SignalError::InvalidHeader {
        key: key.to_string(),
        reason,
    };
    match key {
        CORRELATION_ID if value.trim().is_empty() => Err(invalid("must not be blank".into())),
        VERSION => value
            .parse::<SchemaVersion>()
            .map(|_| ())
            .map_err(|err| invalid(err.to_string())),
        RESPONSE_REQUIRED | DRY_RUN if value != "true" && value != "false" => {
            Err(invalid(format!("expected 'true' or 'false', found '{value}'")))
        }
        _ => Ok(()),
    }
}

impl Serialize for Headers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Headers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = BTreeMap::<String, String>::deserialize(deserializer)?;
        entries
            .into_iter()
            .fold(Headers::builder(), |b, (k, v)| b.set(k, v))
            .build()
            .map_err(serde::de::Error::custom)
    }
}
