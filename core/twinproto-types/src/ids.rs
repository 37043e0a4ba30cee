//! Identifier types used throughout the protocol.
//!
//! Thing identifiers are `:`-delimited strings whose first segment is the
//! namespace. Feature identifiers name members of a thing's feature
//! collection and must stay addressable as a single pointer segment.

use crate::{Error, WILDCARD};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Separates a thing id's namespace from its name.
pub const NAMESPACE_DELIMITER: char = ':';

/// Unique identifier of a thing, `[<namespace>:]<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThingId {
    raw: String,
    /// Byte offset of the delimiter, when the id carries a non-empty namespace.
    delimiter: Option<usize>,
}

impl ThingId {
    /// Parses and validates a thing id.
    pub fn parse(s: &str) -> Result<Self, Error> {
        let invalid = |reason| Error::InvalidThingId {
            id: s.to_string(),
            reason,
        };

        let (namespace, name) = match s.find(NAMESPACE_DELIMITER) {
            Some(idx) => (&s[..idx], &s[idx + 1..]),
            None => ("", s),
        };

        if name.is_empty() {
            return Err(invalid("name must not be empty"));
        }
        if name.contains('/') || name.chars().any(char::is_control) {
            return Err(invalid("name must not contain '/' or control characters"));
        }
        if !namespace.is_empty() && !is_valid_namespace(namespace) {
            return Err(invalid(
                "namespace must start with a letter and contain only letters, digits, '_', '.' or '-'",
            ));
        }

        Ok(Self {
            raw: s.to_string(),
            delimiter: (!namespace.is_empty()).then_some(namespace.len()),
        })
    }

    /// Creates a namespaced id from its parts.
    pub fn of(namespace: &str, name: &str) -> Result<Self, Error> {
        Self::parse(&format!("{namespace}{NAMESPACE_DELIMITER}{name}"))
    }

    /// The namespace segment, or `None` for an unqualified id.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.delimiter.map(|idx| &self.raw[..idx])
    }

    /// The name segment.
    #[must_use]
    pub fn name(&self) -> &str {
        match self.raw.find(NAMESPACE_DELIMITER) {
            Some(idx) => &self.raw[idx + 1..],
            None => &self.raw,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

fn is_valid_namespace(namespace: &str) -> bool {
    let mut chars = namespace.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

impl fmt::Display for ThingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for ThingId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ThingId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for ThingId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Identifier of a feature within a thing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureId(String);

impl FeatureId {
    /// Parses and validates a feature id.
    pub fn parse(s: &str) -> Result<Self, Error> {
        let invalid = |reason| Error::InvalidFeatureId {
            id: s.to_string(),
            reason,
        };
        if s.is_empty() {
            return Err(invalid("must not be empty"));
        }
        if s == WILDCARD {
            return Err(invalid("the wildcard is reserved"));
        }
        if s.contains('/') || s.chars().any(char::is_control) {
            return Err(invalid("must not contain '/' or control characters"));
        }
        Ok(Self(s.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FeatureId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for FeatureId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for FeatureId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for FeatureId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
