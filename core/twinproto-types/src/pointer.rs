//! Hierarchical paths into JSON objects.

use crate::{Error, JsonObject};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// A path of non-empty key segments, e.g. `/features/lamp/properties/on`.
///
/// The empty pointer addresses the root of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JsonPointer(Vec<String>);

impl JsonPointer {
    /// The pointer addressing the whole document.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// A pointer with exactly one segment. The segment is taken verbatim.
    #[must_use]
    pub fn of(key: impl Into<String>) -> Self {
        Self(vec![key.into()])
    }

    /// Builds a pointer from already validated segments.
    pub(crate) fn from_segments(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Parses `/a/b`, `a/b`, `/` or the empty string.
    ///
    /// At most one leading `/` is stripped; any empty segment (trailing or
    /// doubled separators) is rejected.
    pub fn parse(s: &str) -> Result<Self, Error> {
        let body = s.strip_prefix('/').unwrap_or(s);
        if body.is_empty() {
            return Ok(Self::root());
        }
        let segments: Vec<String> = body.split('/').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(Error::InvalidPointer(s.to_string()));
        }
        Ok(Self(segments))
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Returns a new pointer with `key` appended.
    #[must_use]
    pub fn append(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(key.into());
        Self(segments)
    }

    /// Returns a new pointer with all of `other`'s segments appended.
    #[must_use]
    pub fn join(&self, other: &JsonPointer) -> Self {
        let mut segments = self.0.clone();
        segments.extend(other.0.iter().cloned());
        Self(segments)
    }

    /// Returns the pointer without its first segment.
    #[must_use]
    pub fn without_first(&self) -> Self {
        Self(self.0.iter().skip(1).cloned().collect())
    }

    /// True if `self` is equal to `other` or one of its ancestors.
    #[must_use]
    pub fn is_prefix_of(&self, other: &JsonPointer) -> bool {
        self.0.len() <= other.0.len() && self.0.iter().zip(&other.0).all(|(a, b)| a == b)
    }

    /// Resolves the pointer against `value`, descending through objects only.
    #[must_use]
    pub fn get<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        self.0
            .iter()
            .try_fold(value, |current, key| current.as_object()?.get(key))
    }

    /// Resolves the pointer against the fields of `object`.
    ///
    /// The root pointer has no value inside an object and yields `None`.
    #[must_use]
    pub fn get_in<'a>(&self, object: &'a JsonObject) -> Option<&'a Value> {
        let (first, rest) = self.0.split_first()?;
        rest.iter()
            .try_fold(object.get(first)?, |current, key| {
                current.as_object()?.get(key)
            })
    }

    /// Writes `value` at this pointer inside `object`, creating (or
    /// replacing non-object) intermediate values with objects.
    pub fn set_in(&self, object: &mut JsonObject, value: Value) {
        let Some((last, parents)) = self.0.split_last() else {
            return;
        };
        let mut current = object;
        for key in parents {
            let slot = current
                .entry(key.clone())
                .or_insert_with(|| Value::Object(JsonObject::new()));
            if !slot.is_object() {
                *slot = Value::Object(JsonObject::new());
            }
            let Value::Object(map) = slot else {
                return;
            };
            current = map;
        }
        current.insert(last.clone(), value);
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.0 {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for JsonPointer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for JsonPointer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for JsonPointer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
