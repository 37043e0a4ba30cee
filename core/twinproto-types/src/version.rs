//! Protocol schema versions.
//!
//! Every field definition and every signal type declares the versions it
//! exists in. Rendering at a version drops the fields that do not exist in
//! it; parsing at a version neither requires nor reads them.

use crate::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A protocol generation.
///
/// Ordered so that `V1 < V2`; the numeric value is the wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SchemaVersion {
    /// The first protocol generation (access control lists, named commands).
    V1 = 1,
    /// The current protocol generation (policies, desired properties).
    V2 = 2,
}

impl SchemaVersion {
    /// The version used when a request does not name one.
    pub const LATEST: Self = Self::V2;

    /// Every known version, in ascending order.
    pub const ALL: &'static [Self] = &[Self::V1, Self::V2];

    /// Only the first generation.
    pub const V1_ONLY: &'static [Self] = &[Self::V1];

    /// Only the current generation.
    pub const V2_ONLY: &'static [Self] = &[Self::V2];

    /// Returns the wire integer of this version.
    #[must_use]
    pub const fn to_int(self) -> u8 {
        self as u8
    }

    /// Looks a version up by its wire integer.
    #[must_use]
    pub const fn from_int(value: i64) -> Option<Self> {
        match value {
            1 => Some(Self::V1),
            2 => Some(Self::V2),
            _ => None,
        }
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::LATEST
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_int())
    }
}

impl FromStr for SchemaVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .ok()
            .and_then(Self::from_int)
            .ok_or_else(|| Error::UnknownSchemaVersion(s.to_string()))
    }
}

impl Serialize for SchemaVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.to_int())
    }
}

impl<'de> Deserialize<'de> for SchemaVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        Self::from_int(raw).ok_or_else(|| {
            serde::de::Error::custom(Error::UnknownSchemaVersion(raw.to_string()))
        })
    }
}
