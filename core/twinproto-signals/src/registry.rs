//! Discriminator-based dispatch.
//!
//! The registry maps every `type` discriminator to a parser producing a
//! [`ThingSignal`]. It is filled once through [`TypeRegistryBuilder`] and
//! read-only afterwards; [`TypeRegistry::global`] holds the process-wide
//! instance.

use crate::commands::{
    RetrieveAcl, RetrieveAttribute, RetrieveAttributes, RetrieveFeature,
    RetrieveFeatureProperties, RetrieveFeatureProperty, RetrieveFeatures, RetrievePolicyId,
    RetrieveThing, RetrieveThings, ThingQueryCommand,
};
use crate::error::{SignalError, SignalResult};
use crate::fields::envelope;
use crate::headers::Headers;
use crate::responses::{
    RetrieveAclResponse, RetrieveAttributeResponse, RetrieveAttributesResponse,
    RetrieveFeaturePropertiesResponse, RetrieveFeaturePropertyResponse, RetrieveFeatureResponse,
    RetrieveFeaturesResponse, RetrievePolicyIdResponse, RetrieveThingResponse,
    RetrieveThingsResponse, ThingQueryCommandResponse,
};
use crate::signal::Signal;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;
use twinproto_types::{Error, JsonFieldDefinition, JsonObject, JsonPointer, SchemaVersion};

/// A resolved signal: a command or a response.
#[derive(Debug, Clone, PartialEq)]
pub enum ThingSignal {
    Command(ThingQueryCommand),
    Response(ThingQueryCommandResponse),
}

impl ThingSignal {
    #[must_use]
    pub fn signal_type(&self) -> &'static str {
        match self {
            Self::Command(c) => c.signal_type(),
            Self::Response(r) => r.signal_type(),
        }
    }

    #[must_use]
    pub fn headers(&self) -> &Headers {
        match self {
            Self::Command(c) => c.headers(),
            Self::Response(r) => r.headers(),
        }
    }

    /// Returns a copy carrying `headers`.
    #[must_use]
    pub fn set_headers(&self, headers: Headers) -> Self {
        match self {
            Self::Command(c) => Self::Command(c.set_headers(headers)),
            Self::Response(r) => Self::Response(r.set_headers(headers)),
        }
    }

    #[must_use]
    pub fn resource_path(&self) -> JsonPointer {
        match self {
            Self::Command(c) => c.resource_path(),
            Self::Response(r) => r.resource_path(),
        }
    }

    #[must_use]
    pub fn implemented_schema_version(&self) -> SchemaVersion {
        match self {
            Self::Command(c) => c.implemented_schema_version(),
            Self::Response(r) => r.implemented_schema_version(),
        }
    }

    /// The versions the wrapped signal's type exists in.
    #[must_use]
    pub fn supported_versions(&self) -> &'static [SchemaVersion] {
        match self {
            Self::Command(c) => c.supported_versions(),
            Self::Response(r) => r.supported_versions(),
        }
    }

    pub fn to_json(
        &self,
        version: SchemaVersion,
        predicate: &dyn Fn(&JsonFieldDefinition) -> bool,
    ) -> SignalResult<JsonObject> {
        match self {
            Self::Command(c) => c.to_json(version, predicate),
            Self::Response(r) => r.to_json(version, predicate),
        }
    }

    pub fn to_json_default(&self) -> SignalResult<JsonObject> {
        match self {
            Self::Command(c) => c.to_json_default(),
            Self::Response(r) => r.to_json_default(),
        }
    }
}

impl From<ThingQueryCommand> for ThingSignal {
    fn from(command: ThingQueryCommand) -> Self {
        Self::Command(command)
    }
}

impl From<ThingQueryCommandResponse> for ThingSignal {
    fn from(response: ThingQueryCommandResponse) -> Self {
        Self::Response(response)
    }
}

macro_rules! into_thing_signal {
    ($wrapper:ident: $($signal:ident),+ $(,)?) => {
        $(
            impl From<$signal> for ThingSignal {
                fn from(signal: $signal) -> Self {
                    Self::from($wrapper::from(signal))
                }
            }
        )+
    };
}

into_thing_signal!(ThingQueryCommand:
    RetrieveThing, RetrieveThings, RetrieveAttributes, RetrieveAttribute, RetrieveFeatures,
    RetrieveFeature, RetrieveFeatureProperties, RetrieveFeatureProperty, RetrievePolicyId,
    RetrieveAcl,
);

into_thing_signal!(ThingQueryCommandResponse:
    RetrieveThingResponse, RetrieveThingsResponse, RetrieveAttributesResponse,
    RetrieveAttributeResponse, RetrieveFeaturesResponse, RetrieveFeatureResponse,
    RetrieveFeaturePropertiesResponse, RetrieveFeaturePropertyResponse, RetrievePolicyIdResponse,
    RetrieveAclResponse,
);

/// Parses one signal type out of its wire object.
pub type ParseFn = fn(&JsonObject, &Headers) -> SignalResult<ThingSignal>;

fn parse_into<S>(object: &JsonObject, headers: &Headers) -> SignalResult<ThingSignal>
where
    S: Signal + Into<ThingSignal>,
{
    S::parse(object, headers).map(Into::into)
}

/// Collects registrations; discriminators are unique.
#[derive(Default)]
pub struct TypeRegistryBuilder {
    parsers: HashMap<String, ParseFn>,
}

impl TypeRegistryBuilder {
    /// Registers `parse` under `discriminator`.
    ///
    /// # Panics
    ///
    /// Panics if `discriminator` is already registered.
    #[must_use]
    pub fn register(mut self, discriminator: impl Into<String>, parse: ParseFn) -> Self {
        let discriminator = discriminator.into();
        assert!(
            !self.parsers.contains_key(&discriminator),
            "signal type '{discriminator}' registered twice"
        );
        self.parsers.insert(discriminator, parse);
        self
    }

    /// Registers `S` under its own discriminator.
    ///
    /// # Panics
    ///
    /// Panics if `S::TYPE` is already registered.
    #[must_use]
    pub fn register_signal<S>(self) -> Self
    where
        S: Signal + Into<ThingSignal>,
    {
        self.register(S::TYPE, parse_into::<S>)
    }

    #[must_use]
    pub fn build(self) -> TypeRegistry {
        debug!(types = self.parsers.len(), "Built signal type registry");
        TypeRegistry {
            parsers: self.parsers,
        }
    }
}

/// A frozen map from discriminator to parser.
pub struct TypeRegistry {
    parsers: HashMap<String, ParseFn>,
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("discriminators", &self.discriminators())
            .finish()
    }
}

impl TypeRegistry {
    #[must_use]
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::default()
    }

    /// A registry of every thing query command and response.
    #[must_use]
    pub fn thing_query_signals() -> Self {
        Self::builder()
            .register_signal::<RetrieveThing>()
            .register_signal::<RetrieveThings>()
            .register_signal::<RetrieveAttributes>()
            .register_signal::<RetrieveAttribute>()
            .register_signal::<RetrieveFeatures>()
            .register_signal::<RetrieveFeature>()
            .register_signal::<RetrieveFeatureProperties>()
            .register_signal::<RetrieveFeatureProperty>()
            .register_signal::<RetrievePolicyId>()
            .register_signal::<RetrieveAcl>()
            .register_signal::<RetrieveThingResponse>()
            .register_signal::<RetrieveThingsResponse>()
            .register_signal::<RetrieveAttributesResponse>()
            .register_signal::<RetrieveAttributeResponse>()
            .register_signal::<RetrieveFeaturesResponse>()
            .register_signal::<RetrieveFeatureResponse>()
            .register_signal::<RetrieveFeaturePropertiesResponse>()
            .register_signal::<RetrieveFeaturePropertyResponse>()
            .register_signal::<RetrievePolicyIdResponse>()
            .register_signal::<RetrieveAclResponse>()
            .build()
    }

    /// The process-wide registry of thing query signals, built on first use.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<TypeRegistry> = OnceLock::new();
        GLOBAL.get_or_init(Self::thing_query_signals)
    }

    #[must_use]
    pub fn contains(&self, discriminator: &str) -> bool {
        self.parsers.contains_key(discriminator)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }

    /// Every registered discriminator, sorted.
    #[must_use]
    pub fn discriminators(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.parsers.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Reads the discriminator and hands the object to its parser.
    ///
    /// Parser errors are returned as they are.
    pub fn resolve(&self, object: &JsonObject, headers: &Headers) -> SignalResult<ThingSignal> {
        let discriminator = object.get(envelope::TYPE.name()).and_then(Value::as_str);
        let Some(parse) = discriminator.and_then(|d| self.parsers.get(d)) else {
            debug!(discriminator = ?discriminator, "Unknown signal type");
            return Err(SignalError::UnknownType {
                discriminator: discriminator.map(str::to_string),
            });
        };
        parse(object, headers)
    }

    /// Like [`TypeRegistry::resolve`] for any JSON value; non-objects are
    /// malformed input.
    pub fn resolve_value(&self, value: &Value, headers: &Headers) -> SignalResult<ThingSignal> {
        let object = value.as_object().ok_or_else(|| Error::WrongFieldType {
            pointer: JsonPointer::root().to_string(),
            expected: "object",
        })?;
        self.resolve(object, headers)
    }
}
