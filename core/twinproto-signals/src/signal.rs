//! The signal contract shared by every command and response.
//!
//! A signal's wire form is one JSON object: an envelope (`type`, the V1
//! `command`/`response` name, the response `status`) followed by the rows of
//! the type's field table. Headers are carried beside the object.

use crate::error::{SignalError, SignalResult};
use crate::fields::envelope;
use crate::headers::Headers;
use serde_json::Value;
use std::fmt;
use tracing::trace;
use twinproto_types::codec::{FieldSpec, predicates};
use twinproto_types::{
    Error, FieldSelector, FieldValues, JsonFieldDefinition, JsonObject, JsonObjectBuilder,
    JsonPointer, SchemaVersion, ThingId,
};

/// Discriminator prefix of thing commands.
pub const COMMAND_TYPE_PREFIX: &str = "things.commands.";
/// Discriminator prefix of thing command responses.
pub const RESPONSE_TYPE_PREFIX: &str = "things.responses.";

static COMMAND_ENVELOPE: [FieldSpec<()>; 2] = [
    FieldSpec::required(envelope::TYPE, |_| None),
    FieldSpec::required(envelope::COMMAND, |_| None),
];

static RESPONSE_ENVELOPE: [FieldSpec<()>; 3] = [
    FieldSpec::required(envelope::TYPE, |_| None),
    FieldSpec::required(envelope::RESPONSE, |_| None),
    FieldSpec::required(envelope::STATUS, |_| None),
];

/// Whether a signal asks for something or answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Command,
    Response,
}

impl SignalKind {
    /// The envelope field repeating the signal name in V1.
    #[must_use]
    pub const fn name_field(self) -> &'static JsonFieldDefinition {
        match self {
            Self::Command => &envelope::COMMAND,
            Self::Response => &envelope::RESPONSE,
        }
    }

    fn envelope(self) -> &'static [FieldSpec<()>] {
        match self {
            Self::Command => &COMMAND_ENVELOPE,
            Self::Response => &RESPONSE_ENVELOPE,
        }
    }
}

/// An HTTP status code carried by responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HttpStatus(u16);

impl HttpStatus {
    pub const OK: Self = Self(200);
    pub const NOT_FOUND: Self = Self(404);

    /// Accepts codes in `100..=599`.
    #[must_use]
    pub fn new(code: u16) -> Option<Self> {
        (100..=599).contains(&code).then_some(Self(code))
    }

    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    #[must_use]
    pub fn is_success(self) -> bool {
        (200..300).contains(&self.0)
    }
}

impl fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fails unless `requested` is one of `supported`.
pub fn ensure_supported(
    signal_type: &'static str,
    requested: SchemaVersion,
    supported: &'static [SchemaVersion],
) -> SignalResult<()> {
    if supported.contains(&requested) {
        Ok(())
    } else {
        Err(SignalError::UnsupportedSchemaVersion {
            signal_type,
            requested,
            supported,
        })
    }
}

/// Reads the response status out of checked envelope values.
pub(crate) fn read_status(values: &FieldValues<'_>) -> SignalResult<HttpStatus> {
    let code = values.require_i64(&envelope::STATUS)?;
    u16::try_from(code)
        .ok()
        .and_then(HttpStatus::new)
        .ok_or_else(|| {
            SignalError::Json(Error::InvalidFieldValue {
                pointer: envelope::STATUS.pointer().to_string(),
                reason: format!("{code} is not an HTTP status"),
            })
        })
}

/// Reads the optional `selectedFields` row.
pub(crate) fn read_selector(
    values: &FieldValues<'_>,
    definition: &JsonFieldDefinition,
) -> SignalResult<Option<FieldSelector>> {
    Ok(values.parse_str(definition, FieldSelector::parse)?)
}

/// Reads a required thing id row.
pub(crate) fn read_thing_id(
    values: &FieldValues<'_>,
    definition: &JsonFieldDefinition,
) -> SignalResult<ThingId> {
    Ok(values.require_parsed(definition, ThingId::parse)?)
}

/// A typed command or response.
///
/// Implementors declare their discriminator, the versions they exist in and
/// an ordered field table; rendering and parsing are provided.
pub trait Signal: Sized + Clone + PartialEq + fmt::Debug + 'static {
    /// The discriminator.
    const TYPE: &'static str;
    /// The short name, e.g. `retrieveThing`.
    const NAME: &'static str;
    const KIND: SignalKind;
    /// The field table, in rendering order, after the envelope.
    const FIELDS: &'static [FieldSpec<Self>];
    const SUPPORTED_VERSIONS: &'static [SchemaVersion] = SchemaVersion::ALL;

    fn headers(&self) -> &Headers;

    /// Returns a copy carrying `headers`.
    #[must_use]
    fn set_headers(&self, headers: Headers) -> Self;

    /// The part of the thing the signal addresses.
    fn resource_path(&self) -> JsonPointer;

    /// Builds the signal from checked field values.
    fn from_fields(values: &FieldValues<'_>, headers: Headers) -> SignalResult<Self>;

    /// The response status; `None` for commands.
    fn status(&self) -> Option<HttpStatus> {
        None
    }

    fn signal_type(&self) -> &'static str {
        Self::TYPE
    }

    /// The newest version this type exists in.
    fn default_schema_version() -> SchemaVersion {
        Self::SUPPORTED_VERSIONS
            .last()
            .copied()
            .unwrap_or(SchemaVersion::LATEST)
    }

    /// The version named by the headers, or the type's default.
    fn implemented_schema_version(&self) -> SchemaVersion {
        self.headers()
            .schema_version()
            .unwrap_or_else(Self::default_schema_version)
    }

    /// Renders the signal at `version`, keeping the fields `predicate` admits.
    fn to_json(
        &self,
        version: SchemaVersion,
        predicate: &dyn Fn(&JsonFieldDefinition) -> bool,
    ) -> SignalResult<JsonObject> {
        ensure_supported(Self::TYPE, version, Self::SUPPORTED_VERSIONS)?;
        let mut builder = JsonObjectBuilder::new(version, predicate);
        builder
            .set(&envelope::TYPE, Self::TYPE)
            .set(Self::KIND.name_field(), Self::NAME);
        if let Some(status) = self.status() {
            builder.set(&envelope::STATUS, status.as_u16());
        }
        builder.render(self, Self::FIELDS);
        Ok(builder.build())
    }

    /// Renders the regular fields at the implemented schema version.
    fn to_json_default(&self) -> SignalResult<JsonObject> {
        self.to_json(self.implemented_schema_version(), &predicates::regular)
    }

    /// Parses a signal of this type at the version named by `headers`, or
    /// the type's default when they name none.
    fn parse(object: &JsonObject, headers: &Headers) -> SignalResult<Self> {
        let version = headers
            .schema_version()
            .unwrap_or_else(Self::default_schema_version);

        // A foreign discriminator wins over a version this type lacks.
        let mut values = FieldValues::new();
        values.read(object, version, Self::KIND.envelope())?;
        let found = values.require_str(&envelope::TYPE)?;
        if found != Self::TYPE {
            return Err(SignalError::TypeMismatch {
                expected: Self::TYPE,
                found: found.to_string(),
            });
        }
        ensure_supported(Self::TYPE, version, Self::SUPPORTED_VERSIONS)?;
        let name_field = Self::KIND.name_field();
        if let Some(name) = values.str(name_field)
            && name != Self::NAME
        {
            return Err(SignalError::Json(Error::InvalidFieldValue {
                pointer: name_field.pointer().to_string(),
                reason: format!("expected '{}', found '{name}'", Self::NAME),
            }));
        }

        values.read(object, version, Self::FIELDS)?;
        let signal = Self::from_fields(&values, headers.clone())?;
        trace!(signal_type = Self::TYPE, %version, "Parsed signal");
        Ok(signal)
    }
}

/// A signal asking for (part of) a thing.
pub trait Command: Signal {
    /// The addressed thing; `None` for batch commands.
    fn entity_id(&self) -> Option<&ThingId>;

    fn selected_fields(&self) -> Option<&FieldSelector> {
        None
    }
}

/// A signal answering a [`Command`].
pub trait CommandResponse: Signal {
    fn http_status(&self) -> HttpStatus {
        self.status().unwrap_or(HttpStatus::OK)
    }

    /// The returned payload as a JSON value.
    fn entity(&self) -> Value;
}
