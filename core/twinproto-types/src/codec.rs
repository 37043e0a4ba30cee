//! Schema-version aware rendering and parsing of JSON fields.
//!
//! Each wire type declares an ordered table of [`FieldSpec`] rows once, as a
//! `static`. Rendering walks the table and keeps the rows that exist in the
//! target [`SchemaVersion`] and pass the caller's predicate; parsing walks
//! the same table to check presence and JSON types before any value is
//! constructed.
//!
//! ```
//! use serde_json::{Value, json};
//! use twinproto_types::codec::{self, FieldSpec, JsonFieldDefinition, JsonObjectBuilder};
//! use twinproto_types::SchemaVersion;
//!
//! struct Lamp { name: String, legacy_code: u32 }
//!
//! const NAME: JsonFieldDefinition = JsonFieldDefinition::string("name", SchemaVersion::ALL);
//! const CODE: JsonFieldDefinition = JsonFieldDefinition::number("code", SchemaVersion::V1_ONLY);
//!
//! static LAMP_FIELDS: [FieldSpec<Lamp>; 2] = [
//!     FieldSpec::required(NAME, |l| Some(Value::from(l.name.clone()))),
//!     FieldSpec::required(CODE, |l| Some(Value::from(l.legacy_code))),
//! ];
//!
//! let lamp = Lamp { name: "desk".into(), legacy_code: 7 };
//! let mut builder = JsonObjectBuilder::new(SchemaVersion::V2, &codec::predicates::regular);
//! builder.render(&lamp, &LAMP_FIELDS);
//! assert_eq!(Value::Object(builder.build()), json!({"name": "desk"}));
//! ```

use crate::{Error, JsonObject, JsonPointer, SchemaVersion};
use serde_json::Value;

/// How a field takes part in default renderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Rendered by default.
    Regular,
    /// Metadata (`_revision`, `_modified`); rendered only when selected.
    Special,
    /// Internal bookkeeping; never rendered by the provided predicates.
    Hidden,
}

/// The JSON type a field holds on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    Number,
    Bool,
    Object,
    Array,
    /// Any JSON value, including `null`.
    Any,
}

impl ValueType {
    /// Human-readable name used in error messages.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Bool => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Any => "any value",
        }
    }

    /// True if `value` is of this type.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Bool => value.is_boolean(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
            Self::Any => true,
        }
    }
}

/// A field's wire name, JSON type, kind and the schema versions it exists in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonFieldDefinition {
    name: &'static str,
    value_type: ValueType,
    kind: FieldKind,
    versions: &'static [SchemaVersion],
}

impl JsonFieldDefinition {
    #[must_use]
    pub const fn new(
        name: &'static str,
        value_type: ValueType,
        kind: FieldKind,
        versions: &'static [SchemaVersion],
    ) -> Self {
        Self {
            name,
            value_type,
            kind,
            versions,
        }
    }

    #[must_use]
    pub const fn string(name: &'static str, versions: &'static [SchemaVersion]) -> Self {
        Self::new(name, ValueType::String, FieldKind::Regular, versions)
    }

    #[must_use]
    pub const fn number(name: &'static str, versions: &'static [SchemaVersion]) -> Self {
        Self::new(name, ValueType::Number, FieldKind::Regular, versions)
    }

    #[must_use]
    pub const fn boolean(name: &'static str, versions: &'static [SchemaVersion]) -> Self {
        Self::new(name, ValueType::Bool, FieldKind::Regular, versions)
    }

    #[must_use]
    pub const fn object(name: &'static str, versions: &'static [SchemaVersion]) -> Self {
        Self::new(name, ValueType::Object, FieldKind::Regular, versions)
    }

    #[must_use]
    pub const fn array(name: &'static str, versions: &'static [SchemaVersion]) -> Self {
        Self::new(name, ValueType::Array, FieldKind::Regular, versions)
    }

    #[must_use]
    pub const fn any(name: &'static str, versions: &'static [SchemaVersion]) -> Self {
        Self::new(name, ValueType::Any, FieldKind::Regular, versions)
    }

    /// Returns a copy of this definition with a different kind.
    #[must_use]
    pub const fn with_kind(self, kind: FieldKind) -> Self {
        Self { kind, ..self }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        self.value_type
    }

    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    #[must_use]
    pub const fn versions(&self) -> &'static [SchemaVersion] {
        self.versions
    }

    /// The field's path inside its enclosing object.
    #[must_use]
    pub fn pointer(&self) -> JsonPointer {
        JsonPointer::of(self.name)
    }

    #[must_use]
    pub fn is_supported(&self, version: SchemaVersion) -> bool {
        self.versions.contains(&version)
    }
}

/// One row of a type's declarative field table.
pub struct FieldSpec<T> {
    definition: JsonFieldDefinition,
    required: bool,
    accessor: fn(&T) -> Option<Value>,
}

impl<T> FieldSpec<T> {
    /// A field that must be present in every version it exists in.
    pub const fn required(definition: JsonFieldDefinition, accessor: fn(&T) -> Option<Value>) -> Self {
        Self {
            definition,
            required: true,
            accessor,
        }
    }

    /// A field that may be absent.
    pub const fn optional(definition: JsonFieldDefinition, accessor: fn(&T) -> Option<Value>) -> Self {
        Self {
            definition,
            required: false,
            accessor,
        }
    }

    pub const fn definition(&self) -> &JsonFieldDefinition {
        &self.definition
    }

    /// True if the field must be present when parsing at `version`.
    pub fn is_required_at(&self, version: SchemaVersion) -> bool {
        self.required && self.definition.is_supported(version)
    }

    /// Reads the field's current value from `value`, if it has one.
    pub fn value_of(&self, value: &T) -> Option<Value> {
        (self.accessor)(value)
    }
}

/// Decides whether `definition` is rendered at `version` under `predicate`.
pub fn should_include(
    definition: &JsonFieldDefinition,
    version: SchemaVersion,
    predicate: &dyn Fn(&JsonFieldDefinition) -> bool,
) -> bool {
    definition.is_supported(version) && predicate(definition)
}

/// Ready-made rendering predicates.
pub mod predicates {
    use super::{FieldKind, JsonFieldDefinition};

    /// Every field, hidden ones included.
    pub fn all(_: &JsonFieldDefinition) -> bool {
        true
    }

    /// Regular fields only; the default wire rendering.
    pub fn regular(definition: &JsonFieldDefinition) -> bool {
        definition.kind() == FieldKind::Regular
    }

    /// Regular and special fields.
    pub fn not_hidden(definition: &JsonFieldDefinition) -> bool {
        definition.kind() != FieldKind::Hidden
    }
}

/// Accumulates the fields of one JSON object for a fixed version and
/// predicate. Rows failing [`should_include`] are dropped silently.
pub struct JsonObjectBuilder<'a> {
    object: JsonObject,
    version: SchemaVersion,
    predicate: &'a dyn Fn(&JsonFieldDefinition) -> bool,
}

impl<'a> JsonObjectBuilder<'a> {
    pub fn new(version: SchemaVersion, predicate: &'a dyn Fn(&JsonFieldDefinition) -> bool) -> Self {
        Self {
            object: JsonObject::new(),
            version,
            predicate,
        }
    }

    #[must_use]
    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    /// Sets `definition` to `value` if the field is included.
    pub fn set(&mut self, definition: &JsonFieldDefinition, value: impl Into<Value>) -> &mut Self {
        if should_include(definition, self.version, self.predicate) {
            self.object.insert(definition.name().to_string(), value.into());
        }
        self
    }

    /// Renders every row of `specs` that has a value, in table order.
    pub fn render<T>(&mut self, value: &T, specs: &[FieldSpec<T>]) -> &mut Self {
        for spec in specs {
            if !should_include(&spec.definition, self.version, self.predicate) {
                continue;
            }
            if let Some(field_value) = spec.value_of(value) {
                self.object
                    .insert(spec.definition.name().to_string(), field_value);
            }
        }
        self
    }

    #[must_use]
    pub fn build(self) -> JsonObject {
        self.object
    }
}

/// The checked field values of one JSON object.
///
/// Produced by [`FieldValues::read`], which has already verified presence of
/// required fields and the JSON type of every present field, so the typed
/// getters below cannot observe a mistyped value.
#[derive(Debug, Default)]
pub struct FieldValues<'a> {
    values: Vec<(&'static str, &'a Value)>,
}

impl<'a> FieldValues<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks `object` against `specs` at `version` and remembers the values.
    ///
    /// Rows that do not exist at `version` are skipped even if the object
    /// carries them, and keys without a row are ignored.
    pub fn read<T>(
        &mut self,
        object: &'a JsonObject,
        version: SchemaVersion,
        specs: &[FieldSpec<T>],
    ) -> Result<&mut Self, Error> {
        for spec in specs {
            let definition = &spec.definition;
            if !definition.is_supported(version) {
                continue;
            }
            match object.get(definition.name()) {
                None if spec.is_required_at(version) => {
                    return Err(Error::MissingField {
                        pointer: definition.pointer().to_string(),
                    });
                }
                None => {}
                Some(value) if !definition.value_type().accepts(value) => {
                    return Err(Error::WrongFieldType {
                        pointer: definition.pointer().to_string(),
                        expected: definition.value_type().describe(),
                    });
                }
                Some(value) => self.values.push((definition.name(), value)),
            }
        }
        Ok(self)
    }

    /// Shorthand for a single table read.
    pub fn of<T>(
        object: &'a JsonObject,
        version: SchemaVersion,
        specs: &[FieldSpec<T>],
    ) -> Result<Self, Error> {
        let mut values = Self::new();
        values.read(object, version, specs)?;
        Ok(values)
    }

    #[must_use]
    pub fn value(&self, definition: &JsonFieldDefinition) -> Option<&'a Value> {
        self.values
            .iter()
            .find(|(name, _)| *name == definition.name())
            .map(|(_, value)| *value)
    }

    #[must_use]
    pub fn contains(&self, definition: &JsonFieldDefinition) -> bool {
        self.value(definition).is_some()
    }

    #[must_use]
    pub fn str(&self, definition: &JsonFieldDefinition) -> Option<&'a str> {
        self.value(definition).and_then(Value::as_str)
    }

    #[must_use]
    pub fn object(&self, definition: &JsonFieldDefinition) -> Option<&'a JsonObject> {
        self.value(definition).and_then(Value::as_object)
    }

    #[must_use]
    pub fn array(&self, definition: &JsonFieldDefinition) -> Option<&'a Vec<Value>> {
        self.value(definition).and_then(Value::as_array)
    }

    #[must_use]
    pub fn bool(&self, definition: &JsonFieldDefinition) -> Option<bool> {
        self.value(definition).and_then(Value::as_bool)
    }

    /// Reads an integer field. Fractional numbers are an invalid value.
    pub fn i64(&self, definition: &JsonFieldDefinition) -> Result<Option<i64>, Error> {
        match self.value(definition) {
            None => Ok(None),
            Some(value) => value.as_i64().map(Some).ok_or_else(|| Error::InvalidFieldValue {
                pointer: definition.pointer().to_string(),
                reason: format!("expected an integer, found {value}"),
            }),
        }
    }

    pub fn require_value(&self, definition: &JsonFieldDefinition) -> Result<&'a Value, Error> {
        self.value(definition).ok_or_else(|| missing(definition))
    }

    pub fn require_str(&self, definition: &JsonFieldDefinition) -> Result<&'a str, Error> {
        self.str(definition).ok_or_else(|| missing(definition))
    }

    pub fn require_object(&self, definition: &JsonFieldDefinition) -> Result<&'a JsonObject, Error> {
        self.object(definition).ok_or_else(|| missing(definition))
    }

    pub fn require_array(&self, definition: &JsonFieldDefinition) -> Result<&'a Vec<Value>, Error> {
        self.array(definition).ok_or_else(|| missing(definition))
    }

    pub fn require_i64(&self, definition: &JsonFieldDefinition) -> Result<i64, Error> {
        self.i64(definition)?.ok_or_else(|| missing(definition))
    }

    /// Reads a string field and converts it, reporting conversion failures
    /// as an invalid value of that field.
    pub fn parse_str<V>(
        &self,
        definition: &JsonFieldDefinition,
        convert: impl FnOnce(&'a str) -> Result<V, Error>,
    ) -> Result<Option<V>, Error> {
        self.str(definition)
            .map(|raw| convert(raw).map_err(|err| invalid_value(definition, &err)))
            .transpose()
    }

    /// Like [`FieldValues::parse_str`] for a field that must be present.
    pub fn require_parsed<V>(
        &self,
        definition: &JsonFieldDefinition,
        convert: impl FnOnce(&'a str) -> Result<V, Error>,
    ) -> Result<V, Error> {
        self.parse_str(definition, convert)?
            .ok_or_else(|| missing(definition))
    }
}

fn missing(definition: &JsonFieldDefinition) -> Error {
    Error::MissingField {
        pointer: definition.pointer().to_string(),
    }
}

fn invalid_value(definition: &JsonFieldDefinition, err: &Error) -> Error {
    match err {
        // Selector errors already quote the offending string; keep them intact.
        Error::InvalidFieldSelector { .. } => err.clone(),
        other => Error::InvalidFieldValue {
            pointer: definition.pointer().to_string(),
            reason: other.to_string(),
        },
    }
}
