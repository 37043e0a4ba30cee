use crate::{Feature, Features};
use serde_json::Value;
use tracing::debug;
use twinproto_types::codec::{FieldSpec, predicates};
use twinproto_types::{
    FieldSelector, FieldValues, JsonFieldDefinition, JsonObject, JsonObjectBuilder,
    JsonPointer, Result, SchemaVersion, ThingId,
};

/// Wire definitions of a thing's top-level fields.
pub mod fields {
    use twinproto_types::{FieldKind, JsonFieldDefinition, SchemaVersion};

    pub const THING_ID: JsonFieldDefinition = JsonFieldDefinition::string("thingId", SchemaVersion::ALL);
    pub const ACL: JsonFieldDefinition = JsonFieldDefinition::object("acl", SchemaVersion::V1_ONLY);
    pub const POLICY_ID: JsonFieldDefinition =
        JsonFieldDefinition::string("policyId", SchemaVersion::V2_ONLY);
    pub const ATTRIBUTES: JsonFieldDefinition =
        JsonFieldDefinition::object("attributes", SchemaVersion::ALL);
    pub const FEATURES: JsonFieldDefinition = JsonFieldDefinition::object("features", SchemaVersion::ALL);
    pub const REVISION: JsonFieldDefinition =
        JsonFieldDefinition::number("_revision", SchemaVersion::ALL).with_kind(FieldKind::Special);
    pub const MODIFIED: JsonFieldDefinition =
        JsonFieldDefinition::string("_modified", SchemaVersion::ALL).with_kind(FieldKind::Special);
}

/// Table order is the rendering order.
static THING_FIELDS: [FieldSpec<Thing>; 7] = [
    FieldSpec::required(fields::THING_ID, |t| Some(Value::from(t.thing_id.as_str()))),
    FieldSpec::optional(fields::ACL, |t| t.acl.clone().map(Value::Object)),
    FieldSpec::optional(fields::POLICY_ID, |t| t.policy_id.clone().map(Value::String)),
    FieldSpec::optional(fields::ATTRIBUTES, |t| t.attributes.clone().map(Value::Object)),
    // Features need the render version for their own fields; `to_json` fills
    // them in directly.
    FieldSpec::optional(fields::FEATURES, |_| None),
    FieldSpec::optional(fields::REVISION, |t| t.revision.map(Value::from)),
    FieldSpec::optional(fields::MODIFIED, |t| t.modified.clone().map(Value::String)),
];

/// A digital twin: an identified entity with attributes and features.
#[derive(Debug, Clone, PartialEq)]
pub struct Thing {
    thing_id: ThingId,
    acl: Option<JsonObject>,
    policy_id: Option<String>,
    attributes: Option<JsonObject>,
    features: Option<Features>,
    revision: Option<i64>,
    modified: Option<String>,
}

impl Thing {
    /// Starts building a thing with the given id.
    #[must_use]
    pub fn builder(thing_id: ThingId) -> ThingBuilder {
        ThingBuilder {
            thing: Self {
                thing_id,
                acl: None,
                policy_id: None,
                attributes: None,
                features: None,
                revision: None,
                modified: None,
            },
        }
    }

    /// Continues building from a copy of this thing.
    #[must_use]
    pub fn to_builder(&self) -> ThingBuilder {
        ThingBuilder {
            thing: self.clone(),
        }
    }

    #[must_use]
    pub fn thing_id(&self) -> &ThingId {
        &self.thing_id
    }

    #[must_use]
    pub fn acl(&self) -> Option<&JsonObject> {
        self.acl.as_ref()
    }

    #[must_use]
    pub fn policy_id(&self) -> Option<&str> {
        self.policy_id.as_deref()
    }

    #[must_use]
    pub fn attributes(&self) -> Option<&JsonObject> {
        self.attributes.as_ref()
    }

    #[must_use]
    pub fn features(&self) -> Option<&Features> {
        self.features.as_ref()
    }

    #[must_use]
    pub fn revision(&self) -> Option<i64> {
        self.revision
    }

    #[must_use]
    pub fn modified(&self) -> Option<&str> {
        self.modified.as_deref()
    }

    /// Looks up an attribute by pointer relative to `attributes`.
    #[must_use]
    pub fn attribute(&self, pointer: &JsonPointer) -> Option<&Value> {
        pointer.get_in(self.attributes.as_ref()?)
    }

    #[must_use]
    pub fn feature(&self, feature_id: &str) -> Option<&Feature> {
        self.features.as_ref()?.get(feature_id)
    }

    /// The ids of the thing's features, in insertion order. This is the key
    /// set feature wildcards expand against.
    pub fn feature_ids(&self) -> impl Iterator<Item = &str> {
        self.features
            .iter()
            .flat_map(Features::ids)
            .map(|id| id.as_str())
    }

    /// Renders the thing at `version`, keeping the fields `predicate` admits.
    pub fn to_json(
        &self,
        version: SchemaVersion,
        predicate: &dyn Fn(&JsonFieldDefinition) -> bool,
    ) -> JsonObject {
        let mut builder = JsonObjectBuilder::new(version, predicate);
        builder.render(self, &THING_FIELDS);
        let mut object = builder.build();

        if let Some(features) = &self.features {
            if twinproto_types::codec::should_include(&fields::FEATURES, version, predicate) {
                // The predicate names thing-level fields; feature bodies only follow the version.
                let rendered = Value::Object(features.to_json(version, &predicates::not_hidden));
                insert_in_table_order(&mut object, &fields::FEATURES, rendered);
            }
        }
        object
    }

    /// Renders only the selected parts of the thing.
    ///
    /// Feature wildcards are expanded against this thing's feature ids. Special
    /// fields appear only when a selected path names them.
    pub fn to_json_selected(&self, version: SchemaVersion, selector: &FieldSelector) -> JsonObject {
        let expanded = selector.expand(self.feature_ids());
        let full = self.to_json(version, &predicates::not_hidden);
        debug!(
            thing_id = %self.thing_id,
            selector = %expanded,
            "Rendering thing projection"
        );
        expanded.project(&full)
    }

    /// Parses a thing rendered at `version`.
    pub fn from_json(object: &JsonObject, version: SchemaVersion) -> Result<Self> {
        let values = FieldValues::of(object, version, &THING_FIELDS)?;
        let thing_id = values.require_parsed(&fields::THING_ID, ThingId::parse)?;
        let features = values
            .object(&fields::FEATURES)
            .map(|f| Features::from_json(f, version).map_err(|e| e.nested_under("features")))
            .transpose()?;

        Ok(Self {
            thing_id,
            acl: values.object(&fields::ACL).cloned(),
            policy_id: values.str(&fields::POLICY_ID).map(str::to_string),
            attributes: values.object(&fields::ATTRIBUTES).cloned(),
            features,
            revision: values.i64(&fields::REVISION)?,
            modified: values.str(&fields::MODIFIED).map(str::to_string),
        })
    }
}

/// Inserts `value` so the object keeps the order of `THING_FIELDS`.
fn insert_in_table_order(object: &mut JsonObject, definition: &JsonFieldDefinition, value: Value) {
    let Some(position) = THING_FIELDS
        .iter()
        .position(|spec| spec.definition().name() == definition.name())
    else {
        object.insert(definition.name().to_string(), value);
        return;
    };
    let rest: Vec<(String, Value)> = THING_FIELDS[position + 1..]
        .iter()
        .filter_map(|spec| {
            let name = spec.definition().name();
            object.remove(name).map(|v| (name.to_string(), v))
        })
        .collect();
    object.insert(definition.name().to_string(), value);
    object.extend(rest);
}

/// Builds a [`Thing`]; nothing is visible until [`ThingBuilder::build`].
#[derive(Debug, Clone)]
pub struct ThingBuilder {
    thing: Thing,
}

impl ThingBuilder {
    #[must_use]
    pub fn policy_id(mut self, policy_id: impl Into<String>) -> Self {
        self.thing.policy_id = Some(policy_id.into());
        self
    }

    #[must_use]
    pub fn acl(mut self, acl: JsonObject) -> Self {
        self.thing.acl = Some(acl);
        self
    }

    #[must_use]
    pub fn attributes(mut self, attributes: JsonObject) -> Self {
        self.thing.attributes = Some(attributes);
        self
    }

    /// Sets one attribute, creating intermediate objects as needed.
    #[must_use]
    pub fn attribute(mut self, pointer: &JsonPointer, value: Value) -> Self {
        pointer.set_in(self.thing.attributes.get_or_insert_with(JsonObject::new), value);
        self
    }

    #[must_use]
    pub fn features(mut self, features: Features) -> Self {
        self.thing.features = Some(features);
        self
    }

    /// Adds a feature, replacing one with the same id.
    #[must_use]
    pub fn feature(mut self, feature: Feature) -> Self {
        let features = self.thing.features.take().unwrap_or_default();
        self.thing.features = Some(features.with(feature));
        self
    }

    #[must_use]
    pub fn revision(mut self, revision: i64) -> Self {
        self.thing.revision = Some(revision);
        self
    }

    #[must_use]
    pub fn modified(mut self, modified: impl Into<String>) -> Self {
        self.thing.modified = Some(modified.into());
        self
    }

    #[must_use]
    pub fn build(self) -> Thing {
        self.thing
    }
}

impl From<Thing> for ThingBuilder {
    fn from(thing: Thing) -> Self {
        Self { thing }
    }
}
