use serde_json::Value;
use twinproto_types::codec::FieldSpec;
use twinproto_types::{
    Error, FeatureId, FieldValues, JsonFieldDefinition, JsonObject, JsonObjectBuilder, JsonPointer,
    Result, SchemaVersion,
};

const DEFINITION: JsonFieldDefinition = JsonFieldDefinition::array("definition", SchemaVersion::ALL);
const PROPERTIES: JsonFieldDefinition = JsonFieldDefinition::object("properties", SchemaVersion::ALL);
const DESIRED_PROPERTIES: JsonFieldDefinition =
    JsonFieldDefinition::object("desiredProperties", SchemaVersion::V2_ONLY);

static FEATURE_FIELDS: [FieldSpec<Feature>; 3] = [
    FieldSpec::optional(DEFINITION, |f| {
        f.definition
            .as_ref()
            .map(|ids| Value::Array(ids.iter().cloned().map(Value::String).collect()))
    }),
    FieldSpec::optional(PROPERTIES, |f| f.properties.clone().map(Value::Object)),
    FieldSpec::optional(DESIRED_PROPERTIES, |f| {
        f.desired_properties.clone().map(Value::Object)
    }),
];

/// A named sub-component of a thing.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    id: FeatureId,
    definition: Option<Vec<String>>,
    properties: Option<JsonObject>,
    desired_properties: Option<JsonObject>,
}

impl Feature {
    /// Creates an empty feature.
    #[must_use]
    pub fn new(id: FeatureId) -> Self {
        Self {
            id,
            definition: None,
            properties: None,
            desired_properties: None,
        }
    }

    #[must_use]
    pub fn with_definition(mut self, definition: Vec<String>) -> Self {
        self.definition = Some(definition);
        self
    }

    #[must_use]
    pub fn with_properties(mut self, properties: JsonObject) -> Self {
        self.properties = Some(properties);
        self
    }

    #[must_use]
    pub fn with_desired_properties(mut self, desired: JsonObject) -> Self {
        self.desired_properties = Some(desired);
        self
    }

    /// Sets a single property, creating the properties object if needed.
    #[must_use]
    pub fn with_property(mut self, pointer: &JsonPointer, value: Value) -> Self {
        pointer.set_in(self.properties.get_or_insert_with(JsonObject::new), value);
        self
    }

    #[must_use]
    pub fn id(&self) -> &FeatureId {
        &self.id
    }

    #[must_use]
    pub fn definition(&self) -> Option<&[String]> {
        self.definition.as_deref()
    }

    #[must_use]
    pub fn properties(&self) -> Option<&JsonObject> {
        self.properties.as_ref()
    }

    #[must_use]
    pub fn desired_properties(&self) -> Option<&JsonObject> {
        self.desired_properties.as_ref()
    }

    /// Looks up a property by pointer relative to `properties`.
    #[must_use]
    pub fn property(&self, pointer: &JsonPointer) -> Option<&Value> {
        pointer.get_in(self.properties.as_ref()?)
    }

    pub fn to_json(
        &self,
        version: SchemaVersion,
        predicate: &dyn Fn(&JsonFieldDefinition) -> bool,
    ) -> JsonObject {
        let mut builder = JsonObjectBuilder::new(version, predicate);
        builder.render(self, &FEATURE_FIELDS);
        builder.build()
    }

    /// Parses a feature body; the id comes from the enclosing key.
    pub fn from_json(id: FeatureId, object: &JsonObject, version: SchemaVersion) -> Result<Self> {
        let values = FieldValues::of(object, version, &FEATURE_FIELDS)?;
        let definition = values
            .array(&DEFINITION)
            .map(|ids| {
                ids.iter()
                    .map(|v| {
                        v.as_str().map(str::to_string).ok_or_else(|| Error::InvalidFieldValue {
                            pointer: DEFINITION.pointer().to_string(),
                            reason: format!("definition ids must be strings, found {v}"),
                        })
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?;

        Ok(Self {
            id,
            definition,
            properties: values.object(&PROPERTIES).cloned(),
            desired_properties: values.object(&DESIRED_PROPERTIES).cloned(),
        })
    }
}

/// The features of a thing, unique by id and kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Features {
    features: Vec<Feature>,
}

impl Features {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with `feature` added, replacing one with the same id in
    /// place.
    #[must_use]
    pub fn with(mut self, feature: Feature) -> Self {
        match self.features.iter_mut().find(|f| f.id == feature.id) {
            Some(existing) => *existing = feature,
            None => self.features.push(feature),
        }
        self
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.id.as_str() == id)
    }

    /// The feature ids, in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &FeatureId> {
        self.features.iter().map(Feature::id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn to_json(
        &self,
        version: SchemaVersion,
        predicate: &dyn Fn(&JsonFieldDefinition) -> bool,
    ) -> JsonObject {
        self.features
            .iter()
            .map(|f| (f.id.to_string(), Value::Object(f.to_json(version, predicate))))
            .collect()
    }

    pub fn from_json(object: &JsonObject, version: SchemaVersion) -> Result<Self> {
        let mut features = Self::new();
        for (key, body) in object {
            let id = FeatureId::parse(key).map_err(|err| Error::InvalidFieldValue {
                pointer: format!("/{key}"),
                reason: err.to_string(),
            })?;
            let body = body.as_object().ok_or_else(|| Error::WrongFieldType {
                pointer: format!("/{key}"),
                expected: "object",
            })?;
            let feature = Feature::from_json(id, body, version).map_err(|e| e.nested_under(key))?;
            features = features.with(feature);
        }
        Ok(features)
    }
}

impl FromIterator<Feature> for Features {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::with)
    }
}
