use super::{ensure_addressed, not_accessible, select};
use crate::error::SignalResult;
use crate::fields;
use crate::headers::Headers;
use crate::responses::{
    RetrieveFeaturePropertiesResponse, RetrieveFeaturePropertyResponse, RetrieveFeatureResponse,
    RetrieveFeaturesResponse,
};
use crate::signal::{Command, Signal, SignalKind, read_selector, read_thing_id};
use serde_json::Value;
use twinproto_model::{Feature, Thing};
use twinproto_types::codec::{FieldSpec, predicates};
use twinproto_types::{FeatureId, FieldSelector, FieldValues, JsonPointer, ThingId};

fn feature_path(feature_id: &FeatureId) -> JsonPointer {
    fields::FEATURES.pointer().append(feature_id.as_str())
}

fn properties_path(feature_id: &FeatureId) -> JsonPointer {
    feature_path(feature_id).append(fields::PROPERTIES.name())
}

fn find_feature<'t>(thing_id: &ThingId, thing: &'t Thing, feature_id: &FeatureId) -> SignalResult<&'t Feature> {
    ensure_addressed(thing_id, thing)?;
    thing
        .feature(feature_id.as_str())
        .ok_or_else(|| not_accessible(thing_id, &feature_path(feature_id)))
}

// ── retrieveFeatures ─────────────────────────────────────────────

/// Retrieves all features of a thing, optionally narrowed by a selection
/// relative to the features object.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrieveFeatures {
    thing_id: ThingId,
    selected_fields: Option<FieldSelector>,
    headers: Headers,
}

impl RetrieveFeatures {
    #[must_use]
    pub fn of(thing_id: ThingId, headers: Headers) -> Self {
        Self {
            thing_id,
            selected_fields: None,
            headers,
        }
    }

    #[must_use]
    pub fn with_selected_fields(mut self, selected_fields: FieldSelector) -> Self {
        self.selected_fields = Some(selected_fields);
        self
    }

    #[must_use]
    pub fn thing_id(&self) -> &ThingId {
        &self.thing_id
    }

    pub fn respond(&self, thing: &Thing) -> SignalResult<RetrieveFeaturesResponse> {
        ensure_addressed(&self.thing_id, thing)?;
        let features = thing
            .features()
            .ok_or_else(|| not_accessible(&self.thing_id, &self.resource_path()))?;
        let rendered = features.to_json(self.implemented_schema_version(), &predicates::regular);
        Ok(RetrieveFeaturesResponse::of(
            self.thing_id.clone(),
            select(rendered, self.selected_fields.as_ref()),
            self.headers.clone(),
        ))
    }
}

impl Signal for RetrieveFeatures {
    const TYPE: &'static str = "things.commands.retrieveFeatures";
    const NAME: &'static str = "retrieveFeatures";
    const KIND: SignalKind = SignalKind::Command;
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec::required(fields::THING_ID, |c| Some(Value::from(c.thing_id.as_str()))),
        FieldSpec::optional(fields::SELECTED_FIELDS, |c| {
            c.selected_fields.as_ref().map(|s| Value::from(s.to_string()))
        }),
    ];

    fn headers(&self) -> &Headers {
        &self.headers
    }

    fn set_headers(&self, headers: Headers) -> Self {
        Self {
            headers,
            ..self.clone()
        }
    }

    fn resource_path(&self) -> JsonPointer {
        fields::FEATURES.pointer()
    }

    fn from_fields(values: &FieldValues<'_>, headers: Headers) -> SignalResult<Self> {
        Ok(Self {
            thing_id: read_thing_id(values, &fields::THING_ID)?,
            selected_fields: read_selector(values, &fields::SELECTED_FIELDS)?,
            headers,
        })
    }
}

impl Command for RetrieveFeatures {
    fn entity_id(&self) -> Option<&ThingId> {
        Some(&self.thing_id)
    }

    fn selected_fields(&self) -> Option<&FieldSelector> {
        self.selected_fields.as_ref()
    }
}

// ── retrieveFeature ──────────────────────────────────────────────

/// Retrieves one feature, optionally narrowed by a selection relative to
/// the feature object.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrieveFeature {
    thing_id: ThingId,
    feature_id: FeatureId,
    selected_fields: Option<FieldSelector>,
    headers: Headers,
}

impl RetrieveFeature {
    #[must_use]
    pub fn of(thing_id: ThingId, feature_id: FeatureId, headers: Headers) -> Self {
        Self {
            thing_id,
            feature_id,
            selected_fields: None,
            headers,
        }
    }

    #[must_use]
    pub fn with_selected_fields(mut self, selected_fields: FieldSelector) -> Self {
        self.selected_fields = Some(selected_fields);
        self
    }

    #[must_use]
    pub fn thing_id(&self) -> &ThingId {
        &self.thing_id
    }

    #[must_use]
    pub fn feature_id(&self) -> &FeatureId {
        &self.feature_id
    }

    pub fn respond(&self, thing: &Thing) -> SignalResult<RetrieveFeatureResponse> {
        let feature = find_feature(&self.thing_id, thing, &self.feature_id)?;
        let rendered = feature.to_json(self.implemented_schema_version(), &predicates::regular);
        Ok(RetrieveFeatureResponse::of(
            self.thing_id.clone(),
            self.feature_id.clone(),
            select(rendered, self.selected_fields.as_ref()),
            self.headers.clone(),
        ))
    }
}

impl Signal for RetrieveFeature {
    const TYPE: &'static str = "things.commands.retrieveFeature";
    const NAME: &'static str = "retrieveFeature";
    const KIND: SignalKind = SignalKind::Command;
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec::required(fields::THING_ID, |c| Some(Value::from(c.thing_id.as_str()))),
        FieldSpec::required(fields::FEATURE_ID, |c| Some(Value::from(c.feature_id.as_str()))),
        FieldSpec::optional(fields::SELECTED_FIELDS, |c| {
            c.selected_fields.as_ref().map(|s| Value::from(s.to_string()))
        }),
    ];

    fn headers(&self) -> &Headers {
        &self.headers
    }

    fn set_headers(&self, headers: Headers) -> Self {
        Self {
            headers,
            ..self.clone()
        }
    }

    fn resource_path(&self) -> JsonPointer {
        feature_path(&self.feature_id)
    }

    fn from_fields(values: &FieldValues<'_>, headers: Headers) -> SignalResult<Self> {
        Ok(Self {
            thing_id: read_thing_id(values, &fields::THING_ID)?,
            feature_id: values.require_parsed(&fields::FEATURE_ID, FeatureId::parse)?,
            selected_fields: read_selector(values, &fields::SELECTED_FIELDS)?,
            headers,
        })
    }
}

impl Command for RetrieveFeature {
    fn entity_id(&self) -> Option<&ThingId> {
        Some(&self.thing_id)
    }

    fn selected_fields(&self) -> Option<&FieldSelector> {
        self.selected_fields.as_ref()
    }
}

// ── retrieveFeatureProperties ────────────────────────────────────

/// Retrieves the properties of one feature, optionally narrowed by a
/// selection relative to the properties object.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrieveFeatureProperties {
    thing_id: ThingId,
    feature_id: FeatureId,
    selected_fields: Option<FieldSelector>,
    headers: Headers,
}

impl RetrieveFeatureProperties {
    #[must_use]
    pub fn of(thing_id: ThingId, feature_id: FeatureId, headers: Headers) -> Self {
        Self {
            thing_id,
            feature_id,
            selected_fields: None,
            headers,
        }
    }

    #[must_use]
    pub fn with_selected_fields(mut self, selected_fields: FieldSelector) -> Self {
        self.selected_fields = Some(selected_fields);
        self
    }

    #[must_use]
    pub fn thing_id(&self) -> &ThingId {
        &self.thing_id
    }

    #[must_use]
    pub fn feature_id(&self) -> &FeatureId {
        &self.feature_id
    }

    pub fn respond(&self, thing: &Thing) -> SignalResult<RetrieveFeaturePropertiesResponse> {
        let properties = find_feature(&self.thing_id, thing, &self.feature_id)?
            .properties()
            .ok_or_else(|| not_accessible(&self.thing_id, &self.resource_path()))?;
        Ok(RetrieveFeaturePropertiesResponse::of(
            self.thing_id.clone(),
            self.feature_id.clone(),
            select(properties.clone(), self.selected_fields.as_ref()),
            self.headers.clone(),
        ))
    }
}

impl Signal for RetrieveFeatureProperties {
    const TYPE: &'static str = "things.commands.retrieveFeatureProperties";
    const NAME: &'static str = "retrieveFeatureProperties";
    const KIND: SignalKind = SignalKind::Command;
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec::required(fields::THING_ID, |c| Some(Value::from(c.thing_id.as_str()))),
        FieldSpec::required(fields::FEATURE_ID, |c| Some(Value::from(c.feature_id.as_str()))),
        FieldSpec::optional(fields::SELECTED_FIELDS, |c| {
            c.selected_fields.as_ref().map(|s| Value::from(s.to_string()))
        }),
    ];

    fn headers(&self) -> &Headers {
        &self.headers
    }

    fn set_headers(&self, headers: Headers) -> Self {
        Self {
            headers,
            ..self.clone()
        }
    }

    fn resource_path(&self) -> JsonPointer {
        properties_path(&self.feature_id)
    }

    fn from_fields(values: &FieldValues<'_>, headers: Headers) -> SignalResult<Self> {
        Ok(Self {
            thing_id: read_thing_id(values, &fields::THING_ID)?,
            feature_id: values.require_parsed(&fields::FEATURE_ID, FeatureId::parse)?,
            selected_fields: read_selector(values, &fields::SELECTED_FIELDS)?,
            headers,
        })
    }
}

impl Command for RetrieveFeatureProperties {
    fn entity_id(&self) -> Option<&ThingId> {
        Some(&self.thing_id)
    }

    fn selected_fields(&self) -> Option<&FieldSelector> {
        self.selected_fields.as_ref()
    }
}

// ── retrieveFeatureProperty ──────────────────────────────────────

/// Retrieves one feature property by pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrieveFeatureProperty {
    thing_id: ThingId,
    feature_id: FeatureId,
    property: JsonPointer,
    headers: Headers,
}

impl RetrieveFeatureProperty {
    #[must_use]
    pub fn of(thing_id: ThingId, feature_id: FeatureId, property: JsonPointer, headers: Headers) -> Self {
        Self {
            thing_id,
            feature_id,
            property,
            headers,
        }
    }

    #[must_use]
    pub fn thing_id(&self) -> &ThingId {
        &self.thing_id
    }

    #[must_use]
    pub fn feature_id(&self) -> &FeatureId {
        &self.feature_id
    }

    #[must_use]
    pub fn property(&self) -> &JsonPointer {
        &self.property
    }

    pub fn respond(&self, thing: &Thing) -> SignalResult<RetrieveFeaturePropertyResponse> {
        let value = find_feature(&self.thing_id, thing, &self.feature_id)?
            .property(&self.property)
            .ok_or_else(|| not_accessible(&self.thing_id, &self.resource_path()))?;
        Ok(RetrieveFeaturePropertyResponse::of(
            self.thing_id.clone(),
            self.feature_id.clone(),
            self.property.clone(),
            value.clone(),
            self.headers.clone(),
        ))
    }
}

impl Signal for RetrieveFeatureProperty {
    const TYPE: &'static str = "things.commands.retrieveFeatureProperty";
    const NAME: &'static str = "retrieveFeatureProperty";
    const KIND: SignalKind = SignalKind::Command;
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec::required(fields::THING_ID, |c| Some(Value::from(c.thing_id.as_str()))),
        FieldSpec::required(fields::FEATURE_ID, |c| Some(Value::from(c.feature_id.as_str()))),
        FieldSpec::required(fields::PROPERTY, |c| Some(Value::from(c.property.to_string()))),
    ];

    fn headers(&self) -> &Headers {
        &self.headers
    }

    fn set_headers(&self, headers: Headers) -> Self {
        Self {
            headers,
            ..self.clone()
        }
    }

    fn resource_path(&self) -> JsonPointer {
        properties_path(&self.feature_id).join(&self.property)
    }

    fn from_fields(values: &FieldValues<'_>, headers: Headers) -> SignalResult<Self> {
        Ok(Self {
            thing_id: read_thing_id(values, &fields::THING_ID)?,
            feature_id: values.require_parsed(&fields::FEATURE_ID, FeatureId::parse)?,
            property: values.require_parsed(&fields::PROPERTY, JsonPointer::parse)?,
            headers,
        })
    }
}

impl Command for RetrieveFeatureProperty {
    fn entity_id(&self) -> Option<&ThingId> {
        Some(&self.thing_id)
    }
}
