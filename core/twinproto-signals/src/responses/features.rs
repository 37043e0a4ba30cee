use crate::error::SignalResult;
use crate::fields;
use crate::headers::Headers;
use crate::signal::{CommandResponse, HttpStatus, Signal, SignalKind, read_status, read_thing_id};
use serde_json::Value;
use twinproto_types::codec::FieldSpec;
use twinproto_types::{FeatureId, FieldValues, JsonObject, JsonPointer, ThingId};

fn feature_path(feature_id: &FeatureId) -> JsonPointer {
    fields::FEATURES.pointer().append(feature_id.as_str())
}

// ── retrieveFeatures ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct RetrieveFeaturesResponse {
    thing_id: ThingId,
    features: JsonObject,
    status: HttpStatus,
    headers: Headers,
}

impl RetrieveFeaturesResponse {
    #[must_use]
    pub fn of(thing_id: ThingId, features: JsonObject, headers: Headers) -> Self {
        Self {
            thing_id,
            features,
            status: HttpStatus::OK,
            headers,
        }
    }

    #[must_use]
    pub fn thing_id(&self) -> &ThingId {
        &self.thing_id
    }

    #[must_use]
    pub fn features(&self) -> &JsonObject {
        &self.features
    }
}

impl Signal for RetrieveFeaturesResponse {
    const TYPE: &'static str = "things.responses.retrieveFeatures";
    const NAME: &'static str = "retrieveFeatures";
    const KIND: SignalKind = SignalKind::Response;
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec::required(fields::THING_ID, |r| Some(Value::from(r.thing_id.as_str()))),
        FieldSpec::required(fields::FEATURES, |r| Some(Value::Object(r.features.clone()))),
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

    fn status(&self) -> Option<HttpStatus> {
        Some(self.status)
    }

    fn from_fields(values: &FieldValues<'_>, headers: Headers) -> SignalResult<Self> {
        Ok(Self {
            thing_id: read_thing_id(values, &fields::THING_ID)?,
            features: values.require_object(&fields::FEATURES)?.clone(),
            status: read_status(values)?,
            headers,
        })
    }
}

impl CommandResponse for RetrieveFeaturesResponse {
    fn entity(&self) -> Value {
        Value::Object(self.features.clone())
    }
}

// ── retrieveFeature ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct RetrieveFeatureResponse {
    thing_id: ThingId,
    feature_id: FeatureId,
    feature: JsonObject,
    status: HttpStatus,
    headers: Headers,
}

impl RetrieveFeatureResponse {
    #[must_use]
    pub fn of(thing_id: ThingId, feature_id: FeatureId, feature: JsonObject, headers: Headers) -> Self {
        Self {
            thing_id,
            feature_id,
            feature,
            status: HttpStatus::OK,
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
    pub fn feature(&self) -> &JsonObject {
        &self.feature
    }
}

impl Signal for RetrieveFeatureResponse {
    const TYPE: &'static str = "things.responses.retrieveFeature";
    const NAME: &'static str = "retrieveFeature";
    const KIND: SignalKind = SignalKind::Response;
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec::required(fields::THING_ID, |r| Some(Value::from(r.thing_id.as_str()))),
        FieldSpec::required(fields::FEATURE_ID, |r| Some(Value::from(r.feature_id.as_str()))),
        FieldSpec::required(fields::FEATURE, |r| Some(Value::Object(r.feature.clone()))),
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

    fn status(&self) -> Option<HttpStatus> {
        Some(self.status)
    }

    fn from_fields(values: &FieldValues<'_>, headers: Headers) -> SignalResult<Self> {
        Ok(Self {
            thing_id: read_thing_id(values, &fields::THING_ID)?,
            feature_id: values.require_parsed(&fields::FEATURE_ID, FeatureId::parse)?,
            feature: values.require_object(&fields::FEATURE)?.clone(),
            status: read_status(values)?,
            headers,
        })
    }
}

impl CommandResponse for RetrieveFeatureResponse {
    fn entity(&self) -> Value {
        Value::Object(self.feature.clone())
    }
}

// ── retrieveFeatureProperties ────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct RetrieveFeaturePropertiesResponse {
    thing_id: ThingId,
    feature_id: FeatureId,
    properties: JsonObject,
    status: HttpStatus,
    headers: Headers,
}

impl RetrieveFeaturePropertiesResponse {
    #[must_use]
    pub fn of(
        thing_id: ThingId,
        feature_id: FeatureId,
        properties: JsonObject,
        headers: Headers,
    ) -> Self {
        Self {
            thing_id,
            feature_id,
            properties,
            status: HttpStatus::OK,
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
    pub fn properties(&self) -> &JsonObject {
        &self.properties
    }
}

impl Signal for RetrieveFeaturePropertiesResponse {
    const TYPE: &'static str = "things.responses.retrieveFeatureProperties";
    const NAME: &'static str = "retrieveFeatureProperties";
    const KIND: SignalKind = SignalKind::Response;
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec::required(fields::THING_ID, |r| Some(Value::from(r.thing_id.as_str()))),
        FieldSpec::required(fields::FEATURE_ID, |r| Some(Value::from(r.feature_id.as_str()))),
        FieldSpec::required(fields::PROPERTIES, |r| Some(Value::Object(r.properties.clone()))),
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
        feature_path(&self.feature_id).append(fields::PROPERTIES.name())
    }

    fn status(&self) -> Option<HttpStatus> {
        Some(self.status)
    }

    fn from_fields(values: &FieldValues<'_>, headers: Headers) -> SignalResult<Self> {
        Ok(Self {
            thing_id: read_thing_id(values, &fields::THING_ID)?,
            feature_id: values.require_parsed(&fields::FEATURE_ID, FeatureId::parse)?,
            properties: values.require_object(&fields::PROPERTIES)?.clone(),
            status: read_status(values)?,
            headers,
        })
    }
}

impl CommandResponse for RetrieveFeaturePropertiesResponse {
    fn entity(&self) -> Value {
        Value::Object(self.properties.clone())
    }
}

// ── retrieveFeatureProperty ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct RetrieveFeaturePropertyResponse {
    thing_id: ThingId,
    feature_id: FeatureId,
    property: JsonPointer,
    value: Value,
    status: HttpStatus,
    headers: Headers,
}

impl RetrieveFeaturePropertyResponse {
    #[must_use]
    pub fn of(
        thing_id: ThingId,
        feature_id: FeatureId,
        property: JsonPointer,
        value: Value,
        headers: Headers,
    ) -> Self {
        Self {
            thing_id,
            feature_id,
            property,
            value,
            status: HttpStatus::OK,
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

    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl Signal for RetrieveFeaturePropertyResponse {
    const TYPE: &'static str = "things.responses.retrieveFeatureProperty";
    const NAME: &'static str = "retrieveFeatureProperty";
    const KIND: SignalKind = SignalKind::Response;
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec::required(fields::THING_ID, |r| Some(Value::from(r.thing_id.as_str()))),
        FieldSpec::required(fields::FEATURE_ID, |r| Some(Value::from(r.feature_id.as_str()))),
        FieldSpec::required(fields::PROPERTY, |r| Some(Value::from(r.property.to_string()))),
        FieldSpec::required(fields::VALUE, |r| Some(r.value.clone())),
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
            .append(fields::PROPERTIES.name())
            .join(&self.property)
    }

    fn status(&self) -> Option<HttpStatus> {
        Some(self.status)
    }

    fn from_fields(values: &FieldValues<'_>, headers: Headers) -> SignalResult<Self> {
        Ok(Self {
            thing_id: read_thing_id(values, &fields::THING_ID)?,
            feature_id: values.require_parsed(&fields::FEATURE_ID, FeatureId::parse)?,
            property: values.require_parsed(&fields::PROPERTY, JsonPointer::parse)?,
            value: values.require_value(&fields::VALUE)?.clone(),
            status: read_status(values)?,
            headers,
        })
    }
}

impl CommandResponse for RetrieveFeaturePropertyResponse {
    fn entity(&self) -> Value {
        self.value.clone()
    }
}
