use crate::error::SignalResult;
use crate::fields;
use crate::headers::Headers;
use crate::signal::{CommandResponse, HttpStatus, Signal, SignalKind, read_status, read_thing_id};
use serde_json::Value;
use twinproto_types::codec::FieldSpec;
use twinproto_types::{FieldValues, JsonObject, JsonPointer, ThingId};

// ── retrieveAttributes ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct RetrieveAttributesResponse {
    thing_id: ThingId,
    attributes: JsonObject,
    status: HttpStatus,
    headers: Headers,
}

impl RetrieveAttributesResponse {
    #[must_use]
    pub fn of(thing_id: ThingId, attributes: JsonObject, headers: Headers) -> Self {
        Self {
            thing_id,
            attributes,
            status: HttpStatus::OK,
            headers,
        }
    }

    #[must_use]
    pub fn thing_id(&self) -> &ThingId {
        &self.thing_id
    }

    #[must_use]
    pub fn attributes(&self) -> &JsonObject {
        &self.attributes
    }
}

impl Signal for RetrieveAttributesResponse {
    const TYPE: &'static str = "things.responses.retrieveAttributes";
    const NAME: &'static str = "retrieveAttributes";
    const KIND: SignalKind = SignalKind::Response;
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec::required(fields::THING_ID, |r| Some(Value::from(r.thing_id.as_str()))),
        FieldSpec::required(fields::ATTRIBUTES, |r| Some(Value::Object(r.attributes.clone()))),
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
        fields::ATTRIBUTES.pointer()
    }

    fn status(&self) -> Option<HttpStatus> {
        Some(self.status)
    }

    fn from_fields(values: &FieldValues<'_>, headers: Headers) -> SignalResult<Self> {
        Ok(Self {
            thing_id: read_thing_id(values, &fields::THING_ID)?,
            attributes: values.require_object(&fields::ATTRIBUTES)?.clone(),
            status: read_status(values)?,
            headers,
        })
    }
}

impl CommandResponse for RetrieveAttributesResponse {
    fn entity(&self) -> Value {
        Value::Object(self.attributes.clone())
    }
}

// ── retrieveAttribute ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct RetrieveAttributeResponse {
    thing_id: ThingId,
    attribute: JsonPointer,
    value: Value,
    status: HttpStatus,
    headers: Headers,
}

impl RetrieveAttributeResponse {
    #[must_use]
    pub fn of(thing_id: ThingId, attribute: JsonPointer, value: Value, headers: Headers) -> Self {
        Self {
            thing_id,
            attribute,
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
    pub fn attribute(&self) -> &JsonPointer {
        &self.attribute
    }

    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl Signal for RetrieveAttributeResponse {
    const TYPE: &'static str = "things.responses.retrieveAttribute";
    const NAME: &'static str = "retrieveAttribute";
    const KIND: SignalKind = SignalKind::Response;
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec::required(fields::THING_ID, |r| Some(Value::from(r.thing_id.as_str()))),
        FieldSpec::required(fields::ATTRIBUTE, |r| Some(Value::from(r.attribute.to_string()))),
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
        fields::ATTRIBUTES.pointer().join(&self.attribute)
    }

    fn status(&self) -> Option<HttpStatus> {
        Some(self.status)
    }

    fn from_fields(values: &FieldValues<'_>, headers: Headers) -> SignalResult<Self> {
        Ok(Self {
            thing_id: read_thing_id(values, &fields::THING_ID)?,
            attribute: values.require_parsed(&fields::ATTRIBUTE, JsonPointer::parse)?,
            value: values.require_value(&fields::VALUE)?.clone(),
            status: read_status(values)?,
            headers,
        })
    }
}

impl CommandResponse for RetrieveAttributeResponse {
    fn entity(&self) -> Value {
        self.value.clone()
    }
}
