use crate::error::SignalResult;
use crate::fields;
use crate::headers::Headers;
use crate::signal::{CommandResponse, HttpStatus, Signal, SignalKind, read_status, read_thing_id};
use serde_json::Value;
use twinproto_types::codec::FieldSpec;
use twinproto_types::{Error, FieldValues, JsonObject, JsonPointer, SchemaVersion, ThingId};

// ── retrieveThing ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct RetrieveThingResponse {
    thing_id: ThingId,
    thing: JsonObject,
    status: HttpStatus,
    headers: Headers,
}

impl RetrieveThingResponse {
    /// A successful response carrying the rendered `thing`.
    #[must_use]
    pub fn of(thing_id: ThingId, thing: JsonObject, headers: Headers) -> Self {
        Self {
            thing_id,
            thing,
            status: HttpStatus::OK,
            headers,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: HttpStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn thing_id(&self) -> &ThingId {
        &self.thing_id
    }

    #[must_use]
    pub fn thing(&self) -> &JsonObject {
        &self.thing
    }
}

impl Signal for RetrieveThingResponse {
    const TYPE: &'static str = "things.responses.retrieveThing";
    const NAME: &'static str = "retrieveThing";
    const KIND: SignalKind = SignalKind::Response;
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec::required(fields::THING_ID, |r| Some(Value::from(r.thing_id.as_str()))),
        FieldSpec::required(fields::THING, |r| Some(Value::Object(r.thing.clone()))),
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
        JsonPointer::root()
    }

    fn status(&self) -> Option<HttpStatus> {
        Some(self.status)
    }

    fn from_fields(values: &FieldValues<'_>, headers: Headers) -> SignalResult<Self> {
        Ok(Self {
            thing_id: read_thing_id(values, &fields::THING_ID)?,
            thing: values.require_object(&fields::THING)?.clone(),
            status: read_status(values)?,
            headers,
        })
    }
}

impl CommandResponse for RetrieveThingResponse {
    fn entity(&self) -> Value {
        Value::Object(self.thing.clone())
    }
}

// ── retrieveThings ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct RetrieveThingsResponse {
    things: Vec<JsonObject>,
    namespace: Option<String>,
    status: HttpStatus,
    headers: Headers,
}

impl RetrieveThingsResponse {
    /// A successful response carrying the rendered `things`.
    #[must_use]
    pub fn of(things: Vec<JsonObject>, namespace: Option<String>, headers: Headers) -> Self {
        Self {
            things,
            namespace,
            status: HttpStatus::OK,
            headers,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: HttpStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn things(&self) -> &[JsonObject] {
        &self.things
    }

    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }
}

impl Signal for RetrieveThingsResponse {
    const TYPE: &'static str = "things.responses.retrieveThings";
    const NAME: &'static str = "retrieveThings";
    const KIND: SignalKind = SignalKind::Response;
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec::required(fields::THINGS, |r| Some(r.entity())),
        FieldSpec::optional(fields::NAMESPACE, |r| r.namespace.clone().map(Value::String)),
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
        JsonPointer::root()
    }

    fn status(&self) -> Option<HttpStatus> {
        Some(self.status)
    }

    fn from_fields(values: &FieldValues<'_>, headers: Headers) -> SignalResult<Self> {
        let things = values
            .require_array(&fields::THINGS)?
            .iter()
            .enumerate()
            .map(|(idx, thing)| {
                thing.as_object().cloned().ok_or_else(|| Error::WrongFieldType {
                    pointer: fields::THINGS.pointer().append(idx.to_string()).to_string(),
                    expected: "object",
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;
        Ok(Self {
            things,
            namespace: values.str(&fields::NAMESPACE).map(str::to_string),
            status: read_status(values)?,
            headers,
        })
    }
}

impl CommandResponse for RetrieveThingsResponse {
    fn entity(&self) -> Value {
        Value::Array(self.things.iter().cloned().map(Value::Object).collect())
    }
}

// ── retrievePolicyId ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct RetrievePolicyIdResponse {
    thing_id: ThingId,
    policy_id: String,
    status: HttpStatus,
    headers: Headers,
}

impl RetrievePolicyIdResponse {
    #[must_use]
    pub fn of(thing_id: ThingId, policy_id: impl Into<String>, headers: Headers) -> Self {
        Self {
            thing_id,
            policy_id: policy_id.into(),
            status: HttpStatus::OK,
            headers,
        }
    }

    #[must_use]
    pub fn thing_id(&self) -> &ThingId {
        &self.thing_id
    }

    #[must_use]
    pub fn policy_id(&self) -> &str {
        &self.policy_id
    }
}

impl Signal for RetrievePolicyIdResponse {
    const TYPE: &'static str = "things.responses.retrievePolicyId";
    const NAME: &'static str = "retrievePolicyId";
    const KIND: SignalKind = SignalKind::Response;
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec::required(fields::THING_ID, |r| Some(Value::from(r.thing_id.as_str()))),
        FieldSpec::required(fields::POLICY_ID, |r| Some(Value::from(r.policy_id.as_str()))),
    ];
    const SUPPORTED_VERSIONS: &'static [SchemaVersion] = SchemaVersion::V2_ONLY;

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
        fields::POLICY_ID.pointer()
    }

    fn status(&self) -> Option<HttpStatus> {
        Some(self.status)
    }

    fn from_fields(values: &FieldValues<'_>, headers: Headers) -> SignalResult<Self> {
        Ok(Self {
            thing_id: read_thing_id(values, &fields::THING_ID)?,
            policy_id: values.require_str(&fields::POLICY_ID)?.to_string(),
            status: read_status(values)?,
            headers,
        })
    }
}

impl CommandResponse for RetrievePolicyIdResponse {
    fn entity(&self) -> Value {
        Value::from(self.policy_id.as_str())
    }
}

// ── retrieveAcl ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct RetrieveAclResponse {
    thing_id: ThingId,
    acl: JsonObject,
    status: HttpStatus,
    headers: Headers,
}

impl RetrieveAclResponse {
    #[must_use]
    pub fn of(thing_id: ThingId, acl: JsonObject, headers: Headers) -> Self {
        Self {
            thing_id,
            acl,
            status: HttpStatus::OK,
            headers,
        }
    }

    #[must_use]
    pub fn thing_id(&self) -> &ThingId {
        &self.thing_id
    }

    #[must_use]
    pub fn acl(&self) -> &JsonObject {
        &self.acl
    }
}

impl Signal for RetrieveAclResponse {
    const TYPE: &'static str = "things.responses.retrieveAcl";
    const NAME: &'static str = "retrieveAcl";
    const KIND: SignalKind = SignalKind::Response;
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec::required(fields::THING_ID, |r| Some(Value::from(r.thing_id.as_str()))),
        FieldSpec::required(fields::ACL, |r| Some(Value::Object(r.acl.clone()))),
    ];
    const SUPPORTED_VERSIONS: &'static [SchemaVersion] = SchemaVersion::V1_ONLY;

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
        fields::ACL.pointer()
    }

    fn status(&self) -> Option<HttpStatus> {
        Some(self.status)
    }

    fn from_fields(values: &FieldValues<'_>, headers: Headers) -> SignalResult<Self> {
        Ok(Self {
            thing_id: read_thing_id(values, &fields::THING_ID)?,
            acl: values.require_object(&fields::ACL)?.clone(),
            status: read_status(values)?,
            headers,
        })
    }
}

impl CommandResponse for RetrieveAclResponse {
    fn entity(&self) -> Value {
        Value::Object(self.acl.clone())
    }
}
