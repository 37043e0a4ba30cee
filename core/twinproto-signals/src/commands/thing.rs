use super::{ensure_addressed, not_accessible};
use crate::batch::validate_namespace;
use crate::error::SignalResult;
use crate::fields;
use crate::headers::Headers;
use crate::responses::{
    RetrieveAclResponse, RetrievePolicyIdResponse, RetrieveThingResponse, RetrieveThingsResponse,
};
use crate::signal::{Command, Signal, SignalKind, read_selector, read_thing_id};
use serde_json::Value;
use tracing::debug;
use twinproto_model::Thing;
use twinproto_types::codec::{FieldSpec, predicates};
use twinproto_types::{Error, FieldSelector, FieldValues, JsonObject, JsonPointer, SchemaVersion, ThingId};

fn render_thing(thing: &Thing, version: SchemaVersion, selector: Option<&FieldSelector>) -> JsonObject {
    match selector {
        Some(selector) => thing.to_json_selected(version, selector),
        None => thing.to_json(version, &predicates::regular),
    }
}

// ── retrieveThing ────────────────────────────────────────────────

/// Retrieves one thing, optionally narrowed by a selection.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrieveThing {
    thing_id: ThingId,
    selected_fields: Option<FieldSelector>,
    snapshot_revision: Option<i64>,
    headers: Headers,
}

impl RetrieveThing {
    #[must_use]
    pub fn of(thing_id: ThingId, headers: Headers) -> Self {
        Self {
            thing_id,
            selected_fields: None,
            snapshot_revision: None,
            headers,
        }
    }

    #[must_use]
    pub fn with_selected_fields(mut self, selected_fields: FieldSelector) -> Self {
        self.selected_fields = Some(selected_fields);
        self
    }

    /// Asks for the thing as it was at `revision`.
    #[must_use]
    pub fn with_snapshot_revision(mut self, revision: i64) -> Self {
        self.snapshot_revision = Some(revision);
        self
    }

    #[must_use]
    pub fn thing_id(&self) -> &ThingId {
        &self.thing_id
    }

    #[must_use]
    pub fn snapshot_revision(&self) -> Option<i64> {
        self.snapshot_revision
    }

    /// Answers from the current state of `thing`. A snapshot request is only
    /// served when it names the thing's current revision.
    pub fn respond(&self, thing: &Thing) -> SignalResult<RetrieveThingResponse> {
        ensure_addressed(&self.thing_id, thing)?;
        if let Some(revision) = self.snapshot_revision
            && thing.revision() != Some(revision)
        {
            return Err(not_accessible(
                &self.thing_id,
                &JsonPointer::of(fields::SNAPSHOT_REVISION.name()).append(revision.to_string()),
            ));
        }
        let rendered = render_thing(
            thing,
            self.implemented_schema_version(),
            self.selected_fields.as_ref(),
        );
        Ok(RetrieveThingResponse::of(
            self.thing_id.clone(),
            rendered,
            self.headers.clone(),
        ))
    }
}

impl Signal for RetrieveThing {
    const TYPE: &'static str = "things.commands.retrieveThing";
    const NAME: &'static str = "retrieveThing";
    const KIND: SignalKind = SignalKind::Command;
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec::required(fields::THING_ID, |c| Some(Value::from(c.thing_id.as_str()))),
        FieldSpec::optional(fields::SELECTED_FIELDS, |c| {
            c.selected_fields.as_ref().map(|s| Value::from(s.to_string()))
        }),
        FieldSpec::optional(fields::SNAPSHOT_REVISION, |c| c.snapshot_revision.map(Value::from)),
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

    fn from_fields(values: &FieldValues<'_>, headers: Headers) -> SignalResult<Self> {
        Ok(Self {
            thing_id: read_thing_id(values, &fields::THING_ID)?,
            selected_fields: read_selector(values, &fields::SELECTED_FIELDS)?,
            snapshot_revision: values.i64(&fields::SNAPSHOT_REVISION)?,
            headers,
        })
    }
}

impl Command for RetrieveThing {
    fn entity_id(&self) -> Option<&ThingId> {
        Some(&self.thing_id)
    }

    fn selected_fields(&self) -> Option<&FieldSelector> {
        self.selected_fields.as_ref()
    }
}

// ── retrieveThings ───────────────────────────────────────────────

/// Retrieves several things confined to one namespace.
///
/// Only constructed through [`RetrieveThingsBuilder::build`] or parsing, both
/// of which apply the shared-namespace rule. The namespace found there is
/// kept and never re-derived.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrieveThings {
    thing_ids: Vec<ThingId>,
    namespace: Option<String>,
    shared_namespace: Option<String>,
    selected_fields: Option<FieldSelector>,
    headers: Headers,
}

impl RetrieveThings {
    #[must_use]
    pub fn builder(thing_ids: impl IntoIterator<Item = ThingId>) -> RetrieveThingsBuilder {
        RetrieveThingsBuilder {
            thing_ids: thing_ids.into_iter().collect(),
            namespace: None,
            selected_fields: None,
            headers: Headers::empty(),
        }
    }

    #[must_use]
    pub fn thing_ids(&self) -> &[ThingId] {
        &self.thing_ids
    }

    /// The namespace given explicitly by the sender.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The namespace every qualified id carries.
    #[must_use]
    pub fn shared_namespace(&self) -> Option<&str> {
        self.shared_namespace.as_deref()
    }

    /// Answers from `things`, in the order of the requested ids. Requested
    /// things missing from `things` are left out.
    pub fn respond<'a>(
        &self,
        things: impl IntoIterator<Item = &'a Thing>,
    ) -> SignalResult<RetrieveThingsResponse> {
        let things: Vec<&Thing> = things.into_iter().collect();
        let version = self.implemented_schema_version();
        let rendered: Vec<JsonObject> = self
            .thing_ids
            .iter()
            .filter_map(|id| things.iter().find(|t| t.thing_id() == id))
            .map(|thing| render_thing(thing, version, self.selected_fields.as_ref()))
            .collect();
        debug!(
            requested = self.thing_ids.len(),
            found = rendered.len(),
            "Answering batch retrieval"
        );
        Ok(RetrieveThingsResponse::of(
            rendered,
            self.shared_namespace.clone(),
            self.headers.clone(),
        ))
    }
}

impl Signal for RetrieveThings {
    const TYPE: &'static str = "things.commands.retrieveThings";
    const NAME: &'static str = "retrieveThings";
    const KIND: SignalKind = SignalKind::Command;
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec::required(fields::THING_IDS, |c| {
            Some(Value::Array(
                c.thing_ids.iter().map(|id| Value::from(id.as_str())).collect(),
            ))
        }),
        FieldSpec::optional(fields::NAMESPACE, |c| c.namespace.clone().map(Value::String)),
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
        JsonPointer::root()
    }

    fn from_fields(values: &FieldValues<'_>, headers: Headers) -> SignalResult<Self> {
        let thing_ids = values
            .require_array(&fields::THING_IDS)?
            .iter()
            .enumerate()
            .map(|(idx, raw)| {
                let pointer = fields::THING_IDS.pointer().append(idx.to_string());
                let raw = raw.as_str().ok_or_else(|| Error::WrongFieldType {
                    pointer: pointer.to_string(),
                    expected: "string",
                })?;
                ThingId::parse(raw).map_err(|err| Error::InvalidFieldValue {
                    pointer: pointer.to_string(),
                    reason: err.to_string(),
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;

        let mut builder = Self::builder(thing_ids).headers(headers);
        if let Some(namespace) = values.str(&fields::NAMESPACE) {
            builder = builder.namespace(namespace);
        }
        if let Some(selector) = read_selector(values, &fields::SELECTED_FIELDS)? {
            builder = builder.selected_fields(selector);
        }
        builder.build()
    }
}

impl Command for RetrieveThings {
    fn entity_id(&self) -> Option<&ThingId> {
        None
    }

    fn selected_fields(&self) -> Option<&FieldSelector> {
        self.selected_fields.as_ref()
    }
}

/// Collects the parts of a [`RetrieveThings`]; nothing is checked until
/// [`RetrieveThingsBuilder::build`].
#[derive(Debug, Clone)]
pub struct RetrieveThingsBuilder {
    thing_ids: Vec<ThingId>,
    namespace: Option<String>,
    selected_fields: Option<FieldSelector>,
    headers: Headers,
}

impl RetrieveThingsBuilder {
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    #[must_use]
    pub fn selected_fields(mut self, selected_fields: FieldSelector) -> Self {
        self.selected_fields = Some(selected_fields);
        self
    }

    #[must_use]
    pub fn headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    /// Applies the shared-namespace rule and produces the command.
    pub fn build(self) -> SignalResult<RetrieveThings> {
        let shared_namespace = validate_namespace(&self.thing_ids, self.namespace.as_deref())?;
        Ok(RetrieveThings {
            thing_ids: self.thing_ids,
            namespace: self.namespace,
            shared_namespace,
            selected_fields: self.selected_fields,
            headers: self.headers,
        })
    }
}

// ── retrievePolicyId ─────────────────────────────────────────────

/// Retrieves the id of the policy governing a thing. V2 only.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievePolicyId {
    thing_id: ThingId,
    headers: Headers,
}

impl RetrievePolicyId {
    #[must_use]
    pub fn of(thing_id: ThingId, headers: Headers) -> Self {
        Self { thing_id, headers }
    }

    #[must_use]
    pub fn thing_id(&self) -> &ThingId {
        &self.thing_id
    }

    pub fn respond(&self, thing: &Thing) -> SignalResult<RetrievePolicyIdResponse> {
        ensure_addressed(&self.thing_id, thing)?;
        let policy_id = thing
            .policy_id()
            .ok_or_else(|| not_accessible(&self.thing_id, &self.resource_path()))?;
        Ok(RetrievePolicyIdResponse::of(
            self.thing_id.clone(),
            policy_id,
            self.headers.clone(),
        ))
    }
}

impl Signal for RetrievePolicyId {
    const TYPE: &'static str = "things.commands.retrievePolicyId";
    const NAME: &'static str = "retrievePolicyId";
    const KIND: SignalKind = SignalKind::Command;
    const FIELDS: &'static [FieldSpec<Self>] = &[FieldSpec::required(fields::THING_ID, |c| {
        Some(Value::from(c.thing_id.as_str()))
    })];
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

    fn from_fields(values: &FieldValues<'_>, headers: Headers) -> SignalResult<Self> {
        Ok(Self::of(read_thing_id(values, &fields::THING_ID)?, headers))
    }
}

impl Command for RetrievePolicyId {
    fn entity_id(&self) -> Option<&ThingId> {
        Some(&self.thing_id)
    }
}

// ── retrieveAcl ──────────────────────────────────────────────────

/// Retrieves the access control list of a thing. V1 only.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrieveAcl {
    thing_id: ThingId,
    headers: Headers,
}

impl RetrieveAcl {
    #[must_use]
    pub fn of(thing_id: ThingId, headers: Headers) -> Self {
        Self { thing_id, headers }
    }

    #[must_use]
    pub fn thing_id(&self) -> &ThingId {
        &self.thing_id
    }

    pub fn respond(&self, thing: &Thing) -> SignalResult<RetrieveAclResponse> {
        ensure_addressed(&self.thing_id, thing)?;
        let acl = thing
            .acl()
            .ok_or_else(|| not_accessible(&self.thing_id, &self.resource_path()))?;
        Ok(RetrieveAclResponse::of(
            self.thing_id.clone(),
            acl.clone(),
            self.headers.clone(),
        ))
    }
}

impl Signal for RetrieveAcl {
    const TYPE: &'static str = "things.commands.retrieveAcl";
    const NAME: &'static str = "retrieveAcl";
    const KIND: SignalKind = SignalKind::Command;
    const FIELDS: &'static [FieldSpec<Self>] = &[FieldSpec::required(fields::THING_ID, |c| {
        Some(Value::from(c.thing_id.as_str()))
    })];
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

    fn from_fields(values: &FieldValues<'_>, headers: Headers) -> SignalResult<Self> {
        Ok(Self::of(read_thing_id(values, &fields::THING_ID)?, headers))
    }
}

impl Command for RetrieveAcl {
    fn entity_id(&self) -> Option<&ThingId> {
        Some(&self.thing_id)
    }
}
