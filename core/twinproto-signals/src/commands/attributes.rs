use super::{ensure_addressed, not_accessible, select};
use crate::error::SignalResult;
use crate::fields;
use crate::headers::Headers;
use crate::responses::{RetrieveAttributeResponse, RetrieveAttributesResponse};
use crate::signal::{Command, Signal, SignalKind, read_selector, read_thing_id};
use serde_json::Value;
use twinproto_model::Thing;
use twinproto_types::codec::FieldSpec;
use twinproto_types::{FieldSelector, FieldValues, JsonPointer, ThingId};

// ── retrieveAttributes ───────────────────────────────────────────

/// Retrieves all attributes of a thing, optionally narrowed by a selection
/// relative to the attributes object.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrieveAttributes {
    thing_id: ThingId,
    selected_fields: Option<FieldSelector>,
    headers: Headers,
}

impl RetrieveAttributes {
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

    pub fn respond(&self, thing: &Thing) -> SignalResult<RetrieveAttributesResponse> {
        ensure_addressed(&self.thing_id, thing)?;
        let attributes = thing
            .attributes()
            .ok_or_else(|| not_accessible(&self.thing_id, &self.resource_path()))?;
        Ok(RetrieveAttributesResponse::of(
            self.thing_id.clone(),
            select(attributes.clone(), self.selected_fields.as_ref()),
            self.headers.clone(),
        ))
    }
}

impl Signal for RetrieveAttributes {
    const TYPE: &'static str = "things.commands.retrieveAttributes";
    const NAME: &'static str = "retrieveAttributes";
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
        fields::ATTRIBUTES.pointer()
    }

    fn from_fields(values: &FieldValues<'_>, headers: Headers) -> SignalResult<Self> {
        Ok(Self {
            thing_id: read_thing_id(values, &fields::THING_ID)?,
            selected_fields: read_selector(values, &fields::SELECTED_FIELDS)?,
            headers,
        })
    }
}

impl Command for RetrieveAttributes {
    fn entity_id(&self) -> Option<&ThingId> {
        Some(&self.thing_id)
    }

    fn selected_fields(&self) -> Option<&FieldSelector> {
        self.selected_fields.as_ref()
    }
}

// ── retrieveAttribute ────────────────────────────────────────────

/// Retrieves one attribute by pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrieveAttribute {
    thing_id: ThingId,
    attribute: JsonPointer,
    headers: Headers,
}

impl RetrieveAttribute {
    #[must_use]
    pub fn of(thing_id: ThingId, attribute: JsonPointer, headers: Headers) -> Self {
        Self {
            thing_id,
            attribute,
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

    pub fn respond(&self, thing: &Thing) -> SignalResult<RetrieveAttributeResponse> {
        ensure_addressed(&self.thing_id, thing)?;
        let value = thing
            .attribute(&self.attribute)
            .ok_or_else(|| not_accessible(&self.thing_id, &self.resource_path()))?;
        Ok(RetrieveAttributeResponse::of(
            self.thing_id.clone(),
            self.attribute.clone(),
            value.clone(),
            self.headers.clone(),
        ))
    }
}

impl Signal for RetrieveAttribute {
    const TYPE: &'static str = "things.commands.retrieveAttribute";
    const NAME: &'static str = "retrieveAttribute";
    const KIND: SignalKind = SignalKind::Command;
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec::required(fields::THING_ID, |c| Some(Value::from(c.thing_id.as_str()))),
        FieldSpec::required(fields::ATTRIBUTE, |c| Some(Value::from(c.attribute.to_string()))),
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

    fn from_fields(values: &FieldValues<'_>, headers: Headers) -> SignalResult<Self> {
        Ok(Self {
            thing_id: read_thing_id(values, &fields::THING_ID)?,
            attribute: values.require_parsed(&fields::ATTRIBUTE, JsonPointer::parse)?,
            headers,
        })
    }
}

impl Command for RetrieveAttribute {
    fn entity_id(&self) -> Option<&ThingId> {
        Some(&self.thing_id)
    }
}
