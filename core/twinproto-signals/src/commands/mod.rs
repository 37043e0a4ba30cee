//! Thing query commands.
//!
//! Every command addresses a sub-tree of one thing (or, for
//! [`RetrieveThings`], several things) and can answer itself from a
//! [`Thing`] with `respond`, which is what a service owning the thing calls.

mod attributes;
mod features;
mod thing;

pub use attributes::{RetrieveAttribute, RetrieveAttributes};
pub use features::{
    RetrieveFeature, RetrieveFeatureProperties, RetrieveFeatureProperty, RetrieveFeatures,
};
pub use thing::{RetrieveAcl, RetrievePolicyId, RetrieveThing, RetrieveThings, RetrieveThingsBuilder};

use crate::error::{SignalError, SignalResult};
use crate::signal::Command;
use twinproto_model::Thing;
use twinproto_types::{FieldSelector, JsonObject, JsonPointer, ThingId};

signal_enum! {
    /// One of the thing query commands.
    pub enum ThingQueryCommand {
        RetrieveThing,
        RetrieveThings,
        RetrieveAttributes,
        RetrieveAttribute,
        RetrieveFeatures,
        RetrieveFeature,
        RetrieveFeatureProperties,
        RetrieveFeatureProperty,
        RetrievePolicyId,
        RetrieveAcl,
    }
}

impl ThingQueryCommand {
    /// The addressed thing; `None` for [`RetrieveThings`].
    #[must_use]
    pub fn entity_id(&self) -> Option<&ThingId> {
        match self {
            Self::RetrieveThing(c) => c.entity_id(),
            Self::RetrieveThings(c) => c.entity_id(),
            Self::RetrieveAttributes(c) => c.entity_id(),
            Self::RetrieveAttribute(c) => c.entity_id(),
            Self::RetrieveFeatures(c) => c.entity_id(),
            Self::RetrieveFeature(c) => c.entity_id(),
            Self::RetrieveFeatureProperties(c) => c.entity_id(),
            Self::RetrieveFeatureProperty(c) => c.entity_id(),
            Self::RetrievePolicyId(c) => c.entity_id(),
            Self::RetrieveAcl(c) => c.entity_id(),
        }
    }

    #[must_use]
    pub fn selected_fields(&self) -> Option<&FieldSelector> {
        match self {
            Self::RetrieveThing(c) => c.selected_fields(),
            Self::RetrieveThings(c) => c.selected_fields(),
            Self::RetrieveAttributes(c) => c.selected_fields(),
            Self::RetrieveAttribute(c) => c.selected_fields(),
            Self::RetrieveFeatures(c) => c.selected_fields(),
            Self::RetrieveFeature(c) => c.selected_fields(),
            Self::RetrieveFeatureProperties(c) => c.selected_fields(),
            Self::RetrieveFeatureProperty(c) => c.selected_fields(),
            Self::RetrievePolicyId(c) => c.selected_fields(),
            Self::RetrieveAcl(c) => c.selected_fields(),
        }
    }
}

fn not_accessible(thing_id: &ThingId, path: &JsonPointer) -> SignalError {
    SignalError::NotAccessible {
        thing_id: thing_id.to_string(),
        path: path.to_string(),
    }
}

/// Fails unless `thing` is the one the command addresses.
fn ensure_addressed(thing_id: &ThingId, thing: &Thing) -> SignalResult<()> {
    if thing.thing_id() == thing_id {
        Ok(())
    } else {
        Err(not_accessible(thing_id, &JsonPointer::root()))
    }
}

/// Applies an optional selection relative to `object`.
fn select(object: JsonObject, selector: Option<&FieldSelector>) -> JsonObject {
    match selector {
        Some(selector) => selector.project(&object),
        None => object,
    }
}
