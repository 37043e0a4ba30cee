//! Responses to the thing query commands.
//!
//! Payloads are kept in their rendered JSON form: a response is produced
//! from an already projected thing and is never re-projected.

mod attributes;
mod features;
mod thing;

pub use attributes::{RetrieveAttributeResponse, RetrieveAttributesResponse};
pub use features::{
    RetrieveFeaturePropertiesResponse, RetrieveFeaturePropertyResponse, RetrieveFeatureResponse,
    RetrieveFeaturesResponse,
};
pub use thing::{
    RetrieveAclResponse, RetrievePolicyIdResponse, RetrieveThingResponse, RetrieveThingsResponse,
};

use crate::signal::{CommandResponse, HttpStatus};
use serde_json::Value;

signal_enum! {
    /// One of the thing query command responses.
    pub enum ThingQueryCommandResponse {
        RetrieveThingResponse,
        RetrieveThingsResponse,
        RetrieveAttributesResponse,
        RetrieveAttributeResponse,
        RetrieveFeaturesResponse,
        RetrieveFeatureResponse,
        RetrieveFeaturePropertiesResponse,
        RetrieveFeaturePropertyResponse,
        RetrievePolicyIdResponse,
        RetrieveAclResponse,
    }
}

impl ThingQueryCommandResponse {
    #[must_use]
    pub fn http_status(&self) -> HttpStatus {
        match self {
            Self::RetrieveThingResponse(r) => r.http_status(),
            Self::RetrieveThingsResponse(r) => r.http_status(),
            Self::RetrieveAttributesResponse(r) => r.http_status(),
            Self::RetrieveAttributeResponse(r) => r.http_status(),
            Self::RetrieveFeaturesResponse(r) => r.http_status(),
            Self::RetrieveFeatureResponse(r) => r.http_status(),
            Self::RetrieveFeaturePropertiesResponse(r) => r.http_status(),
            Self::RetrieveFeaturePropertyResponse(r) => r.http_status(),
            Self::RetrievePolicyIdResponse(r) => r.http_status(),
            Self::RetrieveAclResponse(r) => r.http_status(),
        }
    }

    /// The returned payload.
    #[must_use]
    pub fn entity(&self) -> Value {
        match self {
            Self::RetrieveThingResponse(r) => r.entity(),
            Self::RetrieveThingsResponse(r) => r.entity(),
            Self::RetrieveAttributesResponse(r) => r.entity(),
            Self::RetrieveAttributeResponse(r) => r.entity(),
            Self::RetrieveFeaturesResponse(r) => r.entity(),
            Self::RetrieveFeatureResponse(r) => r.entity(),
            Self::RetrieveFeaturePropertiesResponse(r) => r.entity(),
            Self::RetrieveFeaturePropertyResponse(r) => r.entity(),
            Self::RetrievePolicyIdResponse(r) => r.entity(),
            Self::RetrieveAclResponse(r) => r.entity(),
        }
    }
}
