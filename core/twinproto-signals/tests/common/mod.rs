//! Shared fixtures for signal tests.

#![allow(dead_code)]

use serde_json::{Value, json};
use twinproto_model::{Feature, Thing};
use twinproto_signals::commands::*;
use twinproto_signals::responses::*;
use twinproto_signals::{Headers, ThingSignal};
use twinproto_types::{FeatureId, FieldSelector, JsonObject, JsonPointer, SchemaVersion, ThingId};

pub fn tid(s: &str) -> ThingId {
    ThingId::parse(s).unwrap()
}

pub fn fid(s: &str) -> FeatureId {
    FeatureId::parse(s).unwrap()
}

pub fn ptr(s: &str) -> JsonPointer {
    JsonPointer::parse(s).unwrap()
}

pub fn sel(s: &str) -> FieldSelector {
    FieldSelector::parse(s).unwrap()
}

pub fn object(value: Value) -> JsonObject {
    value.as_object().unwrap().clone()
}

/// Headers naming `version`, with a fixed correlation id.
pub fn headers(version: SchemaVersion) -> Headers {
    Headers::builder()
        .correlation_id("corr-1")
        .schema_version(version)
        .build()
        .unwrap()
}

/// A thing with attributes, two features, a policy, an ACL and metadata.
pub fn lamp() -> Thing {
    Thing::builder(tid("org.example:lamp-1"))
        .policy_id("org.example:policy")
        .acl(object(json!({"alice": {"READ": true}})))
        .attribute(&ptr("/model"), json!("L-200"))
        .attribute(&ptr("/location/lat"), json!(48.1))
        .feature(
            Feature::new(fid("switch"))
                .with_property(&ptr("/connected"), json!(true))
                .with_property(&ptr("/on"), json!(false)),
        )
        .feature(
            Feature::new(fid("dimmer"))
                .with_property(&ptr("/connected"), json!(false))
                .with_property(&ptr("/level"), json!(40)),
        )
        .revision(3)
        .build()
}

/// One fully populated instance of every signal type that exists at
/// `version`.
pub fn sample_signals(version: SchemaVersion) -> Vec<ThingSignal> {
    let h = headers(version);
    let id = tid("org.example:lamp-1");
    let mut signals: Vec<ThingSignal> = vec![
        RetrieveThing::of(id.clone(), h.clone())
            .with_selected_fields(sel("thingId,attributes/model"))
            .with_snapshot_revision(3)
            .into(),
        RetrieveThings::builder([tid("org.example:a"), tid("org.example:b")])
            .namespace("org.example")
            .selected_fields(sel("thingId"))
            .headers(h.clone())
            .build()
            .unwrap()
            .into(),
        RetrieveAttributes::of(id.clone(), h.clone())
            .with_selected_fields(sel("model"))
            .into(),
        RetrieveAttribute::of(id.clone(), ptr("/location/lat"), h.clone()).into(),
        RetrieveFeatures::of(id.clone(), h.clone())
            .with_selected_fields(sel("switch"))
            .into(),
        RetrieveFeature::of(id.clone(), fid("switch"), h.clone())
            .with_selected_fields(sel("properties"))
            .into(),
        RetrieveFeatureProperties::of(id.clone(), fid("switch"), h.clone()).into(),
        RetrieveFeatureProperty::of(id.clone(), fid("switch"), ptr("/on"), h.clone()).into(),
        RetrieveThingResponse::of(id.clone(), object(json!({"thingId": id.as_str()})), h.clone())
            .into(),
        RetrieveThingsResponse::of(
            vec![object(json!({"thingId": "org.example:a"}))],
            Some("org.example".into()),
            h.clone(),
        )
        .into(),
        RetrieveAttributesResponse::of(id.clone(), object(json!({"model": "L-200"})), h.clone())
            .into(),
        RetrieveAttributeResponse::of(id.clone(), ptr("/location/lat"), json!(48.1), h.clone())
            .into(),
        RetrieveFeaturesResponse::of(id.clone(), object(json!({"switch": {}})), h.clone()).into(),
        RetrieveFeatureResponse::of(id.clone(), fid("switch"), object(json!({})), h.clone()).into(),
        RetrieveFeaturePropertiesResponse::of(
            id.clone(),
            fid("switch"),
            object(json!({"on": false})),
            h.clone(),
        )
        .into(),
        RetrieveFeaturePropertyResponse::of(
            id.clone(),
            fid("switch"),
            ptr("/on"),
            json!(false),
            h.clone(),
        )
        .into(),
    ];
    match version {
        SchemaVersion::V1 => {
            signals.push(RetrieveAcl::of(id.clone(), h.clone()).into());
            signals.push(
                RetrieveAclResponse::of(id.clone(), object(json!({"alice": {"READ": true}})), h)
                    .into(),
            );
        }
        SchemaVersion::V2 => {
            signals.push(RetrievePolicyId::of(id.clone(), h.clone()).into());
            signals.push(RetrievePolicyIdResponse::of(id, "org.example:policy", h).into());
        }
    }
    signals
}
