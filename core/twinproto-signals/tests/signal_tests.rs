mod common;

use common::*;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use twinproto_signals::commands::*;
use twinproto_signals::responses::*;
use twinproto_signals::{
    Command, CommandResponse, Headers, HttpStatus, Signal, SignalError, SignalKind,
};
use twinproto_types::codec::predicates;
use twinproto_types::{Error, JsonFieldDefinition, SchemaVersion};

// ── Rendering ────────────────────────────────────────────────────

#[test]
fn v1_rendering_repeats_command_name() {
    let command = RetrieveThing::of(tid("ns:lamp"), headers(SchemaVersion::V1));
    let json = Value::Object(command.to_json_default().unwrap());
    assert_eq!(
        json,
        json!({
            "type": "things.commands.retrieveThing",
            "command": "retrieveThing",
            "thingId": "ns:lamp"
        })
    );
}

#[test]
fn v2_rendering_omits_v1_only_command_field() {
    let command = RetrieveThing::of(tid("ns:lamp"), headers(SchemaVersion::V2));
    let json = command.to_json(SchemaVersion::V2, &predicates::all).unwrap();
    assert!(!json.contains_key("command"));
    assert_eq!(
        Value::Object(json),
        json!({"type": "things.commands.retrieveThing", "thingId": "ns:lamp"})
    );
}

#[test]
fn response_envelope_carries_status() {
    let response = RetrievePolicyIdResponse::of(tid("ns:lamp"), "ns:policy", Headers::empty());
    let json = Value::Object(response.to_json_default().unwrap());
    assert_eq!(
        json,
        json!({
            "type": "things.responses.retrievePolicyId",
            "status": 200,
            "thingId": "ns:lamp",
            "policyId": "ns:policy"
        })
    );
}

#[test]
fn v1_response_repeats_response_name() {
    let response = RetrieveAclResponse::of(
        tid("ns:lamp"),
        object(json!({"alice": {"READ": true}})),
        Headers::empty(),
    );
    let json = response.to_json(SchemaVersion::V1, &predicates::regular).unwrap();
    let keys: Vec<&str> = json.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["type", "response", "status", "thingId", "acl"]);
}

#[test]
fn rendering_order_is_stable() {
    let command = RetrieveThing::of(tid("ns:lamp"), headers(SchemaVersion::V1))
        .with_snapshot_revision(4)
        .with_selected_fields(sel("thingId"));
    let first = command.to_json_default().unwrap();
    let second = command.to_json_default().unwrap();
    let keys = |o: &twinproto_types::JsonObject| o.keys().cloned().collect::<Vec<_>>();
    assert_eq!(keys(&first), keys(&second));
    assert_eq!(
        keys(&first),
        vec!["type", "command", "thingId", "selectedFields", "snapshotRevision"]
    );
}

#[test]
fn predicate_narrows_rendered_fields() {
    let command = RetrieveThing::of(tid("ns:lamp"), Headers::empty())
        .with_selected_fields(sel("attributes"));
    let only_ids = |d: &JsonFieldDefinition| d.name() == "type" || d.name() == "thingId";
    let json = Value::Object(command.to_json(SchemaVersion::V2, &only_ids).unwrap());
    assert_eq!(
        json,
        json!({"type": "things.commands.retrieveThing", "thingId": "ns:lamp"})
    );
}

#[test]
fn rendering_contains_only_fields_of_the_version() {
    for version in SchemaVersion::ALL {
        for signal in sample_signals(*version) {
            let json = signal.to_json(*version, &predicates::regular).unwrap();
            if *version == SchemaVersion::V2 {
                assert!(!json.contains_key("command"), "{}", signal.signal_type());
                assert!(!json.contains_key("response"), "{}", signal.signal_type());
                assert!(!json.contains_key("acl"), "{}", signal.signal_type());
            } else {
                assert!(
                    json.contains_key("command") || json.contains_key("response"),
                    "{}",
                    signal.signal_type()
                );
                assert!(!json.contains_key("policyId"), "{}", signal.signal_type());
            }
        }
    }
}

// ── Schema version gating ────────────────────────────────────────

#[test]
fn policy_id_is_not_renderable_in_v1() {
    let command = RetrievePolicyId::of(tid("ns:lamp"), Headers::empty());
    let err = command
        .to_json(SchemaVersion::V1, &predicates::regular)
        .unwrap_err();
    assert_eq!(
        err,
        SignalError::UnsupportedSchemaVersion {
            signal_type: "things.commands.retrievePolicyId",
            requested: SchemaVersion::V1,
            supported: SchemaVersion::V2_ONLY,
        }
    );
}

#[test]
fn acl_is_not_parseable_in_v2() {
    let object = object(json!({"type": "things.commands.retrieveAcl", "thingId": "ns:lamp"}));
    let err = RetrieveAcl::parse(&object, &headers(SchemaVersion::V2)).unwrap_err();
    assert!(matches!(
        err,
        SignalError::UnsupportedSchemaVersion { requested: SchemaVersion::V2, .. }
    ));
    assert!(err.to_string().contains("supported: 1"));
}

#[test]
fn acl_defaults_to_its_only_version() {
    let command = RetrieveAcl::of(tid("ns:lamp"), Headers::empty());
    assert_eq!(command.implemented_schema_version(), SchemaVersion::V1);
    let json = command.to_json_default().unwrap();
    assert_eq!(json["command"], json!("retrieveAcl"));
    assert_eq!(RetrieveAcl::parse(&json, &Headers::empty()).unwrap(), command);
}

#[test]
fn implemented_version_follows_headers() {
    let command = RetrieveThing::of(tid("ns:lamp"), headers(SchemaVersion::V1));
    assert_eq!(command.implemented_schema_version(), SchemaVersion::V1);
    let latest = RetrieveThing::of(tid("ns:lamp"), Headers::empty());
    assert_eq!(latest.implemented_schema_version(), SchemaVersion::LATEST);
}

// ── Parsing ──────────────────────────────────────────────────────

#[test]
fn v1_parse_requires_command_name() {
    let object = object(json!({"type": "things.commands.retrieveThing", "thingId": "ns:lamp"}));
    let err = RetrieveThing::parse(&object, &headers(SchemaVersion::V1)).unwrap_err();
    assert_eq!(
        err,
        SignalError::Json(Error::MissingField {
            pointer: "/command".into()
        })
    );
}

#[test]
fn v2_parse_ignores_v1_fields() {
    let object = object(json!({
        "type": "things.commands.retrieveThing",
        "command": 42,
        "thingId": "ns:lamp"
    }));
    let command = RetrieveThing::parse(&object, &headers(SchemaVersion::V2)).unwrap();
    assert_eq!(command.thing_id(), &tid("ns:lamp"));
}

#[test]
fn v1_parse_rejects_wrong_command_name() {
    let object = object(json!({
        "type": "things.commands.retrieveThing",
        "command": "retrieveThings",
        "thingId": "ns:lamp"
    }));
    let err = RetrieveThing::parse(&object, &headers(SchemaVersion::V1)).unwrap_err();
    assert!(matches!(
        err,
        SignalError::Json(Error::InvalidFieldValue { ref pointer, .. }) if pointer == "/command"
    ));
}

#[test]
fn parse_rejects_other_discriminator() {
    let object = object(json!({"type": "things.commands.retrieveFeatures", "thingId": "ns:lamp"}));
    let err = RetrieveThing::parse(&object, &Headers::empty()).unwrap_err();
    assert_eq!(
        err,
        SignalError::TypeMismatch {
            expected: "things.commands.retrieveThing",
            found: "things.commands.retrieveFeatures".into()
        }
    );
}

#[test]
fn foreign_discriminator_is_reported_before_version_support() {
    let object = object(json!({"type": "things.commands.retrieveThing", "thingId": "ns:lamp"}));
    let err = RetrieveAcl::parse(&object, &headers(SchemaVersion::V2)).unwrap_err();
    assert_eq!(
        err,
        SignalError::TypeMismatch {
            expected: "things.commands.retrieveAcl",
            found: "things.commands.retrieveThing".into()
        }
    );
}

#[test]
fn parse_reports_wrong_field_type() {
    let object = object(json!({"type": "things.commands.retrieveThing", "thingId": 5}));
    let err = RetrieveThing::parse(&object, &Headers::empty()).unwrap_err();
    assert_eq!(
        err,
        SignalError::Json(Error::WrongFieldType {
            pointer: "/thingId".into(),
            expected: "string"
        })
    );
}

#[test]
fn parse_ignores_unknown_fields() {
    let object = object(json!({
        "type": "things.commands.retrieveFeatures",
        "thingId": "ns:lamp",
        "somethingNew": {"x": 1}
    }));
    assert!(RetrieveFeatures::parse(&object, &Headers::empty()).is_ok());
}

#[test]
fn response_parse_rejects_invalid_status() {
    let object = object(json!({
        "type": "things.responses.retrieveAttributes",
        "status": 42,
        "thingId": "ns:lamp",
        "attributes": {}
    }));
    let err = RetrieveAttributesResponse::parse(&object, &Headers::empty()).unwrap_err();
    assert!(matches!(
        err,
        SignalError::Json(Error::InvalidFieldValue { ref pointer, .. }) if pointer == "/status"
    ));
}

#[test]
fn things_response_requires_object_entries() {
    let object = object(json!({
        "type": "things.responses.retrieveThings",
        "status": 200,
        "things": [{"thingId": "ns:a"}, "ns:b"]
    }));
    let err = RetrieveThingsResponse::parse(&object, &Headers::empty()).unwrap_err();
    assert_eq!(
        err,
        SignalError::Json(Error::WrongFieldType {
            pointer: "/things/1".into(),
            expected: "object"
        })
    );
}

#[test]
fn retrieve_things_parse_reports_bad_id_position() {
    let object = object(json!({
        "type": "things.commands.retrieveThings",
        "thingIds": ["ns:a", "ns:"]
    }));
    let err = RetrieveThings::parse(&object, &Headers::empty()).unwrap_err();
    assert!(matches!(
        err,
        SignalError::Json(Error::InvalidFieldValue { ref pointer, .. }) if pointer == "/thingIds/1"
    ));
}

#[test]
fn retrieve_things_parse_applies_namespace_rule() {
    let object = object(json!({
        "type": "things.commands.retrieveThings",
        "thingIds": ["ns1:a", "ns2:b"]
    }));
    let err = RetrieveThings::parse(&object, &Headers::empty()).unwrap_err();
    assert_eq!(
        err,
        SignalError::InconsistentNamespaces {
            namespaces: vec!["ns1".into(), "ns2".into()]
        }
    );
}

// ── Signal metadata ──────────────────────────────────────────────

#[test]
fn resource_paths_address_the_sub_tree() {
    let h = Headers::empty();
    let id = tid("ns:lamp");
    assert_eq!(RetrieveThing::of(id.clone(), h.clone()).resource_path().to_string(), "/");
    assert_eq!(
        RetrieveAttribute::of(id.clone(), ptr("/location/lat"), h.clone())
            .resource_path()
            .to_string(),
        "/attributes/location/lat"
    );
    assert_eq!(
        RetrieveFeatureProperties::of(id.clone(), fid("switch"), h.clone())
            .resource_path()
            .to_string(),
        "/features/switch/properties"
    );
    assert_eq!(
        RetrieveFeatureProperty::of(id.clone(), fid("switch"), ptr("/a/b"), h.clone())
            .resource_path()
            .to_string(),
        "/features/switch/properties/a/b"
    );
    assert_eq!(RetrievePolicyId::of(id.clone(), h.clone()).resource_path().to_string(), "/policyId");
    assert_eq!(RetrieveAcl::of(id, h).resource_path().to_string(), "/acl");
}

#[test]
fn discriminators_share_the_signal_name() {
    assert_eq!(RetrieveFeature::NAME, RetrieveFeatureResponse::NAME);
    assert_eq!(RetrieveFeature::KIND, SignalKind::Command);
    assert_eq!(RetrieveFeatureResponse::KIND, SignalKind::Response);
    assert_eq!(
        RetrieveFeature::TYPE,
        format!("things.commands.{}", RetrieveFeature::NAME)
    );
    assert_eq!(
        RetrieveFeatureResponse::TYPE,
        format!("things.responses.{}", RetrieveFeatureResponse::NAME)
    );
}

#[test]
fn set_headers_returns_new_signal() {
    let original = RetrieveFeature::of(tid("ns:lamp"), fid("switch"), headers(SchemaVersion::V2));
    let replaced = original.set_headers(Headers::builder().correlation_id("corr-2").build().unwrap());
    assert_eq!(original.headers().correlation_id(), Some("corr-1"));
    assert_eq!(replaced.headers().correlation_id(), Some("corr-2"));
    assert_eq!(replaced.feature_id(), original.feature_id());
}

#[test]
fn set_headers_keeps_batch_namespace() {
    let command = RetrieveThings::builder([tid("ns:a"), tid("ns:b")])
        .build()
        .unwrap();
    let replaced = command.set_headers(headers(SchemaVersion::V1));
    assert_eq!(replaced.shared_namespace(), Some("ns"));
    assert_eq!(replaced.thing_ids(), command.thing_ids());
}

#[test]
fn command_and_response_traits_expose_payload() {
    let command = RetrieveThing::of(tid("ns:lamp"), Headers::empty()).with_selected_fields(sel("thingId"));
    assert_eq!(command.entity_id(), Some(&tid("ns:lamp")));
    assert_eq!(command.selected_fields(), Some(&sel("thingId")));

    let response = RetrieveAttributeResponse::of(tid("ns:lamp"), ptr("/a"), json!(null), Headers::empty());
    assert_eq!(response.http_status(), HttpStatus::OK);
    assert_eq!(response.entity(), Value::Null);
}

#[test]
fn http_status_bounds() {
    assert!(HttpStatus::new(99).is_none());
    assert!(HttpStatus::new(600).is_none());
    assert!(HttpStatus::new(204).unwrap().is_success());
    assert!(!HttpStatus::NOT_FOUND.is_success());
}
