use pretty_assertions::assert_eq;
use serde_json::json;
use twinproto_signals::headers::{CORRELATION_ID, DRY_RUN, VERSION};
use twinproto_signals::{Headers, SignalError};
use twinproto_types::SchemaVersion;

// ── Builder ──────────────────────────────────────────────────────

#[test]
fn empty_headers_use_defaults() {
    let headers = Headers::empty();
    assert!(headers.is_empty());
    assert_eq!(headers.correlation_id(), None);
    assert_eq!(headers.schema_version(), None);
    assert!(headers.is_response_required());
    assert!(!headers.is_dry_run());
    assert_eq!(headers.content_type(), None);
}

#[test]
fn typed_setters_round_trip() {
    let headers = Headers::builder()
        .correlation_id("c-42")
        .schema_version(SchemaVersion::V1)
        .response_required(false)
        .dry_run(true)
        .content_type("application/json")
        .build()
        .unwrap();
    assert_eq!(headers.correlation_id(), Some("c-42"));
    assert_eq!(headers.schema_version(), Some(SchemaVersion::V1));
    assert!(!headers.is_response_required());
    assert!(headers.is_dry_run());
    assert_eq!(headers.content_type(), Some("application/json"));
    assert_eq!(headers.len(), 5);
}

#[test]
fn keys_are_case_insensitive() {
    let headers = Headers::builder()
        .set("X-Custom-Header", "yes")
        .build()
        .unwrap();
    assert_eq!(headers.get("x-custom-header"), Some("yes"));
    assert_eq!(headers.get("X-CUSTOM-HEADER"), Some("yes"));
    assert!(headers.contains("x-Custom-header"));
    assert_eq!(headers.iter().next(), Some(("x-custom-header", "yes")));
}

#[test]
fn later_set_overrides_earlier() {
    let headers = Headers::builder()
        .set("Correlation-Id", "first")
        .correlation_id("second")
        .build()
        .unwrap();
    assert_eq!(headers.len(), 1);
    assert_eq!(headers.correlation_id(), Some("second"));
}

#[test]
fn random_correlation_ids_differ() {
    let a = Headers::builder().random_correlation_id().build().unwrap();
    let b = Headers::builder().random_correlation_id().build().unwrap();
    assert_ne!(a.correlation_id(), b.correlation_id());
    assert_eq!(a.correlation_id().map(str::len), Some(36));
}

#[test]
fn derivation_leaves_original_untouched() {
    let original = Headers::builder().correlation_id("c-1").build().unwrap();
    let derived = original
        .to_builder()
        .schema_version(SchemaVersion::V2)
        .remove(CORRELATION_ID)
        .build()
        .unwrap();
    assert_eq!(original.correlation_id(), Some("c-1"));
    assert_eq!(original.schema_version(), None);
    assert_eq!(derived.correlation_id(), None);
    assert_eq!(derived.schema_version(), Some(SchemaVersion::V2));
}

// ── Validation ───────────────────────────────────────────────────

#[test]
fn blank_correlation_id_is_rejected() {
    let err = Headers::builder().correlation_id("  ").build().unwrap_err();
    assert!(matches!(err, SignalError::InvalidHeader { ref key, .. } if key == CORRELATION_ID));
}

#[test]
fn unknown_version_is_rejected() {
    let err = Headers::builder().set(VERSION, "3").build().unwrap_err();
    assert!(matches!(err, SignalError::InvalidHeader { ref key, .. } if key == VERSION));
    assert!(err.to_string().contains("'3'"));
}

#[test]
fn flags_must_be_booleans() {
    let err = Headers::builder().set(DRY_RUN, "yes").build().unwrap_err();
    assert_eq!(
        err,
        SignalError::InvalidHeader {
            key: DRY_RUN.into(),
            reason: "expected 'true' or 'false', found 'yes'".into()
        }
    );
}

// ── JSON ─────────────────────────────────────────────────────────

#[test]
fn to_json_renders_strings() {
    let headers = Headers::builder()
        .correlation_id("c-1")
        .schema_version(SchemaVersion::V2)
        .build()
        .unwrap();
    assert_eq!(
        serde_json::Value::Object(headers.to_json()),
        json!({"correlation-id": "c-1", "version": "2"})
    );
}

#[test]
fn from_json_accepts_scalar_forms() {
    let object = json!({"Version": 1, "Dry-Run": true, "correlation-id": "c-1"});
    let headers = Headers::from_json(object.as_object().unwrap()).unwrap();
    assert_eq!(headers.schema_version(), Some(SchemaVersion::V1));
    assert!(headers.is_dry_run());
    assert_eq!(headers.correlation_id(), Some("c-1"));
}

#[test]
fn from_json_rejects_structured_values() {
    let object = json!({"correlation-id": ["a"]});
    let err = Headers::from_json(object.as_object().unwrap()).unwrap_err();
    assert!(matches!(err, SignalError::InvalidHeader { ref key, .. } if key == "correlation-id"));
}

#[test]
fn serde_round_trip() {
    let headers = Headers::builder()
        .correlation_id("c-1")
        .response_required(false)
        .build()
        .unwrap();
    let text = serde_json::to_string(&headers).unwrap();
    assert_eq!(text, r#"{"correlation-id":"c-1","response-required":"false"}"#);
    let back: Headers = serde_json::from_str(&text).unwrap();
    assert_eq!(back, headers);
}

#[test]
fn deserialize_validates() {
    let result: Result<Headers, _> = serde_json::from_str(r#"{"version":"9"}"#);
    assert!(result.is_err());
}
