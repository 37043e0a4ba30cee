use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::io::Write;
use tempfile::NamedTempFile;
use twinproto_cli::{
    CliConfig, ResolveOptions, list_types, parse_header, read_input, render, resolve_signal,
    select_thing,
};
use twinproto_types::{FieldSelector, SchemaVersion};

fn temp_json(value: &Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{value}").unwrap();
    file
}

fn retrieve_thing() -> Value {
    json!({"type": "things.commands.retrieveThing", "thingId": "ns:lamp"})
}

// ── Arguments ────────────────────────────────────────────────────

#[test]
fn header_arguments_split_on_first_equals() {
    assert_eq!(
        parse_header("correlation-id=a=b").unwrap(),
        ("correlation-id".to_string(), "a=b".to_string())
    );
    assert!(parse_header("no-separator").is_err());
    assert!(parse_header("=value").is_err());
}

#[test]
fn config_file_is_loaded() {
    let file = temp_json(&json!({
        "defaultSchemaVersion": 1,
        "pretty": true,
        "defaultHeaders": {"correlation-id": "from-config"}
    }));
    let config = CliConfig::load(file.path()).unwrap();
    assert_eq!(config.default_schema_version, Some(SchemaVersion::V1));
    assert!(config.pretty);
    assert_eq!(config.default_headers["correlation-id"], "from-config");
}

#[test]
fn config_fields_are_optional() {
    let file = temp_json(&json!({}));
    assert_eq!(CliConfig::load(file.path()).unwrap(), CliConfig::default());
}

#[test]
fn config_rejects_unknown_version() {
    let file = temp_json(&json!({"defaultSchemaVersion": 7}));
    assert!(CliConfig::load(file.path()).is_err());
}

#[test]
fn input_is_read_from_file() {
    let file = temp_json(&retrieve_thing());
    assert_eq!(read_input(Some(file.path())).unwrap(), retrieve_thing());
}

#[test]
fn invalid_json_input_is_reported() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{{not json").unwrap();
    let err = read_input(Some(file.path())).unwrap_err();
    assert!(err.to_string().contains("not valid JSON"));
}

// ── resolve ──────────────────────────────────────────────────────

#[test]
fn resolve_bare_signal_at_latest_version() {
    let rendered = resolve_signal(
        &retrieve_thing(),
        &ResolveOptions::default(),
        &CliConfig::default(),
    )
    .unwrap();
    assert_eq!(Value::Object(rendered), retrieve_thing());
}

#[test]
fn resolve_renders_requested_version() {
    let options = ResolveOptions {
        schema_version: Some(SchemaVersion::V1),
        ..ResolveOptions::default()
    };
    let rendered = resolve_signal(&retrieve_thing(), &options, &CliConfig::default()).unwrap();
    assert_eq!(rendered["command"], json!("retrieveThing"));
}

#[test]
fn resolve_envelope_uses_carried_headers() {
    let input = json!({
        "headers": {"version": 1},
        "signal": {
            "type": "things.commands.retrieveAcl",
            "command": "retrieveAcl",
            "thingId": "ns:lamp"
        }
    });
    let rendered = resolve_signal(&input, &ResolveOptions::default(), &CliConfig::default())
        .unwrap();
    assert_eq!(rendered["type"], json!("things.commands.retrieveAcl"));
}

#[test]
fn header_flags_override_envelope_headers() {
    let input = json!({"headers": {"version": "1"}, "signal": retrieve_thing()});
    let options = ResolveOptions {
        headers: vec![("version".into(), "2".into())],
        ..ResolveOptions::default()
    };
    let rendered = resolve_signal(&input, &options, &CliConfig::default()).unwrap();
    assert!(!rendered.contains_key("command"));
}

#[test]
fn config_default_version_applies_last() {
    let config = CliConfig {
        default_schema_version: Some(SchemaVersion::V1),
        ..CliConfig::default()
    };
    let rendered = resolve_signal(&retrieve_thing(), &ResolveOptions::default(), &config).unwrap();
    assert!(rendered.contains_key("command"));
}

#[test]
fn config_default_version_skipped_when_type_lacks_it() {
    let config = CliConfig {
        default_schema_version: Some(SchemaVersion::V2),
        ..CliConfig::default()
    };
    let input = json!({
        "type": "things.commands.retrieveAcl",
        "command": "retrieveAcl",
        "thingId": "ns:lamp"
    });
    let rendered = resolve_signal(&input, &ResolveOptions::default(), &config).unwrap();
    assert_eq!(rendered["command"], json!("retrieveAcl"));
}

#[test]
fn resolve_projects_fields() {
    let options = ResolveOptions {
        fields: Some(FieldSelector::parse("thingId").unwrap()),
        ..ResolveOptions::default()
    };
    let rendered = resolve_signal(&retrieve_thing(), &options, &CliConfig::default()).unwrap();
    assert_eq!(Value::Object(rendered), json!({"thingId": "ns:lamp"}));
}

#[test]
fn resolve_reports_unknown_types() {
    let err = resolve_signal(
        &json!({"type": "things.commands.deleteThing"}),
        &ResolveOptions::default(),
        &CliConfig::default(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("unknown signal type"));
}

#[test]
fn resolve_rejects_non_objects() {
    assert!(
        resolve_signal(&json!([1]), &ResolveOptions::default(), &CliConfig::default()).is_err()
    );
}

// ── select / types ───────────────────────────────────────────────

#[test]
fn select_expands_feature_wildcard() {
    let thing = json!({
        "thingId": "ns:lamp",
        "attributes": {"model": "L-200"},
        "features": {
            "switch": {"properties": {"on": true, "connected": true}},
            "dimmer": {"properties": {"level": 3, "connected": false}}
        }
    });
    let fields = FieldSelector::parse("thingId,features/*/properties/connected").unwrap();
    let selected = select_thing(&thing, &fields, SchemaVersion::V2).unwrap();
    assert_eq!(
        Value::Object(selected),
        json!({
            "thingId": "ns:lamp",
            "features": {
                "switch": {"properties": {"connected": true}},
                "dimmer": {"properties": {"connected": false}}
            }
        })
    );
}

#[test]
fn select_reports_invalid_things() {
    let fields = FieldSelector::parse("thingId").unwrap();
    assert!(select_thing(&json!({"attributes": {}}), &fields, SchemaVersion::V2).is_err());
}

#[test]
fn types_are_listed_sorted() {
    let types = list_types();
    assert_eq!(types.len(), 20);
    assert!(types.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn render_compact_and_pretty() {
    let object = json!({"a": 1}).as_object().unwrap().clone();
    assert_eq!(render(object.clone(), false).unwrap(), r#"{"a":1}"#);
    assert_eq!(render(object, true).unwrap(), "{\n  \"a\": 1\n}");
}
