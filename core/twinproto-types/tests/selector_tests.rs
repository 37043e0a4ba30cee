use pretty_assertions::assert_eq;
use serde_json::json;
use twinproto_types::codec::predicates;
use twinproto_types::{Error, FieldSelector, JsonFieldDefinition, JsonObject, JsonPointer, SchemaVersion};

fn selector(s: &str) -> FieldSelector {
    FieldSelector::parse(s).unwrap()
}

fn paths(selector: &FieldSelector) -> Vec<String> {
    selector.iter().map(ToString::to_string).collect()
}

fn object(value: serde_json::Value) -> JsonObject {
    value.as_object().unwrap().clone()
}

fn assert_invalid(input: &str) {
    match FieldSelector::parse(input) {
        Err(Error::InvalidFieldSelector { selector, .. }) => assert_eq!(selector, input),
        other => panic!("expected invalid field selection for {input:?}, got {other:?}"),
    }
}

// ── Parsing ──────────────────────────────────────────────────────

#[test]
fn parse_single_path() {
    let s = selector("attributes");
    assert_eq!(paths(&s), vec!["/attributes"]);
}

#[test]
fn parse_multiple_paths_keeps_order() {
    let s = selector("thingId,features/lamp/properties/on,attributes/model");
    assert_eq!(
        paths(&s),
        vec!["/thingId", "/features/lamp/properties/on", "/attributes/model"]
    );
}

#[test]
fn parse_strips_one_leading_separator() {
    assert_eq!(selector("/attributes/model"), selector("attributes/model"));
    assert_eq!(selector("/thingId,/policyId"), selector("thingId,policyId"));
}

#[test]
fn parse_rejects_double_leading_separator() {
    assert_invalid("//attributes");
}

#[test]
fn parse_rejects_trailing_separator() {
    assert_invalid("features/");
    assert_invalid("attributes/model/");
}

#[test]
fn parse_rejects_empty_segments_and_paths() {
    assert_invalid("");
    assert_invalid("/");
    assert_invalid("attributes//model");
    assert_invalid("thingId,,policyId");
    assert_invalid("thingId,");
}

#[test]
fn parse_removes_duplicates_keeping_first() {
    let s = selector("attributes,thingId,/attributes");
    assert_eq!(paths(&s), vec!["/attributes", "/thingId"]);
}

#[test]
fn parse_group_syntax() {
    let s = selector("thingId,attributes(model,location/lat)");
    assert_eq!(
        paths(&s),
        vec!["/thingId", "/attributes/model", "/attributes/location/lat"]
    );
}

#[test]
fn parse_nested_groups() {
    let s = selector("features(lamp/properties(on,level),door)");
    assert_eq!(
        paths(&s),
        vec![
            "/features/lamp/properties/on",
            "/features/lamp/properties/level",
            "/features/door",
        ]
    );
}

#[test]
fn parse_rejects_unbalanced_groups() {
    assert_invalid("attributes(model");
    assert_invalid("attributes)model");
    assert_invalid("attributes(model)x");
}

#[test]
fn parse_accepts_wildcard_in_feature_position() {
    let s = selector("features/*/properties/connected");
    assert!(s.has_wildcard());
    assert_eq!(paths(&s), vec!["/features/*/properties/connected"]);
    assert!(selector("features/*").has_wildcard());
}

#[test]
fn parse_rejects_wildcard_elsewhere() {
    assert_invalid("*");
    assert_invalid("attributes/*");
    assert_invalid("features/lamp/properties/*");
    assert_invalid("features/*/properties/*");
}

#[test]
fn display_roundtrips() {
    let s = selector("/thingId,attributes(model,make),features/*/properties");
    assert_eq!(
        s.to_string(),
        "thingId,attributes/model,attributes/make,features/*/properties"
    );
    assert_eq!(FieldSelector::parse(&s.to_string()).unwrap(), s);
}

#[test]
fn serde_uses_string_form() {
    let s = selector("attributes,features/lamp");
    let json = serde_json::to_string(&s).unwrap();
    assert_eq!(json, "\"attributes,features/lamp\"");
    let parsed: FieldSelector = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, s);
    assert!(serde_json::from_str::<FieldSelector>("\"features/\"").is_err());
}

// ── Wildcard expansion ───────────────────────────────────────────

#[test]
fn expand_wildcard_against_feature_ids() {
    let s = selector("attributes,features/*/properties/connected");
    let expanded = s.expand(["f1", "f2"]);
    assert_eq!(
        expanded.to_string(),
        "attributes,features/f1/properties/connected,features/f2/properties/connected"
    );
    assert!(!expanded.has_wildcard());
}

#[test]
fn expand_keeps_position_of_wildcard_path() {
    let s = selector("thingId,features/*,attributes");
    let expanded = s.expand(["a", "b"]);
    assert_eq!(
        paths(&expanded),
        vec!["/thingId", "/features/a", "/features/b", "/attributes"]
    );
}

#[test]
fn expand_without_keys_drops_wildcard_paths() {
    let s = selector("thingId,features/*/properties");
    assert_eq!(paths(&s.expand(Vec::<String>::new())), vec!["/thingId"]);
}

#[test]
fn expand_deduplicates_against_literal_paths() {
    let s = selector("features/b/properties,features/*/properties");
    assert_eq!(
        paths(&s.expand(["a", "b"])),
        vec!["/features/b/properties", "/features/a/properties"]
    );
}

#[test]
fn later_literal_keeps_its_position_as_keys_grow() {
    let s = selector("features/*/a,features/k1/a");
    assert_eq!(paths(&s.expand(["k2"])), vec!["/features/k2/a", "/features/k1/a"]);
    assert_eq!(
        paths(&s.expand(["k1", "k2"])),
        vec!["/features/k2/a", "/features/k1/a"]
    );
}

#[test]
fn expand_is_idempotent() {
    let s = selector("attributes,features/*/properties/on");
    let once = s.expand(["x", "y"]);
    let twice = once.expand(["x", "y", "z"]);
    assert_eq!(once, twice);
}

// ── Predicate ────────────────────────────────────────────────────

#[test]
fn matches_ancestors_descendants_and_equal_paths() {
    let s = selector("features/lamp/properties/on");
    assert!(s.matches(&JsonPointer::parse("/features").unwrap()));
    assert!(s.matches(&JsonPointer::parse("/features/lamp/properties/on").unwrap()));
    assert!(s.matches(&JsonPointer::parse("/features/lamp/properties/on/value").unwrap()));
    assert!(!s.matches(&JsonPointer::parse("/features/door").unwrap()));
    assert!(!s.matches(&JsonPointer::parse("/attributes").unwrap()));
}

#[test]
fn predicate_admits_top_level_fields_touched() {
    let s = selector("thingId,features/lamp");
    let predicate = s.to_predicate();
    let thing_id = JsonFieldDefinition::string("thingId", SchemaVersion::ALL);
    let features = JsonFieldDefinition::object("features", SchemaVersion::ALL);
    let attributes = JsonFieldDefinition::object("attributes", SchemaVersion::ALL);
    assert!(predicate(&thing_id));
    assert!(predicate(&features));
    assert!(!predicate(&attributes));
    assert!(predicates::regular(&attributes));
}

// ── Projection ───────────────────────────────────────────────────

#[test]
fn project_nests_selected_leaves_under_ancestors() {
    let source = object(json!({
        "thingId": "org.example:lamp-1",
        "attributes": {"model": "L1", "location": {"lat": 1.5, "lon": 2.5}},
        "features": {
            "lamp": {"properties": {"on": true, "level": 40}},
            "door": {"properties": {"open": false}}
        }
    }));
    let s = selector("attributes/location/lat,features/lamp/properties/on");
    assert_eq!(
        serde_json::Value::Object(s.project(&source)),
        json!({
            "attributes": {"location": {"lat": 1.5}},
            "features": {"lamp": {"properties": {"on": true}}}
        })
    );
}

#[test]
fn project_skips_missing_paths() {
    let source = object(json!({"thingId": "a:b"}));
    let s = selector("thingId,attributes/model");
    assert_eq!(
        serde_json::Value::Object(s.project(&source)),
        json!({"thingId": "a:b"})
    );
}

#[test]
fn project_ancestor_and_descendant_selects_whole_subtree() {
    let source = object(json!({"attributes": {"model": "L1", "make": "ACME"}}));
    let s = selector("attributes/model,attributes");
    assert_eq!(
        serde_json::Value::Object(s.project(&source)),
        json!({"attributes": {"model": "L1", "make": "ACME"}})
    );
}
