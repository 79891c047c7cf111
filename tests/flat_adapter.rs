//! Output adapter tests: JSON pass-through and RPC flattening

use airia_gateway::adapters::{stringify, to_flat_map, to_json};
use serde_json::{Value, json};

#[test]
fn object_keeps_every_key_and_all_values_are_strings() {
    let canonical = json!({
        "risk": "low",
        "score": 7,
        "approved": true,
        "missing": null,
        "details": {"clause": 4},
        "tags": ["a", "b"]
    });
    let flat = to_flat_map(&canonical);
    assert_eq!(flat.len(), canonical.as_object().unwrap().len());
    for key in canonical.as_object().unwrap().keys() {
        assert!(flat.contains_key(key), "lost key {}", key);
    }
}

#[test]
fn values_render_canonically() {
    let canonical = json!({
        "risk": "low",
        "score": 7,
        "ratio": 0.5,
        "approved": true,
        "missing": null,
        "details": {"clause": 4, "note": "x"},
        "tags": [1, "two"]
    });
    let flat = to_flat_map(&canonical);
    assert_eq!(flat["risk"], "low"); // bare string, no quotes
    assert_eq!(flat["score"], "7");
    assert_eq!(flat["ratio"], "0.5");
    assert_eq!(flat["approved"], "true");
    assert_eq!(flat["missing"], "null");
    assert_eq!(flat["details"], r#"{"clause":4,"note":"x"}"#); // compact JSON text
    assert_eq!(flat["tags"], r#"[1,"two"]"#);
}

#[test]
fn scalar_collapses_to_single_result_key() {
    let flat = to_flat_map(&json!(42));
    assert_eq!(flat.len(), 1);
    assert_eq!(flat["result"], "42");
}

#[test]
fn string_collapses_to_bare_result_value() {
    let flat = to_flat_map(&Value::String("not json".to_string()));
    assert_eq!(flat.len(), 1);
    assert_eq!(flat["result"], "not json");
}

#[test]
fn array_collapses_to_single_result_key() {
    let flat = to_flat_map(&json!([1, 2, 3]));
    assert_eq!(flat.len(), 1);
    assert_eq!(flat["result"], "[1,2,3]");
}

#[test]
fn to_json_is_identity_and_idempotent() {
    for canonical in [
        json!({"risk": "low"}),
        json!([1, 2, 3]),
        json!("plain"),
        Value::Null,
    ] {
        let once = to_json(&canonical);
        let twice = to_json(&once);
        assert_eq!(once, canonical);
        assert_eq!(twice, once);
    }
}

#[test]
fn stringify_matches_compact_json_for_non_strings() {
    assert_eq!(stringify(&json!(1.25)), "1.25");
    assert_eq!(stringify(&json!(false)), "false");
    assert_eq!(stringify(&json!({"k": [1, 2]})), r#"{"k":[1,2]}"#);
}

#[test]
fn scenario_a_flat_result() {
    // {"result": "{\"risk\":\"low\"}"} -> {"risk":"low"} -> {"risk":"low"}
    let flat = to_flat_map(&json!({"risk": "low"}));
    assert_eq!(flat.len(), 1);
    assert_eq!(flat["risk"], "low");
}

#[test]
fn scenario_b_flat_result() {
    // {"output":[{"content":[{"text":"{\"score\":7}"}]}]} -> {"score":7} -> {"score":"7"}
    let flat = to_flat_map(&json!({"score": 7}));
    assert_eq!(flat.len(), 1);
    assert_eq!(flat["score"], "7");
}
