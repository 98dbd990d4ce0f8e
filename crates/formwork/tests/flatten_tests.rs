//! Flatten completeness: every recorded leaf must resolve back to the
//! same value through the resolver.

use formwork::{flatten, get_at, Path};
use serde_json::json;

#[test]
fn every_flattened_path_resolves_to_its_recorded_value() {
    let value = json!({
        "profile": {
            "name": "Ada",
            "links": [
                {"kind": "web", "url": "https://example.com"},
                {"kind": "mail", "url": null}
            ]
        },
        "scores": [1, 2, [3, 4]],
        "empty_list": [],
        "flag": false
    });

    let flat = flatten(&value);
    assert!(!flat.is_empty());
    for (path, leaf) in &flat {
        assert_eq!(
            get_at(&value, &Path::parse(path)),
            Some(leaf),
            "flatten/get disagree at {path}"
        );
    }
}

#[test]
fn arrays_are_both_leaf_and_container() {
    let value = json!({"scores": [1, [2, 3]]});
    let flat = flatten(&value);

    // The array as a whole, each element, and the nested array again.
    assert_eq!(flat["scores"], json!([1, [2, 3]]));
    assert_eq!(flat["scores.0"], json!(1));
    assert_eq!(flat["scores.1"], json!([2, 3]));
    assert_eq!(flat["scores.1.0"], json!(2));
    assert_eq!(flat["scores.1.1"], json!(3));
}

#[test]
fn seeding_matches_the_initial_snapshot_shape() {
    let value = json!({"a": {"b": 1}, "c": [true]});
    let flat = flatten(&value);
    let mut paths: Vec<_> = flat.keys().cloned().collect();
    paths.sort();
    assert_eq!(paths, vec!["a.b", "c", "c.0"]);
}
