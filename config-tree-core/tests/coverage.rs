use std::path::PathBuf;

use config_tree_core::{
    coverage, coverage_with_options, format_json, format_summary, format_text, parse_file,
    CoverageEntry, CoverageOptions, Leftover, TreePath,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

#[test]
fn coverage_reports_deleted_fields_and_tombstones() {
    let source = parse_file(&fixture("fixtures/tree_before.json")).expect("source parse");
    let leftover = parse_file(&fixture("fixtures/tree_leftover.json")).expect("leftover parse");

    let entries = coverage(&source, &leftover);
    let consumed: Vec<&str> = entries
        .iter()
        .filter(|e| matches!(e, CoverageEntry::Consumed { .. }))
        .map(CoverageEntry::path)
        .collect();

    assert_eq!(
        consumed,
        vec![
            "tailf-ned-cisco-ios:ip.access-list.standard.std-named-acl[0].name",
            "tailf-ned-cisco-ios:ip.access-list.standard.std-named-acl[0].std-access-list-rule[0]",
        ]
    );

    let text = format_text(&entries);
    let json = format_json(&entries);
    let summary = format_summary(&entries);
    assert!(text.contains("- tailf-ned-cisco-ios:ip.access-list.standard.std-named-acl[0].name"));
    assert!(json.contains("\"type\": \"Consumed\""));
    assert_eq!(summary, "consumed=2 remaining=0 partial=0 structural=0");
}

#[test]
fn coverage_matches_tracked_leftover() {
    let source = parse_file(&fixture("fixtures/tree_before.json")).expect("source parse");
    let mut leftover = Leftover::new(&source);
    let acl = TreePath::from_keys(&[
        "tailf-ned-cisco-ios:ip",
        "access-list",
        "standard",
        "std-named-acl",
    ])
    .index(0);
    leftover.remove(&acl.clone().key("std-access-list-rule").index(0));
    leftover.remove(&acl.clone().key("name"));

    let expected = parse_file(&fixture("fixtures/tree_leftover.json")).expect("leftover parse");
    assert_eq!(leftover.root(), &expected);
    assert_eq!(leftover.consumed().len(), 2);
}

#[test]
fn depth_limit_reports_partial_sections() {
    let source = json!({"a": {"b": 1, "c": 2}, "d": {"e": 3}});
    let leftover = json!({"a": {"c": 2}, "d": {"e": 3}});

    let opts = CoverageOptions {
        include_remaining: true,
        max_depth: 1,
        ..CoverageOptions::default()
    };
    let entries = coverage_with_options(&source, &leftover, &opts);

    assert_eq!(
        entries,
        vec![
            CoverageEntry::Partial {
                path: "a".to_string()
            },
            CoverageEntry::Remaining {
                path: "d".to_string()
            },
        ]
    );
}

#[test]
fn ignore_paths_skip_matching_keys() {
    let source = json!({"router": {"ospf": [{"id": 1}], "bgp": [{"as-no": 1}]}});
    let leftover = json!({"router": {"ospf": [null], "bgp": [{}]}});

    let opts = CoverageOptions {
        ignore_paths: vec!["ospf".to_string()],
        ..CoverageOptions::default()
    };
    let entries = coverage_with_options(&source, &leftover, &opts);

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path(), "router.bgp[0].as-no");
}

#[test]
fn extra_leftover_fields_are_structural() {
    let source = json!({"a": 1});
    let leftover = json!({"a": 1, "b": 2});

    let entries = coverage(&source, &leftover);
    assert!(matches!(
        &entries[0],
        CoverageEntry::Structural { path, .. } if path == "b"
    ));
}
