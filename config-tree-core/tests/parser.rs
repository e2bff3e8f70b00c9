use std::path::PathBuf;

use config_tree_core::{parse, parse_file, ParseError, TreeNode};

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

#[test]
fn parses_nested_lists_and_presence_leaves() {
    let node = parse_file(&fixture("fixtures/tree_before.json")).expect("parse should succeed");

    let acls = node
        .child_at(&["tailf-ned-cisco-ios:ip", "access-list", "standard"])
        .expect("standard acls");
    assert_eq!(acls.list("std-named-acl").len(), 1);
    assert!(node
        .child_at(&["tailf-ned-cisco-ios:service"])
        .is_some_and(|service| service.has("timestamps")));
}

#[test]
fn reports_invalid_json() {
    let err = parse(br#"{"unterminated": "#).expect_err("invalid json");
    assert!(matches!(err, ParseError::Json(_)));
}

#[test]
fn reports_missing_file() {
    let err = parse_file(&fixture("fixtures/does-not-exist.json")).expect_err("missing file");
    assert!(matches!(err, ParseError::Io(_)));
}
