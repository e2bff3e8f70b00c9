//! Feature gate for IOS-XR targets.
//!
//! No OpenConfig family is translated for XR yet. [`check_features`] finds
//! the first family an OpenConfig service configures so callers can refuse
//! it up front instead of producing a partial device configuration.

use config_tree_core::TreeNode;
use serde_json::Value;

use crate::error::TranslateError;

/// Families in the order they are checked.
const FAMILIES: [(&str, fn(&Value) -> bool); 8] = [
    ("openconfig-interfaces", interfaces_configured),
    ("openconfig-stp", stp_configured),
    ("openconfig-acl-sets", acl_sets_configured),
    ("openconfig-acl-interfaces", acl_interfaces_configured),
    ("openconfig-acl-lines", acl_lines_configured),
    ("openconfig-acl-ntp", acl_ntp_configured),
    ("openconfig-routing-policy", routing_policy_configured),
    ("openconfig-network-instances", network_instances_configured),
];

/// Fail with [`TranslateError::NotImplemented`] naming the first
/// configured family.
pub fn check_features(oc: &Value) -> Result<(), TranslateError> {
    match FAMILIES.iter().find(|(_, configured)| configured(oc)) {
        Some((family, _)) => Err(TranslateError::NotImplemented(*family)),
        None => Ok(()),
    }
}

fn interfaces_configured(oc: &Value) -> bool {
    has_entries(oc, &["openconfig-interfaces:interfaces", "openconfig-interfaces:interface"])
}

fn stp_configured(oc: &Value) -> bool {
    oc.child_at(&[
        "openconfig-spanning-tree:stp",
        "openconfig-spanning-tree:global",
        "openconfig-spanning-tree:config",
        "openconfig-spanning-tree:enabled-protocol",
    ])
    .is_some()
}

fn acl_sets_configured(oc: &Value) -> bool {
    has_entries(oc, &["openconfig-acl:acl", "openconfig-acl:acl-sets", "openconfig-acl:acl-set"])
}

fn acl_interfaces_configured(oc: &Value) -> bool {
    has_entries(oc, &["openconfig-acl:acl", "openconfig-acl:interfaces", "openconfig-acl:interface"])
}

fn acl_lines_configured(oc: &Value) -> bool {
    has_entries(oc, &["openconfig-acl:acl", "openconfig-acl-ext:lines", "openconfig-acl-ext:line"])
}

fn acl_ntp_configured(oc: &Value) -> bool {
    [
        ("openconfig-acl-ext:server", "openconfig-acl-ext:server-acl-set"),
        ("openconfig-acl-ext:peer", "openconfig-acl-ext:peer-acl-set"),
    ]
    .into_iter()
    .any(|(side, leaf)| {
        oc.child_at(&["openconfig-acl:acl", "openconfig-acl-ext:ntp", side, "openconfig-acl-ext:config", leaf])
            .is_some_and(|set| !set.is_null())
    })
}

fn routing_policy_configured(oc: &Value) -> bool {
    oc.child("openconfig-routing-policy:routing-policy")
        .is_some_and(has_any_list_entry)
}

fn network_instances_configured(oc: &Value) -> bool {
    has_entries(
        oc,
        &[
            "openconfig-network-instance:network-instances",
            "openconfig-network-instance:network-instance",
        ],
    )
}

fn has_entries(oc: &Value, path: &[&str]) -> bool {
    oc.child_at(path)
        .and_then(Value::as_array)
        .is_some_and(|list| !list.is_empty())
}

fn has_any_list_entry(node: &Value) -> bool {
    match node {
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => map.values().any(has_any_list_entry),
        _ => false,
    }
}
