//! References to access lists from interfaces, NTP and VTY lines.

use config_tree_core::tree::scalar_text;
use config_tree_core::{
    ensure_list, ensure_object, ensure_path, get_or_insert_keyed, keyed_entry, Leftover,
    TreeNode, TreePath,
};
use serde_json::{json, Map, Value};
use tracing::debug;

use super::{DefinedAcl, FEATURE};
use crate::context::TranslationContext;
use crate::interfaces::ned_interfaces;

const NTP: &str = "tailf-ned-cisco-ios:ntp";
const LINE: &str = "tailf-ned-cisco-ios:line";

/// One `ip access-group` statement on an interface.
#[derive(Debug)]
struct AccessGroup {
    id: String,
    interface: String,
    subinterface: u32,
    direction: String,
    acl: String,
    container: TreePath,
    path: TreePath,
}

/// Bind `ip access-group` statements to the acl-sets they reference.
///
/// Interface entries are keyed by the full interface name and appear in the
/// order their first bound list was defined.
pub fn translate_interfaces(
    before: &Value,
    leftover: &mut Leftover,
    ctx: &mut TranslationContext,
    defined: &[DefinedAcl],
    acl: &mut Map<String, Value>,
) {
    let groups = access_groups(before);
    let interfaces = ensure_list(
        ensure_object(acl, "openconfig-acl:interfaces"),
        "openconfig-acl:interface",
    );

    for set in defined {
        for group in groups.iter().filter(|g| g.acl == set.name) {
            let sets = match group.direction.as_str() {
                "in" => ("openconfig-acl:ingress-acl-sets", "openconfig-acl:ingress-acl-set"),
                "out" => ("openconfig-acl:egress-acl-sets", "openconfig-acl:egress-acl-set"),
                _ => continue,
            };
            let entry = get_or_insert_keyed(interfaces, "openconfig-acl:id", &json!(group.id), |id| {
                let mut entry = keyed_entry("openconfig-acl:id", "openconfig-acl:config", id);
                entry.insert(
                    "openconfig-acl:interface-ref".into(),
                    json!({
                        "openconfig-acl:config": {
                            "openconfig-acl:interface": group.interface,
                            "openconfig-acl:subinterface": group.subinterface,
                        }
                    }),
                );
                entry
            });
            ensure_list(ensure_object(entry, sets.0), sets.1).push(json!({
                "openconfig-acl:set-name": set.name,
                "openconfig-acl:type": set.kind.acl_type(),
                "openconfig-acl:config": {
                    "openconfig-acl:set-name": set.name,
                    "openconfig-acl:type": set.kind.acl_type(),
                }
            }));
            leftover.remove(&group.path);
            debug!(interface = %group.id, acl = %set.name, "bound access list");
        }
    }

    for group in &groups {
        let known = defined.iter().any(|set| set.name == group.acl);
        if !known {
            ctx.note(
                FEATURE,
                &group.id,
                format!("ip access-group {} {}", group.acl, group.direction),
                "access list is not defined on the device",
            );
        } else if group.direction != "in" && group.direction != "out" {
            ctx.note(
                FEATURE,
                &group.id,
                format!("ip access-group {} {}", group.acl, group.direction),
                format!("unknown access-group direction {}", group.direction),
            );
        }
    }

    let mut containers: Vec<&TreePath> = groups.iter().map(|g| &g.container).collect();
    containers.dedup();
    for container in containers {
        leftover.remove_if_consumed(container);
    }
}

fn access_groups(before: &Value) -> Vec<AccessGroup> {
    let mut out = Vec::new();
    for intf in ned_interfaces(before) {
        let container = intf.path.clone().keys(&["ip", "access-group"]);
        let Some(list) = container.lookup(before).and_then(Value::as_array) else {
            continue;
        };
        let (interface, subinterface) = intf.interface_ref();
        for (idx, group) in list.iter().enumerate() {
            let (Some(direction), Some(acl)) =
                (group.text_at(&["direction"]), group.text_at(&["access-list"]))
            else {
                continue;
            };
            out.push(AccessGroup {
                id: intf.full_name(),
                interface: interface.clone(),
                subinterface,
                direction,
                acl,
                container: container.clone(),
                path: container.clone().index(idx),
            });
        }
    }
    out
}

/// `ntp access-group serve|peer <acl>`.
pub fn translate_ntp(before: &Value, leftover: &mut Leftover, acl: &mut Map<String, Value>) {
    let roles = [
        ("serve", "openconfig-acl-ext:server", "openconfig-acl-ext:server-acl-set"),
        ("peer", "openconfig-acl-ext:peer", "openconfig-acl-ext:peer-acl-set"),
    ];
    for (role, container, leaf) in roles {
        let path = TreePath::from_keys(&[NTP, "access-group", role, "access-list"]);
        let Some(name) = path.lookup(before).and_then(scalar_text) else {
            continue;
        };
        ensure_path(acl, &["openconfig-acl-ext:ntp", container, "openconfig-acl-ext:config"])
            .insert(leaf.to_string(), json!(name));
        leftover.remove(&path);
    }
}

/// `line vty` access classes.
pub fn translate_lines(before: &Value, leftover: &mut Leftover, acl: &mut Map<String, Value>) {
    let vty_path = TreePath::from_keys(&[LINE, "vty"]);
    let Some(vtys) = vty_path.lookup(before).and_then(Value::as_array) else {
        return;
    };

    for (idx, vty) in vtys.iter().enumerate() {
        let Some((keys, classes)) = [["access-class", "access-list"], ["access-class-vrf", "access-class"]]
            .into_iter()
            .find_map(|keys| Some((keys, vty.child_at(&keys)?.as_array()?)))
        else {
            continue;
        };

        let first = vty.child("first").and_then(scalar_text).unwrap_or_default();
        let last = vty.child("last").and_then(scalar_text).unwrap_or_default();
        let id = format!("vty {first} {last}");
        let lines = ensure_list(
            ensure_object(acl, "openconfig-acl-ext:lines"),
            "openconfig-acl-ext:line",
        );
        let line = get_or_insert_keyed(lines, "openconfig-acl-ext:id", &json!(id), |id| {
            keyed_entry("openconfig-acl-ext:id", "openconfig-acl-ext:config", id)
        });

        for class in classes {
            let Some(name) = class.text_at(&["access-list"]) else {
                continue;
            };
            if class.text_at(&["direction"]).as_deref() == Some("out") {
                line.insert("openconfig-acl-ext:egress-acl-set".into(), json!(name));
                continue;
            }
            let vrf = class
                .text_at(&["vrfname"])
                .unwrap_or_else(|| "global".to_string());
            ensure_list(
                ensure_object(line, "openconfig-acl-ext:ingress-acl-sets"),
                "openconfig-acl-ext:ingress-acl-set",
            )
            .push(json!({
                "openconfig-acl-ext:ingress-acl-set-name": name,
                "openconfig-acl-ext:config": {
                    "openconfig-acl-ext:vrf": vrf,
                    "openconfig-acl-ext:vrf-also": class.has("vrf-also"),
                    "openconfig-acl-ext:ingress-acl-set-name": name,
                }
            }));
        }
        leftover.tombstone(&vty_path.clone().index(idx).keys(&keys));
    }
}
