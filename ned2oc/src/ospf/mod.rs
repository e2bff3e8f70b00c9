//! IOS-XE `router ospf` processes to OpenConfig OSPFv2.
//!
//! A process tagged with `vrf` belongs to the L3VRF instance of that name;
//! untagged processes belong to the default instance. Global settings are
//! established first, then areas, and interfaces are bound to areas once
//! every area is known.

pub mod area;
pub mod global;
pub mod interface;
pub mod network;

#[cfg(test)]
mod tests;

use std::collections::BTreeSet;

use config_tree_core::tree::scalar_text;
use config_tree_core::{ensure_list, ensure_path, get_or_insert_keyed, keyed_entry, Leftover, TreeNode, TreePath};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::context::TranslationContext;
use crate::error::TranslateError;
use crate::interfaces::VrfInterface;

use area::area_list;
use network::{bind_interfaces, network_statements};

pub const FEATURE: &str = "ospf";
const ROUTER: &str = "tailf-ned-cisco-ios:router";

/// Translate the OSPF processes of one network instance.
///
/// `vrf` is the L3VRF name, or `None` for the default instance.
/// `interfaces` are the interfaces of that instance.
pub fn translate_instance(
    vrf: Option<&str>,
    before: &Value,
    leftover: &mut Leftover,
    interfaces: &[VrfInterface],
    ctx: &mut TranslationContext,
) -> Result<Vec<Value>, TranslateError> {
    let processes_path = TreePath::from_keys(&[ROUTER, "ospf"]);
    let Some(processes) = processes_path.lookup(before).and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    let mut out = Vec::new();
    for (idx, ospf) in processes.iter().enumerate() {
        if ospf.text_at(&["vrf"]).as_deref() != vrf {
            continue;
        }
        let path = processes_path.clone().index(idx);
        out.push(translate_process(ospf, &path, before, leftover, interfaces, ctx)?);
    }
    Ok(out)
}

fn translate_process(
    ospf: &Value,
    path: &TreePath,
    before: &Value,
    leftover: &mut Leftover,
    interfaces: &[VrfInterface],
    ctx: &mut TranslationContext,
) -> Result<Value, TranslateError> {
    let id = ospf.child("id").and_then(scalar_text).unwrap_or_default();
    leftover.remove(&path.clone().key("id"));
    leftover.remove(&path.clone().key("vrf"));
    debug!(process = %id, "translating ospf process");

    let mut global = Map::new();
    global::translate_global(&mut global, ospf, path, before, leftover);

    let statements = network_statements(ospf)?;
    let bindings = bind_interfaces(&statements, interfaces);
    let areas = area_list(ospf)?;
    let backbone_present = areas.iter().any(|a| a.id.is_backbone());

    let mut area_entries: Vec<Value> = Vec::new();
    let mut bound_neighbors = BTreeSet::new();
    for source_area in &areas {
        let area = get_or_insert_keyed(
            &mut area_entries,
            "openconfig-network-instance:identifier",
            &source_area.id.to_value(),
            |id| keyed_entry("openconfig-network-instance:identifier", "openconfig-network-instance:config", id),
        );
        area::apply_traffic_eng(area, source_area.id, ospf, path, leftover);

        if let Some(index) = source_area.index {
            let source = &ospf.list("area")[index];
            let source_path = path.clone().key("area").index(index);
            area::apply_virtual_links(area, source, &source_path, leftover);
            area::apply_stub_options(area, source_area.id, source, &source_path, &id, leftover, ctx);
            if backbone_present && !source_area.id.is_backbone() {
                if let Some(policy) =
                    area::inter_area_policy(source_area.id, source, &source_path, &id, leftover, ctx)
                {
                    ensure_list(
                        ensure_path(&mut global, &["openconfig-network-instance:inter-area-propagation-policies"]),
                        "openconfig-network-instance:inter-area-propagation-policy",
                    )
                    .push(policy);
                }
            }
            consume_area_if_done(&source_path, leftover);
        }

        for binding in bindings.iter().filter(|b| b.area == source_area.id) {
            let neighbors: Vec<usize> = interface::neighbors_in_subnet(binding.interface, ospf)
                .into_iter()
                .filter(|idx| bound_neighbors.insert(*idx))
                .collect();
            let entry = interface::translate_interface(
                binding.interface,
                ospf,
                path,
                before,
                leftover,
                ctx,
                &neighbors,
            );
            ensure_list(
                ensure_path(area, &["openconfig-network-instance:interfaces"]),
                "openconfig-network-instance:interface",
            )
            .push(entry);
            leftover.remove(&path.clone().key("network").index(binding.statement));
        }
    }

    leftover.remove_if_consumed(&path.clone().keys(&["passive-interface", "interface"]));
    for (idx, neighbor) in ospf.list("neighbor").iter().enumerate() {
        if !bound_neighbors.contains(&idx) {
            ctx.note(
                FEATURE,
                &id,
                format!("neighbor {}", neighbor.text_at(&["ip"]).unwrap_or_default()),
                "neighbor address is not inside any OSPF interface subnet",
            );
        }
    }

    global::translate_timers(&mut global, ospf, path, &id, leftover)?;

    Ok(json!({
        "openconfig-network-instance:identifier": "OSPF",
        "openconfig-network-instance:name": id,
        "openconfig-network-instance:config": {
            "openconfig-network-instance:identifier": "OSPF",
            "openconfig-network-instance:name": id,
            "openconfig-network-instance:enabled": true,
        },
        "openconfig-network-instance:ospfv2": {
            "openconfig-network-instance:global": global,
            "openconfig-network-instance:areas": {
                "openconfig-network-instance:area": area_entries,
            },
        },
    }))
}

/// Tombstone an `area` entry once nothing but its id is left.
fn consume_area_if_done(source_path: &TreePath, leftover: &mut Leftover) {
    let done = leftover
        .get(source_path)
        .and_then(Value::as_object)
        .is_some_and(|area| area.keys().all(|k| k == "id"));
    if done {
        leftover.remove(source_path);
    }
}

