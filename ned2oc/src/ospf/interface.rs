use config_tree_core::tree::scalar_text;
use config_tree_core::{Leftover, TreeNode, TreePath};
use serde_json::{json, Map, Value};

use super::network::subnet_contains;
use crate::context::TranslationContext;
use crate::interfaces::VrfInterface;

/// Per-interface OSPF settings for an interface claimed by an area.
///
/// `neighbors` holds the indices of the process `neighbor` entries that
/// fall inside this interface's subnet; they are consumed here.
pub fn translate_interface(
    intf: &VrfInterface,
    ospf: &Value,
    process: &TreePath,
    before: &Value,
    leftover: &mut Leftover,
    ctx: &TranslationContext,
    neighbors: &[usize],
) -> Value {
    let name = intf.full_name();
    let ospf_path = intf.path.clone().keys(&["ip", "ospf"]);
    let field = |key: &str| ospf_path.clone().key(key);

    let mut config = Map::new();
    config.insert("openconfig-network-instance:id".into(), json!(name));

    let network_type = field("network")
        .lookup(before)
        .and_then(|network| match network {
            Value::Array(items) => items.first().and_then(scalar_text),
            other => scalar_text(other),
        })
        .and_then(|raw| ctx.mappings.ospf_network_type(&raw));
    if let Some(network_type) = network_type {
        config.insert(
            "openconfig-network-instance:network-type".into(),
            json!(network_type),
        );
        leftover.remove(&field("network"));
    }
    if let Some(cost) = leftover.take(before, &field("cost")) {
        config.insert("openconfig-network-instance:metric".into(), cost);
    }
    if let Some(passive) = passive(&name, ospf, process, leftover) {
        config.insert("openconfig-network-instance:passive".into(), json!(passive));
    }
    if let Some(priority) = leftover.take(before, &field("priority")) {
        config.insert("openconfig-network-instance:priority".into(), priority);
    }
    let bfd = leftover.take_flag(before, &field("bfd"));

    let mut timers = Map::new();
    if let Some(hello) = leftover.take(before, &field("hello-interval")) {
        timers.insert("openconfig-network-instance:hello-interval".into(), hello);
    }
    if let Some(retransmit) = leftover.take(before, &field("retransmit-interval")) {
        timers.insert(
            "openconfig-network-instance:retransmission-interval".into(),
            retransmit,
        );
    }
    if let Some(dead) = field("dead-interval").lookup(before).and_then(|d| d.child("seconds")) {
        timers.insert("openconfig-network-instance:dead-interval".into(), dead.clone());
        leftover.remove(&field("dead-interval"));
    }

    let neighbor_list: Vec<Value> = neighbors
        .iter()
        .filter_map(|&idx| {
            let neighbor = ospf.list("neighbor").get(idx)?;
            leftover.remove(&process.clone().key("neighbor").index(idx));
            Some(neighbor_entry(neighbor))
        })
        .collect();

    json!({
        "openconfig-network-instance:id": name,
        "openconfig-network-instance:config": config,
        "openconfig-network-instance:enable-bfd": {
            "openconfig-network-instance:config": {"openconfig-network-instance:enabled": bfd}
        },
        "openconfig-network-instance:neighbors": {
            "openconfig-network-instance:neighbor": neighbor_list
        },
        "openconfig-network-instance:timers": {
            "openconfig-network-instance:config": timers
        },
    })
}

/// True if the interface is listed under `passive-interface`, false if
/// that list exists without it, and unset when there is no list.
fn passive(name: &str, ospf: &Value, process: &TreePath, leftover: &mut Leftover) -> Option<bool> {
    let listed = ospf.child("passive-interface")?.list("interface");
    match listed
        .iter()
        .position(|p| p.text_at(&["name"]).as_deref() == Some(name))
    {
        Some(idx) => {
            leftover.remove(&process.clone().keys(&["passive-interface", "interface"]).index(idx));
            Some(true)
        }
        None if ospf.child_at(&["passive-interface", "interface"]).is_some() => Some(false),
        None => None,
    }
}

fn neighbor_entry(neighbor: &Value) -> Value {
    let address = neighbor.text_at(&["ip"]).unwrap_or_default();
    let mut config = Map::new();
    config.insert("openconfig-network-instance:router-id".into(), json!(address));
    if let Some(cost) = neighbor.child_at(&["cost-database-filter-container", "cost"]) {
        config.insert("openconfig-network-instance:metric".into(), cost.clone());
    }
    json!({
        "openconfig-network-instance:router-id": address,
        "openconfig-network-instance:config": config,
    })
}

/// Indices of process neighbors inside the subnet of `intf`.
pub fn neighbors_in_subnet(intf: &VrfInterface, ospf: &Value) -> Vec<usize> {
    ospf.list("neighbor")
        .iter()
        .enumerate()
        .filter(|(_, n)| {
            n.text_at(&["ip"])
                .is_some_and(|ip| subnet_contains(intf, &ip))
        })
        .map(|(idx, _)| idx)
        .collect()
}
