//! IOS-XE `router bgp` to the OpenConfig BGP protocol of the default
//! network instance.

pub mod peer;


use config_tree_core::tree::scalar_text;
use config_tree_core::{Leftover, TreeNode, TreePath};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::context::TranslationContext;
use crate::error::TranslateError;

use peer::{translate_peer, PeerKind};

pub const FEATURE: &str = "bgp";
const NI: &str = "openconfig-network-instance";

fn oc(leaf: &str) -> String {
    format!("{NI}:{leaf}")
}

/// Translate the BGP process into a protocol entry.
///
/// Returns `None` when the device runs no BGP. A process without an AS
/// number is skipped entirely and noted, since neighbors and peer-groups
/// cannot be placed without one.
pub fn translate(
    before: &Value,
    leftover: &mut Leftover,
    ctx: &mut TranslationContext,
) -> Result<Option<Value>, TranslateError> {
    let path = TreePath::from_keys(&["tailf-ned-cisco-ios:router", "bgp"]).index(0);
    let Some(bgp) = path.lookup(before) else {
        return Ok(None);
    };
    let Some(asn) = bgp.child("as-no").filter(|asn| scalar_text(asn).is_some()) else {
        ctx.note(
            FEATURE,
            "router bgp",
            bgp.to_string(),
            "BGP process has no AS number; neighbors and peer-groups were not translated",
        );
        return Ok(None);
    };
    let name = scalar_text(asn).unwrap_or_default();
    debug!(asn = %name, "translating bgp process");
    leftover.remove(&path.clone().key("as-no"));

    let mut protocol = Map::new();
    protocol.insert(oc("global"), translate_global(asn, bgp, &path, before, leftover));

    let neighbors: Vec<Value> = bgp
        .list("neighbor")
        .iter()
        .enumerate()
        .map(|(idx, neighbor)| {
            let neighbor_path = path.clone().key("neighbor").index(idx);
            translate_peer(PeerKind::Neighbor, neighbor, &neighbor_path, before, leftover, ctx)
        })
        .collect();
    leftover.remove_if_consumed(&path.clone().key("neighbor"));

    let groups_path = path.clone().keys(&["neighbor-tag", "neighbor"]);
    let mut peer_groups = Vec::new();
    for (idx, group) in bgp
        .child("neighbor-tag")
        .map(|tag| tag.list("neighbor"))
        .unwrap_or(&[])
        .iter()
        .enumerate()
    {
        if !group.has("peer-group") {
            continue;
        }
        let group_path = groups_path.clone().index(idx);
        peer_groups.push(translate_peer(PeerKind::PeerGroup, group, &group_path, before, leftover, ctx));
    }
    leftover.remove_if_consumed(&groups_path);
    leftover.remove_if_consumed(&path.clone().key("neighbor-tag"));

    if leftover.get(&path).and_then(Value::as_object).is_some_and(Map::is_empty) {
        leftover.remove(&path);
        leftover.remove_if_consumed(&TreePath::from_keys(&["tailf-ned-cisco-ios:router", "bgp"]));
    }

    protocol.insert(oc("neighbors"), json!({ oc("neighbor"): neighbors }));
    protocol.insert(oc("peer-groups"), json!({ oc("peer-group"): peer_groups }));

    Ok(Some(json!({
        oc("identifier"): "BGP",
        oc("name"): name,
        oc("config"): {
            oc("identifier"): "BGP",
            oc("name"): name,
            oc("enabled"): true,
        },
        oc("bgp"): protocol,
    })))
}

fn translate_global(
    asn: &Value,
    bgp: &Value,
    path: &TreePath,
    before: &Value,
    leftover: &mut Leftover,
) -> Value {
    let settings = path.clone().key("bgp");
    let mut global = Map::new();

    let mut config = Map::new();
    config.insert(oc("as"), asn.clone());
    if let Some(router_id) = leftover.take_text(before, &settings.clone().key("router-id")) {
        config.insert(oc("router-id"), json!(router_id));
    }
    global.insert(oc("config"), Value::Object(config));

    // A distance needs both external and internal values; `local` has no
    // OpenConfig leaf and stays behind.
    let distance = path.clone().keys(&["distance", "bgp"]);
    if let (Some(external), Some(internal)) = (
        bgp.child_at(&["distance", "bgp", "extern-as"]),
        bgp.child_at(&["distance", "bgp", "internal-as"]),
    ) {
        global.insert(
            oc("default-route-distance"),
            json!({ oc("config"): {
                oc("external-route-distance"): external,
                oc("internal-route-distance"): internal,
            }}),
        );
        leftover.remove(&distance.clone().key("extern-as"));
        leftover.remove(&distance.clone().key("internal-as"));
        leftover.remove_if_consumed(&distance);
        leftover.remove_if_consumed(&path.clone().key("distance"));
    }

    let restart = settings.clone().keys(&["graceful-restart-conf", "graceful-restart"]);
    let mut graceful = Map::new();
    graceful.insert(
        oc("enabled"),
        json!(leftover.take_flag(before, &settings.clone().key("graceful-restart"))),
    );
    if let Some(time) = leftover.take(before, &restart.clone().key("restart-time")) {
        graceful.insert(oc("restart-time"), time);
    }
    if let Some(time) = leftover.take(before, &restart.clone().key("stalepath-time")) {
        graceful.insert(oc("stale-routes-time"), time);
    }
    leftover.remove_if_consumed(&restart);
    leftover.remove_if_consumed(&settings.clone().key("graceful-restart-conf"));
    global.insert(oc("graceful-restart"), json!({ oc("config"): graceful }));

    let bestpath = settings.clone().key("bestpath");
    global.insert(
        oc("route-selection-options"),
        json!({ oc("config"): {
            oc("always-compare-med"):
                leftover.take_flag(before, &settings.clone().key("always-compare-med")),
            oc("external-compare-router-id"):
                leftover.take_flag(before, &bestpath.clone().key("compare-routerid")),
        }}),
    );

    let mut ebgp = Map::new();
    if let Some(paths) = leftover.take(
        before,
        &path.clone().keys(&["maximum-paths", "paths", "number-of-paths"]),
    ) {
        ebgp.insert(oc("maximum-paths"), paths);
    }
    let relax = bestpath.clone().keys(&["as-path", "multipath-relax"]);
    let relaxed = leftover.take_flag(before, &relax);
    ebgp.insert(oc("allow-multiple-as"), json!(relaxed));
    let mut ibgp = Map::new();
    if let Some(paths) = leftover.take(
        before,
        &path.clone().keys(&["maximum-paths", "ibgp", "paths", "number-of-paths"]),
    ) {
        ibgp.insert(oc("maximum-paths"), paths);
    }
    for emptied in [
        path.clone().keys(&["maximum-paths", "ibgp", "paths"]),
        path.clone().keys(&["maximum-paths", "ibgp"]),
        path.clone().keys(&["maximum-paths", "paths"]),
        path.clone().key("maximum-paths"),
        bestpath.clone().key("as-path"),
        bestpath,
        settings,
    ] {
        leftover.remove_if_consumed(&emptied);
    }
    let multipath = relaxed || ebgp.contains_key(&oc("maximum-paths")) || !ibgp.is_empty();
    global.insert(
        oc("use-multiple-paths"),
        json!({
            oc("config"): { oc("enabled"): multipath },
            oc("ebgp"): { oc("config"): ebgp },
            oc("ibgp"): { oc("config"): ibgp },
        }),
    );

    Value::Object(global)
}
