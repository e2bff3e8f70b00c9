//! The settings neighbors and peer-groups have in common.
//!
//! IOS keeps both in the same shape: `neighbor <ip> ...` under the BGP
//! process and `neighbor <tag> peer-group` under `neighbor-tag`. One
//! translator handles both, parameterized by [`PeerKind`].

use config_tree_core::tree::scalar_text;
use config_tree_core::{Leftover, TreeNode, TreePath};
use serde_json::{json, Map, Value};

use super::FEATURE;
use crate::context::TranslationContext;

const NI: &str = "openconfig-network-instance";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerKind {
    Neighbor,
    PeerGroup,
}

impl PeerKind {
    /// The OpenConfig list key for this kind of peer.
    pub fn key(self) -> &'static str {
        match self {
            PeerKind::Neighbor => "openconfig-network-instance:neighbor-address",
            PeerKind::PeerGroup => "openconfig-network-instance:peer-group-name",
        }
    }
}

fn oc(leaf: &str) -> String {
    format!("{NI}:{leaf}")
}

/// Translate one peer and consume what was mapped.
///
/// A peer is tombstoned once nothing but its identifier is left behind.
pub fn translate_peer(
    kind: PeerKind,
    peer: &Value,
    path: &TreePath,
    before: &Value,
    leftover: &mut Leftover,
    ctx: &mut TranslationContext,
) -> Value {
    let id = peer.child("id").cloned().unwrap_or(Value::Null);
    let field = |key: &str| path.clone().key(key);

    let mut entry = Map::new();
    entry.insert(kind.key().into(), id.clone());

    let mut config = Map::new();
    config.insert(kind.key().into(), id);
    if kind == PeerKind::PeerGroup {
        leftover.remove(&field("peer-group"));
    }
    if let Some(remote_as) = leftover.take(before, &field("remote-as")) {
        config.insert(oc("peer-as"), remote_as);
    }
    if let Some(password) = peer.child("password") {
        // Only type 0 keys are clear text; an encrypted key would be passed
        // on as if it were the password.
        match password.child("enc").and_then(scalar_text) {
            Some(enc) if enc != "0" => {
                let subject = peer.child("id").and_then(scalar_text).unwrap_or_default();
                ctx.note(
                    FEATURE,
                    subject,
                    format!("password {enc} <key>"),
                    format!("password with encryption type {enc} cannot be sent as auth-password"),
                );
            }
            _ => {
                if let Some(text) = leftover.take_text(before, &field("password").key("text")) {
                    config.insert(oc("auth-password"), json!(text));
                    leftover.remove(&field("password").key("enc"));
                    leftover.remove_if_consumed(&field("password"));
                }
            }
        }
    }
    if let Some(description) = leftover.take(before, &field("description")) {
        config.insert(oc("description"), description);
    }
    config.insert(oc("enabled"), json!(!leftover.take_flag(before, &field("shutdown"))));
    if let Some(local_as) = leftover.take(before, &field("local-as").key("as-no")) {
        config.insert(oc("local-as"), local_as);
        leftover.remove_if_consumed(&field("local-as"));
    }
    if kind == PeerKind::Neighbor {
        if let Some(group) = peer.child("peer-group").filter(|g| g.is_string()) {
            config.insert(oc("peer-group"), group.clone());
            leftover.remove(&field("peer-group"));
        }
    }
    if let Some(mode) = remove_private_as(peer.child("remove-private-as")) {
        config.insert(oc("remove-private-as"), json!(mode));
        leftover.remove(&field("remove-private-as"));
    }
    if let Some(community) = peer.child("send-community") {
        let target = match community.text_at(&["send-community-where"]).as_deref() {
            Some("extended") => "EXTENDED",
            Some("both") => "BOTH",
            _ => "STANDARD",
        };
        config.insert(oc("send-community"), json!(target));
        leftover.remove(&field("send-community"));
    }
    entry.insert(oc("config"), Value::Object(config));

    if let Some(multihop) = peer.child("ebgp-multihop") {
        let mut multihop_config = Map::new();
        multihop_config.insert(oc("enabled"), json!(true));
        if let Some(ttl) = multihop.child("max-hop") {
            multihop_config.insert(oc("multihop-ttl"), ttl.clone());
        }
        entry.insert(
            oc("ebgp-multihop"),
            json!({ oc("config"): multihop_config }),
        );
        leftover.remove(&field("ebgp-multihop"));
    }

    let mut reflector = Map::new();
    if leftover.take_flag(before, &field("route-reflector-client")) {
        reflector.insert(oc("route-reflector-client"), json!(true));
    }
    if let Some(cluster) = leftover.take(before, &field("cluster-id")) {
        reflector.insert(oc("route-reflector-cluster-id"), cluster);
    }
    if !reflector.is_empty() {
        entry.insert(oc("route-reflector"), json!({ oc("config"): reflector }));
    }

    if let (Some(hold), Some(keepalive)) = (
        peer.child_at(&["timers", "holdtime"]),
        peer.child_at(&["timers", "keepalive-interval"]),
    ) {
        entry.insert(
            oc("timers"),
            json!({ oc("config"): {
                oc("hold-time"): hold,
                oc("keepalive-interval"): keepalive,
            }}),
        );
        leftover.remove(&field("timers"));
    }

    let transport = translate_transport(peer, path, leftover);
    if !transport.is_empty() {
        entry.insert(oc("transport"), json!({ oc("config"): transport }));
    }

    let done = leftover
        .get(path)
        .and_then(Value::as_object)
        .is_some_and(|rest| rest.keys().all(|k| k == "id"));
    if done {
        leftover.remove(path);
    }
    Value::Object(entry)
}

fn remove_private_as(option: Option<&Value>) -> Option<&'static str> {
    let option = option?;
    if !option.has("all") {
        return None;
    }
    Some(if option.has("replace-as") {
        "openconfig-bgp-types:PRIVATE_AS_REPLACE_ALL"
    } else {
        "openconfig-bgp-types:PRIVATE_AS_REMOVE_ALL"
    })
}

fn translate_transport(
    peer: &Value,
    path: &TreePath,
    leftover: &mut Leftover,
) -> Map<String, Value> {
    let transport = path.clone().key("transport");
    let mut config = Map::new();
    if let Some(discovery) = peer.child_at(&["transport", "path-mtu-discovery"]) {
        config.insert(oc("mtu-discovery"), json!(!discovery.has("disable")));
        leftover.remove(&transport.clone().key("path-mtu-discovery"));
    }
    if peer.text_at(&["transport", "connection-mode"]).as_deref() == Some("passive") {
        config.insert(oc("passive-mode"), json!(true));
        leftover.remove(&transport.clone().key("connection-mode"));
    }
    leftover.remove_if_consumed(&transport);

    // update-source holds a single `{<type>: <number>}` pair.
    let source = peer
        .child("update-source")
        .and_then(Value::as_object)
        .filter(|source| source.len() == 1)
        .and_then(|source| source.iter().next());
    if let Some((kind, number)) = source {
        if let Some(number) = scalar_text(number) {
            config.insert(oc("local-address"), json!(format!("{kind}{number}")));
            leftover.remove(&path.clone().key("update-source"));
        }
    }
    config
}
