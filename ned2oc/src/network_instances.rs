//! The `openconfig-network-instance:network-instances` tree.
//!
//! The default instance always exists. Every `vrf definition` adds an
//! L3VRF instance holding the interfaces forwarding into it. Routing
//! protocols are attached per instance: OSPF processes by their `vrf` tag
//! and BGP to the default instance only.

use config_tree_core::{Leftover, TreeNode, TreePath};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::context::TranslationContext;
use crate::error::TranslateError;
use crate::interfaces::{vrf_interfaces, VrfInterface};
use crate::{bgp, ospf};

pub(crate) const NETWORK_INSTANCES: &str = "openconfig-network-instance:network-instances";
const DEFAULT_INSTANCE: &str = "openconfig-network-instance-types:DEFAULT_INSTANCE";
const L3VRF: &str = "openconfig-network-instance-types:L3VRF";
const NI: &str = "openconfig-network-instance";

fn oc(leaf: &str) -> String {
    format!("{NI}:{leaf}")
}

pub fn translate(
    before: &Value,
    leftover: &mut Leftover,
    ctx: &mut TranslationContext,
) -> Result<Value, TranslateError> {
    let interfaces = vrf_interfaces(before);

    let global: Vec<VrfInterface> = interfaces.iter().filter(|i| i.vrf.is_none()).cloned().collect();
    let mut protocols = ospf::translate_instance(None, before, leftover, &global, ctx)?;
    if let Some(bgp) = bgp::translate(before, leftover, ctx)? {
        protocols.push(bgp);
    }
    let mut instances = vec![instance("default", DEFAULT_INSTANCE, Map::new(), Vec::new(), protocols)];

    let definitions = TreePath::from_keys(&["tailf-ned-cisco-ios:vrf", "definition"]);
    let listed = definitions
        .lookup(before)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    let mut defined = Vec::new();
    for (idx, definition) in listed.iter().enumerate() {
        let Some(name) = definition.text_at(&["name"]) else {
            continue;
        };
        defined.push(name.clone());
        debug!(vrf = %name, "translating vrf");
        let path = definitions.clone().index(idx);

        let mut config = Map::new();
        if let Some(rd) = leftover.take_text(before, &path.clone().key("rd")) {
            config.insert(oc("route-distinguisher"), json!(rd));
        }
        if let Some(description) = leftover.take(before, &path.clone().key("description")) {
            config.insert(oc("description"), description);
        }

        let members: Vec<VrfInterface> = interfaces
            .iter()
            .filter(|i| i.vrf.as_deref() == Some(name.as_str()))
            .cloned()
            .collect();
        let entries = members
            .iter()
            .map(|intf| {
                leftover.remove(&intf.path.clone().keys(&["vrf", "forwarding"]));
                leftover.remove_if_consumed(&intf.path.clone().key("vrf"));
                interface_entry(intf)
            })
            .collect();
        let protocols = ospf::translate_instance(Some(name.as_str()), before, leftover, &members, ctx)?;

        if leftover
            .get(&path)
            .and_then(Value::as_object)
            .is_some_and(|rest| rest.keys().all(|k| k == "name"))
        {
            leftover.remove(&path);
        }
        instances.push(instance(&name, L3VRF, config, entries, protocols));
    }
    leftover.remove_if_consumed(&definitions);
    leftover.remove_if_consumed(&TreePath::from_keys(&["tailf-ned-cisco-ios:vrf"]));
    note_undefined_vrf_processes(before, &defined, ctx);

    Ok(json!({
        NETWORK_INSTANCES: {
            oc("network-instance"): instances,
        }
    }))
}

/// OSPF processes tagged with a VRF that has no definition are never
/// translated.
fn note_undefined_vrf_processes(before: &Value, defined: &[String], ctx: &mut TranslationContext) {
    let processes = before
        .child_at(&["tailf-ned-cisco-ios:router"])
        .map(|router| router.list("ospf"))
        .unwrap_or(&[]);
    for process in processes {
        let Some(vrf) = process.text_at(&["vrf"]) else {
            continue;
        };
        if defined.contains(&vrf) {
            continue;
        }
        let id = process.text_at(&["id"]).unwrap_or_default();
        ctx.note(
            ospf::FEATURE,
            &id,
            format!("router ospf {id} vrf {vrf}"),
            format!("vrf {vrf} has no definition"),
        );
    }
}

fn instance(
    name: &str,
    kind: &str,
    extra: Map<String, Value>,
    interfaces: Vec<Value>,
    protocols: Vec<Value>,
) -> Value {
    let mut config = Map::new();
    config.insert(oc("name"), json!(name));
    config.insert(oc("type"), json!(kind));
    config.extend(extra);

    let mut entry = Map::new();
    entry.insert(oc("name"), json!(name));
    entry.insert(oc("config"), Value::Object(config));
    if !interfaces.is_empty() {
        entry.insert(oc("interfaces"), json!({ oc("interface"): interfaces }));
    }
    entry.insert(oc("protocols"), json!({ oc("protocol"): protocols }));
    Value::Object(entry)
}

fn interface_entry(intf: &VrfInterface) -> Value {
    let id = intf.full_name();
    let (interface, subinterface) = intf.interface_ref();
    json!({
        oc("id"): id,
        oc("config"): {
            oc("id"): id,
            oc("interface"): interface,
            oc("subinterface"): subinterface,
        }
    })
}

#[cfg(test)]
mod tests {
    use config_tree_core::Leftover;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    use super::translate;
    use crate::context::TranslationContext;

    fn instances(out: &Value) -> &Vec<Value> {
        out["openconfig-network-instance:network-instances"]["openconfig-network-instance:network-instance"]
            .as_array()
            .expect("instance list")
    }

    #[test]
    fn default_instance_always_exists() {
        let before = json!({});
        let mut leftover = Leftover::new(&before);
        let mut ctx = TranslationContext::default();

        let out = translate(&before, &mut leftover, &mut ctx).expect("translate");

        assert_eq!(
            instances(&out),
            &vec![json!({
                "openconfig-network-instance:name": "default",
                "openconfig-network-instance:config": {
                    "openconfig-network-instance:name": "default",
                    "openconfig-network-instance:type": "openconfig-network-instance-types:DEFAULT_INSTANCE"
                },
                "openconfig-network-instance:protocols": {"openconfig-network-instance:protocol": []}
            })]
        );
    }

    #[test]
    fn vrf_gets_interfaces_and_its_own_ospf_process() {
        let before = json!({
            "tailf-ned-cisco-ios:vrf": {"definition": [{"name": "blue", "rd": "65000:1"}]},
            "tailf-ned-cisco-ios:interface": {"GigabitEthernet": [{
                "name": "0/1.100",
                "vrf": {"forwarding": "blue"},
                "ip": {"address": {"primary": {"address": "10.1.1.1", "mask": "255.255.255.0"}}}
            }]},
            "tailf-ned-cisco-ios:router": {"ospf": [{
                "id": 10,
                "vrf": "blue",
                "network": [{"ip": "10.1.1.0", "mask": "0.0.0.255", "area": 0}]
            }]}
        });
        let mut leftover = Leftover::new(&before);
        let mut ctx = TranslationContext::default();

        let out = translate(&before, &mut leftover, &mut ctx).expect("translate");
        let instances = instances(&out);

        assert_eq!(instances.len(), 2);
        assert_eq!(
            instances[0]["openconfig-network-instance:protocols"]["openconfig-network-instance:protocol"],
            json!([])
        );
        let blue = &instances[1];
        assert_eq!(
            blue["openconfig-network-instance:config"],
            json!({
                "openconfig-network-instance:name": "blue",
                "openconfig-network-instance:type": "openconfig-network-instance-types:L3VRF",
                "openconfig-network-instance:route-distinguisher": "65000:1"
            })
        );
        assert_eq!(
            blue["openconfig-network-instance:interfaces"]["openconfig-network-instance:interface"][0]
                ["openconfig-network-instance:config"],
            json!({
                "openconfig-network-instance:id": "GigabitEthernet0/1.100",
                "openconfig-network-instance:interface": "GigabitEthernet0/1",
                "openconfig-network-instance:subinterface": 100
            })
        );
        let ospf = &blue["openconfig-network-instance:protocols"]["openconfig-network-instance:protocol"][0];
        assert_eq!(ospf["openconfig-network-instance:name"], json!("10"));

        assert_eq!(
            leftover.compact(),
            json!({
                "tailf-ned-cisco-ios:interface": {"GigabitEthernet": [{
                    "name": "0/1.100",
                    "ip": {"address": {"primary": {"address": "10.1.1.1", "mask": "255.255.255.0"}}}
                }]}
            })
        );
    }

    #[test]
    fn ospf_process_in_undefined_vrf_is_noted() {
        let before = json!({
            "tailf-ned-cisco-ios:router": {"ospf": [
                {"id": 1, "router-id": "1.1.1.1"},
                {"id": 20, "vrf": "red", "router-id": "2.2.2.2"}
            ]}
        });
        let mut leftover = Leftover::new(&before);
        let mut ctx = TranslationContext::default();

        let out = translate(&before, &mut leftover, &mut ctx).expect("translate");

        assert_eq!(instances(&out).len(), 1);
        assert_eq!(ctx.notes.len(), 1);
        let note = ctx.notes.iter().next().expect("note");
        assert_eq!(note.feature, "ospf");
        assert_eq!(note.subject, "20");
        assert_eq!(note.original, "router ospf 20 vrf red");
        assert_eq!(
            leftover.compact(),
            json!({"tailf-ned-cisco-ios:router": {"ospf": [
                {"id": 20, "vrf": "red", "router-id": "2.2.2.2"}
            ]}})
        );
    }
}
