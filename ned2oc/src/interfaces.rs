//! Walking the NED interface container.
//!
//! Interfaces live under `tailf-ned-cisco-ios:interface` as one list per
//! interface type. Port-channel subinterfaces are the exception: they nest a
//! `Port-channel` list under `Port-channel-subinterface`.

use config_tree_core::tree::scalar_text;
use config_tree_core::{TreeNode, TreePath};
use serde_json::Value;

pub const INTERFACE: &str = "tailf-ned-cisco-ios:interface";
const PORT_CHANNEL_SUBINTERFACE: &str = "Port-channel-subinterface";
const PORT_CHANNEL: &str = "Port-channel";

/// One interface entry and where it lives in the source tree.
#[derive(Debug, Clone)]
pub struct NedInterface<'a> {
    /// Interface type, e.g. `GigabitEthernet`.
    pub kind: String,
    /// Interface number, e.g. `0/1.100`.
    pub name: String,
    pub node: &'a Value,
    pub path: TreePath,
}

impl NedInterface<'_> {
    /// Full interface name, e.g. `GigabitEthernet0/1.100`.
    pub fn full_name(&self) -> String {
        format!("{}{}", self.kind, self.name)
    }

    /// Parent interface and subinterface index.
    ///
    /// `0/1.100` splits into `<kind>0/1` and 100; names without a `.`
    /// suffix are subinterface 0.
    pub fn interface_ref(&self) -> (String, u32) {
        interface_ref(&self.kind, &self.name)
    }
}

fn interface_ref(kind: &str, name: &str) -> (String, u32) {
    match name.rsplit_once('.') {
        Some((parent, sub)) => (format!("{kind}{parent}"), sub.parse().unwrap_or(0)),
        None => (format!("{kind}{name}"), 0),
    }
}

/// Every interface in the configuration, in source order.
pub fn ned_interfaces(config: &Value) -> Vec<NedInterface<'_>> {
    let Some(types) = config.child(INTERFACE).and_then(Value::as_object) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for (kind, list) in types {
        let (kind, list, base) = if kind == PORT_CHANNEL_SUBINTERFACE {
            (
                PORT_CHANNEL,
                list.list(PORT_CHANNEL),
                TreePath::from_keys(&[INTERFACE, PORT_CHANNEL_SUBINTERFACE, PORT_CHANNEL]),
            )
        } else {
            (
                kind.as_str(),
                list.as_array().map(Vec::as_slice).unwrap_or(&[]),
                TreePath::from_keys(&[INTERFACE, kind.as_str()]),
            )
        };
        for (idx, node) in list.iter().enumerate() {
            let Some(name) = node.child("name").and_then(scalar_text) else {
                continue;
            };
            out.push(NedInterface {
                kind: kind.to_string(),
                name,
                node,
                path: base.clone().index(idx),
            });
        }
    }
    out
}

/// An interface with a primary IPv4 address, as seen by routing protocols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VrfInterface {
    pub kind: String,
    pub name: String,
    pub address: String,
    pub mask: String,
    /// `vrf forwarding` name, absent for the global table.
    pub vrf: Option<String>,
    pub path: TreePath,
}

impl VrfInterface {
    pub fn full_name(&self) -> String {
        format!("{}{}", self.kind, self.name)
    }

    pub fn interface_ref(&self) -> (String, u32) {
        interface_ref(&self.kind, &self.name)
    }
}

/// Interfaces carrying a primary IPv4 address.
pub fn vrf_interfaces(config: &Value) -> Vec<VrfInterface> {
    ned_interfaces(config)
        .into_iter()
        .filter_map(|intf| {
            let address = intf.node.text_at(&["ip", "address", "primary", "address"])?;
            let mask = intf
                .node
                .text_at(&["ip", "address", "primary", "mask"])
                .unwrap_or_else(|| "255.255.255.255".to_string());
            Some(VrfInterface {
                vrf: intf.node.text_at(&["vrf", "forwarding"]),
                kind: intf.kind,
                name: intf.name,
                address,
                mask,
                path: intf.path,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ned_interfaces, vrf_interfaces};

    #[test]
    fn walks_types_and_nested_port_channels() {
        let config = json!({
            "tailf-ned-cisco-ios:interface": {
                "GigabitEthernet": [{"name": "1"}, {"name": "2.10"}],
                "Loopback": [{"name": 0}],
                "Port-channel-subinterface": {"Port-channel": [{"name": "5.20"}]}
            }
        });

        let names: Vec<String> = ned_interfaces(&config)
            .iter()
            .map(|i| i.full_name())
            .collect();
        assert_eq!(
            names,
            vec!["GigabitEthernet1", "GigabitEthernet2.10", "Loopback0", "Port-channel5.20"]
        );

        let port_channel = &ned_interfaces(&config)[3];
        assert_eq!(
            port_channel.path.to_string(),
            "tailf-ned-cisco-ios:interface.Port-channel-subinterface.Port-channel[0]"
        );
        assert_eq!(
            port_channel.interface_ref(),
            ("Port-channel5".to_string(), 20)
        );
    }

    #[test]
    fn subinterface_index_comes_from_dot_suffix() {
        let config = json!({
            "tailf-ned-cisco-ios:interface": {"GigabitEthernet": [{"name": "0/1.100"}, {"name": "0/2"}]}
        });
        let intfs = ned_interfaces(&config);
        assert_eq!(intfs[0].interface_ref(), ("GigabitEthernet0/1".to_string(), 100));
        assert_eq!(intfs[1].interface_ref(), ("GigabitEthernet0/2".to_string(), 0));
    }

    #[test]
    fn vrf_interfaces_need_a_primary_address() {
        let config = json!({
            "tailf-ned-cisco-ios:interface": {
                "GigabitEthernet": [
                    {"name": "1", "vrf": {"forwarding": "blue"},
                     "ip": {"address": {"primary": {"address": "10.1.1.1", "mask": "255.255.255.0"}}}},
                    {"name": "2", "shutdown": [null]}
                ]
            }
        });

        let intfs = vrf_interfaces(&config);
        assert_eq!(intfs.len(), 1);
        assert_eq!(intfs[0].vrf.as_deref(), Some("blue"));
        assert_eq!(intfs[0].mask, "255.255.255.0");
    }
}
