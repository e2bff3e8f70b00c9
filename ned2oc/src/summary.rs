use config_tree_core::TreeNode;
use serde::Serialize;
use serde_json::Value;

use crate::notes::Notes;
use crate::translate::{DeviceTranslation, Feature};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TranslationSummary {
    pub acl_sets: usize,
    pub acl_entries: usize,
    pub acl_interfaces: usize,
    pub network_instances: usize,
    pub ospf_processes: usize,
    pub ospf_areas: usize,
    pub bgp_neighbors: usize,
    pub bgp_peer_groups: usize,
    pub consumed: usize,
    pub notes: usize,
}

pub fn summarize(device: &DeviceTranslation, notes: &Notes) -> TranslationSummary {
    let mut summary = TranslationSummary {
        notes: notes.len(),
        ..TranslationSummary::default()
    };
    for translation in &device.features {
        summary.consumed += translation.leftover.consumed().len();
        let oc = &translation.openconfig;
        match translation.feature {
            Feature::Acl => {
                let acl = oc.child("openconfig-acl:acl");
                let sets = acl
                    .and_then(|a| a.child("openconfig-acl:acl-sets"))
                    .map(|s| s.list("openconfig-acl:acl-set"))
                    .unwrap_or(&[]);
                summary.acl_sets = sets.len();
                summary.acl_entries = sets
                    .iter()
                    .map(|set| {
                        set.child("openconfig-acl:acl-entries")
                            .map(|e| e.list("openconfig-acl:acl-entry").len())
                            .unwrap_or(0)
                    })
                    .sum();
                summary.acl_interfaces = acl
                    .and_then(|a| a.child("openconfig-acl:interfaces"))
                    .map(|i| i.list("openconfig-acl:interface").len())
                    .unwrap_or(0);
            }
            Feature::NetworkInstances => count_instances(oc, &mut summary),
        }
    }
    summary
}

pub fn render(summary: TranslationSummary) -> String {
    format!(
        "translate_summary acl_sets={} acl_entries={} acl_interfaces={} network_instances={} ospf_processes={} ospf_areas={} bgp_neighbors={} bgp_peer_groups={} consumed={} notes={}",
        summary.acl_sets,
        summary.acl_entries,
        summary.acl_interfaces,
        summary.network_instances,
        summary.ospf_processes,
        summary.ospf_areas,
        summary.bgp_neighbors,
        summary.bgp_peer_groups,
        summary.consumed,
        summary.notes
    )
}

fn ni(leaf: &str) -> String {
    format!("openconfig-network-instance:{leaf}")
}

fn count_instances(oc: &Value, summary: &mut TranslationSummary) {
    let instances = oc
        .child(&ni("network-instances"))
        .map(|n| n.list(&ni("network-instance")))
        .unwrap_or(&[]);
    summary.network_instances = instances.len();

    let protocols = instances.iter().flat_map(|instance| {
        instance
            .child(&ni("protocols"))
            .map(|p| p.list(&ni("protocol")))
            .unwrap_or(&[])
    });
    for protocol in protocols {
        if let Some(ospf) = protocol.child(&ni("ospfv2")) {
            summary.ospf_processes += 1;
            summary.ospf_areas += ospf
                .child(&ni("areas"))
                .map(|a| a.list(&ni("area")).len())
                .unwrap_or(0);
        }
        if let Some(bgp) = protocol.child(&ni("bgp")) {
            summary.bgp_neighbors += bgp
                .child(&ni("neighbors"))
                .map(|n| n.list(&ni("neighbor")).len())
                .unwrap_or(0);
            summary.bgp_peer_groups += bgp
                .child(&ni("peer-groups"))
                .map(|g| g.list(&ni("peer-group")).len())
                .unwrap_or(0);
        }
    }
}
