//! Binding interfaces to areas through `network <ip> <wildcard> area <id>`.
//!
//! Wildcard masks work as in access lists: set bits are ignored. Statements
//! are tried from most to least specific (smallest mask first) and the first
//! statement covering an interface address claims it.

use std::net::Ipv4Addr;

use config_tree_core::TreeNode;
use serde_json::Value;

use super::area::AreaId;
use crate::error::TranslateError;
use crate::interfaces::VrfInterface;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkStatement {
    /// Index into the process `network` list.
    pub index: usize,
    pub ip: Ipv4Addr,
    pub wildcard: Option<Ipv4Addr>,
    pub area: AreaId,
}

/// An interface claimed by a network statement.
#[derive(Debug, Clone, Copy)]
pub struct Binding<'a> {
    pub statement: usize,
    pub area: AreaId,
    pub interface: &'a VrfInterface,
}

/// Decode the process `network` list.
///
/// A wildcard that is not a dotted quad is fatal. A statement without an
/// area belongs to the backbone.
pub fn network_statements(ospf: &Value) -> Result<Vec<NetworkStatement>, TranslateError> {
    let mut out = Vec::new();
    for (index, stmt) in ospf.list("network").iter().enumerate() {
        let ip_text = stmt.text_at(&["ip"]).unwrap_or_default();
        let wildcard = match stmt.text_at(&["mask"]) {
            Some(mask) => Some(mask.parse::<Ipv4Addr>().map_err(|_| {
                TranslateError::InvalidMask {
                    ip: ip_text.clone(),
                    mask: mask.clone(),
                }
            })?),
            None => None,
        };
        let ip = ip_text
            .parse::<Ipv4Addr>()
            .map_err(|_| TranslateError::Malformed {
                path: format!("network[{index}].ip"),
                reason: format!("{ip_text:?} is not an IPv4 address"),
            })?;
        let area = match stmt.child("area") {
            Some(raw) => AreaId::parse(raw)?,
            None => AreaId::BACKBONE,
        };
        out.push(NetworkStatement {
            index,
            ip,
            wildcard,
            area,
        });
    }
    Ok(out)
}

/// Order statements by wildcard, octet by octet, smallest first.
///
/// Statements without a wildcard sort last. Ties keep source order.
pub fn sort_statements(statements: &mut [NetworkStatement]) {
    statements.sort_by_key(|s| (s.wildcard.is_none(), s.wildcard.map(u32::from)));
}

/// Assign each interface to the first matching statement.
///
/// A statement matches when `ip | wildcard == address | wildcard`. A
/// statement without a wildcard only matches its exact address.
pub fn bind_interfaces<'a>(
    statements: &[NetworkStatement],
    interfaces: &'a [VrfInterface],
) -> Vec<Binding<'a>> {
    let mut sorted = statements.to_vec();
    sort_statements(&mut sorted);

    let mut claimed = vec![false; interfaces.len()];
    let mut out = Vec::new();
    for stmt in &sorted {
        let wildcard = stmt.wildcard.map(u32::from).unwrap_or(0);
        let target = u32::from(stmt.ip) | wildcard;
        for (idx, intf) in interfaces.iter().enumerate() {
            if claimed[idx] {
                continue;
            }
            let Ok(address) = intf.address.parse::<Ipv4Addr>() else {
                continue;
            };
            if u32::from(address) | wildcard == target {
                claimed[idx] = true;
                out.push(Binding {
                    statement: stmt.index,
                    area: stmt.area,
                    interface: intf,
                });
            }
        }
    }
    out
}

/// Whether `neighbor` lies in the primary subnet of `intf`.
pub fn subnet_contains(intf: &VrfInterface, neighbor: &str) -> bool {
    let (Ok(address), Ok(mask), Ok(neighbor)) = (
        intf.address.parse::<Ipv4Addr>(),
        intf.mask.parse::<Ipv4Addr>(),
        neighbor.parse::<Ipv4Addr>(),
    ) else {
        return false;
    };
    let mask = u32::from(mask);
    u32::from(address) & mask == u32::from(neighbor) & mask
}
