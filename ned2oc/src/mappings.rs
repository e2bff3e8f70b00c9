use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Keyword tables for IOS-XE NED configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XeMappings {
    protocols: BTreeMap<String, String>,
    services: BTreeMap<String, u16>,
    ospf_network_types: BTreeMap<String, String>,
}

impl XeMappings {
    /// OpenConfig protocol identity for an ACL protocol keyword.
    pub fn protocol(&self, name: &str) -> Option<&str> {
        self.protocols.get(name).map(String::as_str)
    }

    /// Port number for an IOS service keyword.
    pub fn service_port(&self, name: &str) -> Option<u16> {
        self.services.get(name).copied()
    }

    /// OpenConfig OSPF network type for an interface `ip ospf network` value.
    pub fn ospf_network_type(&self, name: &str) -> Option<&str> {
        self.ospf_network_types.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.protocols.is_empty() && self.services.is_empty() && self.ospf_network_types.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct NamedIdentity {
    name: String,
    openconfig: String,
}

#[derive(Debug, Deserialize)]
struct Service {
    name: String,
    port: u16,
}

#[derive(Debug, Default, Deserialize)]
struct MappingFile {
    #[serde(default)]
    protocol: Vec<NamedIdentity>,
    #[serde(default)]
    service: Vec<Service>,
    #[serde(default)]
    ospf_network_type: Vec<NamedIdentity>,
}

/// Errors returned when loading mapping files.
#[derive(Debug, Error)]
pub enum MappingLoadError {
    #[error("failed to read mappings file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse mappings file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Load keyword tables from a TOML file.
pub fn load_xe_mappings(path: &Path) -> Result<XeMappings, MappingLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| MappingLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_mappings(&raw, path.display().to_string())
}

/// Built-in keyword tables.
pub fn default_xe_mappings() -> XeMappings {
    let embedded = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/mappings/xe.toml"));
    match parse_mappings(embedded, "embedded mappings".to_string()) {
        Ok(mappings) if !mappings.is_empty() => mappings,
        _ => fallback_xe_mappings(),
    }
}

fn parse_mappings(raw: &str, path: String) -> Result<XeMappings, MappingLoadError> {
    let parsed: MappingFile =
        toml::from_str(raw).map_err(|source| MappingLoadError::Parse { path, source })?;
    Ok(XeMappings {
        protocols: parsed
            .protocol
            .into_iter()
            .map(|p| (p.name, p.openconfig))
            .collect(),
        services: parsed.service.into_iter().map(|s| (s.name, s.port)).collect(),
        ospf_network_types: parsed
            .ospf_network_type
            .into_iter()
            .map(|t| (t.name, t.openconfig))
            .collect(),
    })
}

fn fallback_xe_mappings() -> XeMappings {
    XeMappings {
        protocols: identities(&[
            ("icmp", "IP_ICMP"),
            ("igmp", "IP_IGMP"),
            ("ipnip", "IP_IN_IP"),
            ("tcp", "IP_TCP"),
            ("udp", "IP_UDP"),
            ("gre", "IP_GRE"),
            ("ahp", "IP_AUTH"),
            ("pim", "IP_PIM"),
        ]),
        services: [
            ("ftp-data", 20),
            ("ftp", 21),
            ("ssh", 22),
            ("telnet", 23),
            ("smtp", 25),
            ("domain", 53),
            ("tftp", 69),
            ("www", 80),
            ("pop3", 110),
            ("ntp", 123),
            ("snmp", 161),
            ("bgp", 179),
            ("https", 443),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect(),
        ospf_network_types: identities(&[
            ("broadcast", "BROADCAST_NETWORK"),
            ("point-to-point", "POINT_TO_POINT_NETWORK"),
            ("non-broadcast", "NON_BROADCAST_NETWORK"),
        ]),
    }
}

fn identities(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}
