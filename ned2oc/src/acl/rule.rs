//! Decoding of positional IOS access-list rule strings.
//!
//! A rule reads `<seq> <action> [<protocol>] <src> [<src-port>] [<dst>
//! [<dst-port>] [<tcp-flags>]] [log-input]`. The protocol token only exists
//! for extended lists, and port operators only follow `tcp` and `udp`.

use std::net::Ipv4Addr;

use ipnetwork::{ipv4_mask_to_prefix, Ipv4Network};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::mappings::XeMappings;

const PORT_OPERATORS: [&str; 5] = ["range", "eq", "lt", "gt", "neq"];

/// Named access-list layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AclKind {
    Standard,
    Extended,
}

impl AclKind {
    pub fn acl_type(self) -> &'static str {
        match self {
            AclKind::Standard => "ACL_IPV4_STANDARD",
            AclKind::Extended => "ACL_IPV4",
        }
    }

    /// NED containers holding the named lists of this kind.
    pub fn ned_path(self) -> [&'static str; 2] {
        match self {
            AclKind::Standard => ["standard", "std-named-acl"],
            AclKind::Extended => ["extended", "ext-named-acl"],
        }
    }

    pub fn rule_list_key(self) -> &'static str {
        match self {
            AclKind::Standard => "std-access-list-rule",
            AclKind::Extended => "ext-access-list-rule",
        }
    }

    fn ipv4_key(self) -> &'static str {
        match self {
            AclKind::Standard => "openconfig-acl-ext:ipv4",
            AclKind::Extended => "openconfig-acl:ipv4",
        }
    }

    fn config_key(self) -> &'static str {
        match self {
            AclKind::Standard => "openconfig-acl-ext:config",
            AclKind::Extended => "openconfig-acl:config",
        }
    }

    fn source_key(self) -> &'static str {
        match self {
            AclKind::Standard => "openconfig-acl-ext:source-address",
            AclKind::Extended => "openconfig-acl:source-address",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardingAction {
    Accept,
    Reject,
}

impl ForwardingAction {
    fn as_str(self) -> &'static str {
        match self {
            ForwardingAction::Accept => "ACCEPT",
            ForwardingAction::Reject => "REJECT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogAction {
    Syslog,
    None,
}

impl LogAction {
    fn as_str(self) -> &'static str {
        match self {
            LogAction::Syslog => "LOG_SYSLOG",
            LogAction::None => "LOG_NONE",
        }
    }
}

/// A transport port match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortMatch {
    Any,
    Exact(u16),
    Range(u16, u16),
    /// `lt p`, strictly below `p`.
    Below(u16),
    /// `gt p`, strictly above `p`.
    Above(u16),
}

impl PortMatch {
    pub fn to_value(self) -> Value {
        match self {
            PortMatch::Any => json!("ANY"),
            PortMatch::Exact(port) => json!(port),
            PortMatch::Range(start, end) => json!(format!("{start}..{end}")),
            PortMatch::Below(port) => json!(format!("0..{}", port.saturating_sub(1))),
            PortMatch::Above(port) => json!(format!("{}..65535", port.saturating_add(1))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TcpFlag {
    Ack,
    Rst,
}

impl TcpFlag {
    fn as_str(self) -> &'static str {
        match self {
            TcpFlag::Ack => "TCP_ACK",
            TcpFlag::Rst => "TCP_RST",
        }
    }
}

/// One decoded access-list rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclEntry {
    pub sequence_id: u32,
    pub action: ForwardingAction,
    /// OpenConfig protocol identity, absent for `ip`.
    pub protocol: Option<String>,
    pub source: Option<Ipv4Network>,
    pub destination: Option<Ipv4Network>,
    pub source_port: Option<PortMatch>,
    pub destination_port: Option<PortMatch>,
    pub tcp_flags: Vec<TcpFlag>,
    pub log: LogAction,
}

/// Reasons a single rule cannot be translated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AclRuleError {
    #[error("rule is empty")]
    Empty,
    #[error("sequence id {0:?} is not a number")]
    InvalidSequence(String),
    #[error("action {0:?} is neither permit nor deny")]
    UnknownAction(String),
    #[error("protocol {0} does not exist in expected list of protocols")]
    UnknownProtocol(String),
    #[error("unable to convert service {0} to a port number")]
    UnknownService(String),
    #[error("port operator {0} does not have an OpenConfig equivalent")]
    UnsupportedOperator(String),
    #[error("rule ends before its {0}")]
    MissingToken(&'static str),
    #[error("{0:?} is not an IPv4 address")]
    InvalidAddress(String),
    #[error("{0:?} is not a contiguous wildcard mask")]
    InvalidWildcard(String),
    #[error("port {0} leaves an empty range")]
    PortOutOfRange(String),
    #[error("{0:?} has no OpenConfig equivalent")]
    UnsupportedToken(String),
}

/// Decode one rule string.
pub fn parse_rule(
    rule: &str,
    kind: AclKind,
    mappings: &XeMappings,
) -> Result<AclEntry, AclRuleError> {
    let tokens: Vec<&str> = rule.split_whitespace().collect();
    let seq = *tokens.first().ok_or(AclRuleError::Empty)?;
    let sequence_id = seq
        .parse::<u32>()
        .map_err(|_| AclRuleError::InvalidSequence(seq.to_string()))?;
    let action = match tokens.get(1).copied() {
        Some("permit") => ForwardingAction::Accept,
        Some("deny") => ForwardingAction::Reject,
        Some(other) => return Err(AclRuleError::UnknownAction(other.to_string())),
        None => return Err(AclRuleError::MissingToken("action")),
    };

    let mut entry = AclEntry {
        sequence_id,
        action,
        protocol: None,
        source: None,
        destination: None,
        source_port: None,
        destination_port: None,
        tcp_flags: Vec::new(),
        log: LogAction::None,
    };

    let mut cursor = 2;
    let mut has_ports = false;
    if kind == AclKind::Extended {
        let keyword = *tokens.get(2).ok_or(AclRuleError::MissingToken("protocol"))?;
        if keyword != "ip" {
            let protocol = mappings
                .protocol(keyword)
                .ok_or_else(|| AclRuleError::UnknownProtocol(keyword.to_string()))?;
            entry.protocol = Some(protocol.to_string());
        }
        has_ports = keyword == "tcp" || keyword == "udp";
        cursor = 3;
    }

    if cursor >= tokens.len() {
        return Err(AclRuleError::MissingToken("source address"));
    }
    let (source, next) = parse_address(&tokens, cursor, kind == AclKind::Standard)?;
    entry.source = Some(source);
    cursor = next;
    if has_ports {
        let (port, next) = parse_port(&tokens, cursor, mappings)?;
        entry.source_port = Some(port);
        cursor = next;
    }

    if kind == AclKind::Extended && cursor < tokens.len() && tokens[cursor] != "log-input" {
        let (destination, next) = parse_address(&tokens, cursor, false)?;
        entry.destination = Some(destination);
        cursor = next;
        if has_ports {
            let (port, next) = parse_port(&tokens, cursor, mappings)?;
            entry.destination_port = Some(port);
            cursor = next;
            let (flags, next) = parse_tcp_flags(&tokens, cursor);
            entry.tcp_flags = flags;
            cursor = next;
        }
    }

    if tokens.get(cursor) == Some(&"log-input") {
        entry.log = LogAction::Syslog;
        cursor += 1;
    }
    // Trailing qualifiers (time-range, fragments, log, icmp types) would
    // widen the rule if dropped.
    if let Some(rest) = tokens.get(cursor..).filter(|rest| !rest.is_empty()) {
        return Err(AclRuleError::UnsupportedToken(rest.join(" ")));
    }
    Ok(entry)
}

fn parse_address(
    tokens: &[&str],
    cursor: usize,
    standard: bool,
) -> Result<(Ipv4Network, usize), AclRuleError> {
    match tokens[cursor] {
        "any" => {
            let any = Ipv4Network::new(Ipv4Addr::UNSPECIFIED, 0)
                .map_err(|_| AclRuleError::InvalidAddress("any".to_string()))?;
            Ok((any, cursor + 1))
        }
        "host" => {
            let raw = *tokens
                .get(cursor + 1)
                .ok_or(AclRuleError::MissingToken("host address"))?;
            Ok((host_network(parse_ipv4(raw)?), cursor + 2))
        }
        raw => {
            let ip = parse_ipv4(raw)?;
            match tokens.get(cursor + 1) {
                Some(wildcard) if wildcard.parse::<Ipv4Addr>().is_ok() => {
                    let prefix = wildcard_prefix(wildcard)?;
                    let network = Ipv4Network::new(ip, prefix)
                        .map_err(|_| AclRuleError::InvalidWildcard((*wildcard).to_string()))?;
                    Ok((network, cursor + 2))
                }
                // IOS shorthand: a bare address in a standard list is a host.
                _ if standard => Ok((host_network(ip), cursor + 1)),
                Some(wildcard) => Err(AclRuleError::InvalidWildcard((*wildcard).to_string())),
                None => Err(AclRuleError::MissingToken("wildcard mask")),
            }
        }
    }
}

fn parse_ipv4(raw: &str) -> Result<Ipv4Addr, AclRuleError> {
    raw.parse()
        .map_err(|_| AclRuleError::InvalidAddress(raw.to_string()))
}

fn host_network(ip: Ipv4Addr) -> Ipv4Network {
    Ipv4Network::from(ip)
}

/// Prefix length of a wildcard (inverted) mask.
pub fn wildcard_prefix(wildcard: &str) -> Result<u8, AclRuleError> {
    let invalid = || AclRuleError::InvalidWildcard(wildcard.to_string());
    let hostmask: Ipv4Addr = wildcard.parse().map_err(|_| invalid())?;
    let netmask = Ipv4Addr::from(!u32::from(hostmask));
    ipv4_mask_to_prefix(netmask).map_err(|_| invalid())
}

fn parse_port(
    tokens: &[&str],
    cursor: usize,
    mappings: &XeMappings,
) -> Result<(PortMatch, usize), AclRuleError> {
    let Some(&operator) = tokens.get(cursor) else {
        return Ok((PortMatch::Any, cursor));
    };
    if !PORT_OPERATORS.contains(&operator) {
        return Ok((PortMatch::Any, cursor));
    }
    if operator == "neq" {
        return Err(AclRuleError::UnsupportedOperator(operator.to_string()));
    }

    let first = resolve_port(tokens.get(cursor + 1).copied(), mappings)?;
    match operator {
        "range" => {
            let last = resolve_port(tokens.get(cursor + 2).copied(), mappings)?;
            if first > last {
                return Err(AclRuleError::PortOutOfRange(format!("range {first} {last}")));
            }
            Ok((PortMatch::Range(first, last), cursor + 3))
        }
        "lt" if first == 0 => Err(AclRuleError::PortOutOfRange(format!("lt {first}"))),
        "lt" => Ok((PortMatch::Below(first), cursor + 2)),
        "gt" if first == u16::MAX => Err(AclRuleError::PortOutOfRange(format!("gt {first}"))),
        "gt" => Ok((PortMatch::Above(first), cursor + 2)),
        _ => Ok((PortMatch::Exact(first), cursor + 2)),
    }
}

fn resolve_port(token: Option<&str>, mappings: &XeMappings) -> Result<u16, AclRuleError> {
    let token = token.ok_or(AclRuleError::MissingToken("port"))?;
    if token.bytes().all(|b| b.is_ascii_digit()) {
        return token
            .parse()
            .map_err(|_| AclRuleError::PortOutOfRange(token.to_string()));
    }
    mappings
        .service_port(token)
        .ok_or_else(|| AclRuleError::UnknownService(token.to_string()))
}

fn parse_tcp_flags(tokens: &[&str], cursor: usize) -> (Vec<TcpFlag>, usize) {
    match tokens.get(cursor).copied() {
        Some("ack") => (vec![TcpFlag::Ack], cursor + 1),
        Some("rst") => (vec![TcpFlag::Rst], cursor + 1),
        Some("established") => (vec![TcpFlag::Ack, TcpFlag::Rst], cursor + 1),
        _ => (Vec::new(), cursor),
    }
}

impl AclEntry {
    /// Render as an `openconfig-acl:acl-entry` list element.
    pub fn to_value(&self, kind: AclKind) -> Value {
        let mut entry = Map::new();
        entry.insert("openconfig-acl:sequence-id".into(), json!(self.sequence_id));
        entry.insert(
            "openconfig-acl:config".into(),
            json!({"openconfig-acl:sequence-id": self.sequence_id}),
        );
        entry.insert(
            "openconfig-acl:actions".into(),
            json!({
                "openconfig-acl:config": {
                    "openconfig-acl:forwarding-action": self.action.as_str(),
                    "openconfig-acl:log-action": self.log.as_str(),
                }
            }),
        );

        let mut ipv4 = Map::new();
        if let Some(protocol) = &self.protocol {
            ipv4.insert("openconfig-acl:protocol".into(), json!(protocol));
        }
        if let Some(source) = &self.source {
            ipv4.insert(kind.source_key().into(), json!(source.to_string()));
        }
        if let Some(destination) = &self.destination {
            ipv4.insert(
                "openconfig-acl:destination-address".into(),
                json!(destination.to_string()),
            );
        }
        if !ipv4.is_empty() {
            let mut container = Map::new();
            container.insert(kind.config_key().into(), Value::Object(ipv4));
            entry.insert(kind.ipv4_key().into(), Value::Object(container));
        }

        let mut transport = Map::new();
        if let Some(port) = self.source_port {
            transport.insert("openconfig-acl:source-port".into(), port.to_value());
        }
        if let Some(port) = self.destination_port {
            transport.insert("openconfig-acl:destination-port".into(), port.to_value());
        }
        if !self.tcp_flags.is_empty() {
            let flags: Vec<&str> = self.tcp_flags.iter().map(|f| f.as_str()).collect();
            transport.insert("openconfig-acl:tcp-flags".into(), json!(flags));
        }
        if !transport.is_empty() {
            entry.insert(
                "openconfig-acl:transport".into(),
                json!({"openconfig-acl:config": transport}),
            );
        }

        Value::Object(entry)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{
        parse_rule, wildcard_prefix, AclKind, AclRuleError, ForwardingAction, LogAction,
        PortMatch, TcpFlag,
    };
    use crate::mappings::default_xe_mappings;

    fn extended(rule: &str) -> Result<super::AclEntry, AclRuleError> {
        parse_rule(rule, AclKind::Extended, &default_xe_mappings())
    }

    fn standard(rule: &str) -> Result<super::AclEntry, AclRuleError> {
        parse_rule(rule, AclKind::Standard, &default_xe_mappings())
    }

    #[test]
    fn actions_map_to_forwarding_actions() {
        assert_eq!(standard("10 permit any").expect("permit").action, ForwardingAction::Accept);
        assert_eq!(standard("20 deny any").expect("deny").action, ForwardingAction::Reject);
        assert_eq!(
            standard("30 allow any"),
            Err(AclRuleError::UnknownAction("allow".to_string()))
        );
    }

    #[test]
    fn addresses_decode_to_prefixes() {
        let entry = extended("10 permit ip host 10.0.0.1 any").expect("host");
        assert_eq!(entry.source.expect("source").to_string(), "10.0.0.1/32");
        assert_eq!(entry.destination.expect("dest").to_string(), "0.0.0.0/0");

        let entry = extended("20 permit ip 10.0.0.0 0.0.0.255 172.16.0.0 0.15.255.255").expect("mask");
        assert_eq!(entry.source.expect("source").to_string(), "10.0.0.0/24");
        assert_eq!(entry.destination.expect("dest").to_string(), "172.16.0.0/12");
        assert_eq!(entry.protocol, None);
    }

    #[test]
    fn standard_bare_address_is_a_host() {
        let entry = standard("10 permit 192.0.2.7").expect("bare host");
        assert_eq!(entry.source.expect("source").to_string(), "192.0.2.7/32");

        let entry = standard("20 permit 192.0.2.7 log-input").expect("bare host with log");
        assert_eq!(entry.source.expect("source").to_string(), "192.0.2.7/32");
        assert_eq!(entry.log, LogAction::Syslog);
    }

    #[test]
    fn wildcard_must_be_contiguous() {
        assert_eq!(wildcard_prefix("0.255.255.255"), Ok(8));
        assert_eq!(wildcard_prefix("0.0.0.0"), Ok(32));
        assert_eq!(wildcard_prefix("255.255.255.255"), Ok(0));
        assert_eq!(
            extended("10 permit ip 10.0.0.0 0.255.0.255 any"),
            Err(AclRuleError::InvalidWildcard("0.255.0.255".to_string()))
        );
    }

    #[test]
    fn port_operators_map_to_port_matches() {
        let entry = extended("10 permit tcp any any eq 80").expect("eq");
        assert_eq!(entry.source_port, Some(PortMatch::Any));
        assert_eq!(entry.destination_port, Some(PortMatch::Exact(80)));

        let entry = extended("20 permit tcp any range 20 21 any").expect("range");
        assert_eq!(entry.source_port, Some(PortMatch::Range(20, 21)));
        assert_eq!(entry.destination.expect("dest").to_string(), "0.0.0.0/0");

        let entry = extended("30 permit udp any any lt 1024").expect("lt");
        assert_eq!(
            entry.destination_port.map(PortMatch::to_value),
            Some(json!("0..1023"))
        );

        let entry = extended("40 permit udp any gt 1023 any").expect("gt");
        assert_eq!(
            entry.source_port.map(PortMatch::to_value),
            Some(json!("1024..65535"))
        );
    }

    #[test]
    fn neq_is_rejected() {
        assert_eq!(
            extended("10 permit tcp any any neq 80"),
            Err(AclRuleError::UnsupportedOperator("neq".to_string()))
        );
    }

    #[test]
    fn service_names_resolve_through_the_table() {
        let entry = extended("10 permit tcp any any range ftp-data ftp").expect("named range");
        assert_eq!(entry.destination_port, Some(PortMatch::Range(20, 21)));

        assert_eq!(
            extended("20 permit tcp any any eq gopherx"),
            Err(AclRuleError::UnknownService("gopherx".to_string()))
        );
    }

    #[test]
    fn empty_port_ranges_are_rejected() {
        assert!(matches!(
            extended("10 permit tcp any any lt 0"),
            Err(AclRuleError::PortOutOfRange(_))
        ));
        assert!(matches!(
            extended("10 permit tcp any any gt 65535"),
            Err(AclRuleError::PortOutOfRange(_))
        ));
        assert_eq!(
            extended("10 permit tcp any any range 2000 1000"),
            Err(AclRuleError::PortOutOfRange("range 2000 1000".to_string()))
        );
    }

    #[test]
    fn trailing_qualifiers_are_rejected() {
        for (rule, rest) in [
            ("10 permit ip any any time-range WORK", "time-range WORK"),
            ("10 permit tcp any any eq 80 fragments", "fragments"),
            ("10 permit icmp any any echo", "echo"),
            ("10 deny ip any any log", "log"),
            ("10 permit ip any any log-input dscp ef", "dscp ef"),
        ] {
            assert_eq!(
                extended(rule),
                Err(AclRuleError::UnsupportedToken(rest.to_string())),
                "{rule}"
            );
        }
        assert_eq!(
            standard("10 permit host 192.0.2.1 log"),
            Err(AclRuleError::UnsupportedToken("log".to_string()))
        );
    }

    #[test]
    fn tcp_flags_follow_the_destination_port() {
        let entry = extended("10 permit tcp any any established").expect("established");
        assert_eq!(entry.destination_port, Some(PortMatch::Any));
        assert_eq!(entry.tcp_flags, vec![TcpFlag::Ack, TcpFlag::Rst]);

        let entry = extended("20 permit tcp any any eq 443 ack log-input").expect("ack");
        assert_eq!(entry.tcp_flags, vec![TcpFlag::Ack]);
        assert_eq!(entry.log, LogAction::Syslog);
    }

    #[test]
    fn unknown_protocols_fail() {
        assert_eq!(
            extended("10 permit sctp any any"),
            Err(AclRuleError::UnknownProtocol("sctp".to_string()))
        );
    }

    #[test]
    fn renders_extended_entry() {
        let entry = extended("10 deny tcp 10.1.0.0 0.0.255.255 host 10.2.0.1 eq www").expect("rule");
        assert_eq!(
            entry.to_value(AclKind::Extended),
            json!({
                "openconfig-acl:sequence-id": 10,
                "openconfig-acl:config": {"openconfig-acl:sequence-id": 10},
                "openconfig-acl:actions": {
                    "openconfig-acl:config": {
                        "openconfig-acl:forwarding-action": "REJECT",
                        "openconfig-acl:log-action": "LOG_NONE"
                    }
                },
                "openconfig-acl:ipv4": {
                    "openconfig-acl:config": {
                        "openconfig-acl:protocol": "IP_TCP",
                        "openconfig-acl:source-address": "10.1.0.0/16",
                        "openconfig-acl:destination-address": "10.2.0.1/32"
                    }
                },
                "openconfig-acl:transport": {
                    "openconfig-acl:config": {
                        "openconfig-acl:source-port": "ANY",
                        "openconfig-acl:destination-port": 80
                    }
                }
            })
        );
    }
}
