use std::fmt::{self, Display, Formatter};
use std::net::Ipv4Addr;

use config_tree_core::{ensure_list, ensure_path, Leftover, TreeNode, TreePath};
use serde_json::{json, Map, Value};

use super::FEATURE;
use crate::context::TranslationContext;
use crate::error::TranslateError;

/// An OSPF area identifier, written either as an integer or a dotted quad.
///
/// Both spellings name the same area, so equality compares the numeric
/// value. The original spelling is kept for output.
#[derive(Debug, Clone, Copy)]
pub struct AreaId {
    value: u32,
    dotted: bool,
}

impl AreaId {
    pub const BACKBONE: AreaId = AreaId {
        value: 0,
        dotted: false,
    };

    pub fn parse(raw: &Value) -> Result<Self, TranslateError> {
        let invalid = || TranslateError::InvalidAreaId(raw.to_string());
        match raw {
            Value::Number(n) => n
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(|value| AreaId {
                    value,
                    dotted: false,
                })
                .ok_or_else(invalid),
            Value::String(s) => {
                if let Ok(value) = s.parse::<u32>() {
                    return Ok(AreaId {
                        value,
                        dotted: false,
                    });
                }
                s.parse::<Ipv4Addr>()
                    .map(|addr| AreaId {
                        value: u32::from(addr),
                        dotted: true,
                    })
                    .map_err(|_| invalid())
            }
            _ => Err(invalid()),
        }
    }

    pub fn is_backbone(self) -> bool {
        self.value == 0
    }

    pub fn to_value(self) -> Value {
        if self.dotted {
            json!(Ipv4Addr::from(self.value).to_string())
        } else {
            json!(self.value)
        }
    }
}

impl PartialEq for AreaId {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for AreaId {}

impl Display for AreaId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.dotted {
            write!(f, "{}", Ipv4Addr::from(self.value))
        } else {
            write!(f, "{}", self.value)
        }
    }
}

/// An area known to a process, either from an `area` entry or only
/// implied by a network statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceArea {
    pub id: AreaId,
    /// Index into the process `area` list.
    pub index: Option<usize>,
}

/// Areas defined by `area` entries first, then those only named by
/// network statements. Network statements without an area imply area 0.
pub fn area_list(ospf: &Value) -> Result<Vec<SourceArea>, TranslateError> {
    let mut out: Vec<SourceArea> = Vec::new();
    for (index, area) in ospf.list("area").iter().enumerate() {
        let Some(raw) = area.child("id") else {
            continue;
        };
        let id = AreaId::parse(raw)?;
        if !out.iter().any(|a| a.id == id) {
            out.push(SourceArea {
                id,
                index: Some(index),
            });
        }
    }
    for stmt in ospf.list("network") {
        let id = match stmt.child("area") {
            Some(raw) => AreaId::parse(raw)?,
            None => AreaId::BACKBONE,
        };
        if !out.iter().any(|a| a.id == id) {
            out.push(SourceArea { id, index: None });
        }
    }
    Ok(out)
}

/// `mpls traffic-eng area <id>` entries naming this area.
pub fn apply_traffic_eng(
    area: &mut Map<String, Value>,
    id: AreaId,
    ospf: &Value,
    process: &TreePath,
    leftover: &mut Leftover,
) {
    let te_path = process.clone().keys(&["mpls", "traffic-eng", "area"]);
    let te_areas = ospf
        .child_at(&["mpls", "traffic-eng"])
        .map(|te| te.list("area"))
        .unwrap_or(&[]);
    let matched = te_areas
        .iter()
        .position(|raw| AreaId::parse(raw).is_ok_and(|te| te == id));
    if let Some(idx) = matched {
        leftover.remove(&te_path.index(idx));
    }

    ensure_path(area, &["openconfig-network-instance:mpls", "openconfig-network-instance:config"])
        .insert(
            "openconfig-network-instance:traffic-engineering-enabled".into(),
            json!(matched.is_some()),
        );
}

pub fn apply_virtual_links(
    area: &mut Map<String, Value>,
    source: &Value,
    source_path: &TreePath,
    leftover: &mut Leftover,
) {
    for (idx, link) in source.list("virtual-link").iter().enumerate() {
        let Some(remote) = link.child("id") else {
            continue;
        };
        ensure_list(
            ensure_path(area, &["openconfig-network-instance:virtual-links"]),
            "openconfig-network-instance:virtual-link",
        )
        .push(json!({
            "openconfig-network-instance:remote-router-id": remote,
            "openconfig-network-instance:config": {
                "openconfig-network-instance:remote-router-id": remote,
            }
        }));
        leftover.remove(&source_path.clone().key("virtual-link").index(idx));
    }
}

fn stub_config(enabled: bool, no_summary: Option<bool>) -> Value {
    let mut config = Map::new();
    config.insert("openconfig-ospfv2-ext:enabled".into(), json!(enabled));
    config.insert(
        "openconfig-ospfv2-ext:default-information-originate".into(),
        json!(enabled),
    );
    if let Some(no_summary) = no_summary {
        config.insert("openconfig-ospfv2-ext:no-summary".into(), json!(no_summary));
    }
    json!({ "openconfig-ospfv2-ext:config": config })
}

/// Stub, totally stubby and NSSA settings.
///
/// The three options are mutually exclusive. A device rejects `stub`
/// together with `nssa`, so when both appear `stub` is kept and `nssa`
/// stays in the leftover.
pub fn apply_stub_options(
    area: &mut Map<String, Value>,
    id: AreaId,
    source: &Value,
    source_path: &TreePath,
    process_id: &str,
    leftover: &mut Leftover,
    ctx: &mut TranslationContext,
) {
    let options = if let Some(stub) = source.child("stub") {
        let totally = stub.has("no-summary");
        if source.has("nssa") {
            ctx.note(
                FEATURE,
                format!("{process_id} area {id}"),
                "stub and nssa",
                "area is configured as both stub and nssa; nssa was not translated",
            );
        }
        leftover.remove(&source_path.clone().key("stub"));
        json!({
            "openconfig-ospfv2-ext:totally-stubby": stub_config(totally, None),
            "openconfig-ospfv2-ext:stub": stub_config(!totally, None),
            "openconfig-ospfv2-ext:nssa": stub_config(false, Some(false)),
        })
    } else if let Some(nssa) = source.child("nssa") {
        leftover.remove(&source_path.clone().key("nssa"));
        json!({
            "openconfig-ospfv2-ext:totally-stubby": stub_config(false, None),
            "openconfig-ospfv2-ext:stub": stub_config(false, None),
            "openconfig-ospfv2-ext:nssa": stub_config(true, Some(nssa.has("no-summary"))),
        })
    } else {
        return;
    };
    area.insert("openconfig-ospfv2-ext:stub-options".into(), options);
}

/// Import policy from the backbone into a non-backbone area, taken from a
/// single `area <id> filter-list prefix` entry.
pub fn inter_area_policy(
    id: AreaId,
    source: &Value,
    source_path: &TreePath,
    process_id: &str,
    leftover: &mut Leftover,
    ctx: &mut TranslationContext,
) -> Option<Value> {
    let filters = source.list("filter-list");
    match filters {
        [] => None,
        [filter] => {
            let prefix = filter.text_at(&["prefix"])?;
            leftover.remove(&source_path.clone().key("filter-list"));
            Some(json!({
                "openconfig-network-instance:src-area": 0,
                "openconfig-network-instance:dst-area": id.to_value(),
                "openconfig-network-instance:config": {
                    "openconfig-network-instance:src-area": 0,
                    "openconfig-network-instance:dst-area": id.to_value(),
                    "openconfig-network-instance:import-policy": [prefix],
                }
            }))
        }
        _ => {
            ctx.note(
                FEATURE,
                format!("{process_id} area {id}"),
                Value::Array(filters.to_vec()).to_string(),
                "only a single filter-list per area can be translated",
            );
            None
        }
    }
}
