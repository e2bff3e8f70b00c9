use config_tree_core::{ensure_path, Leftover, TreeNode, TreePath};
use serde_json::{json, Map, Value};

use crate::error::TranslateError;

/// Process-wide settings under `ospfv2/global`.
///
/// `config` is always written, with defaults for anything the process does
/// not configure.
pub fn translate_global(
    global: &mut Map<String, Value>,
    ospf: &Value,
    process: &TreePath,
    before: &Value,
    leftover: &mut Leftover,
) {
    let mut config = Map::new();
    if let Some(router_id) = leftover.take_text(before, &process.clone().key("router-id")) {
        config.insert(
            "openconfig-network-instance:router-id".into(),
            json!(router_id),
        );
    }
    config.insert(
        "openconfig-network-instance:log-adjacency-changes".into(),
        json!(leftover.take_flag(before, &process.clone().key("log-adjacency-changes"))),
    );
    let rfc2328 = ospf.child_at(&["compatible", "rfc1583"]) == Some(&Value::Bool(false));
    leftover.remove(&process.clone().key("compatible"));
    config.insert(
        "openconfig-network-instance:summary-route-cost-mode".into(),
        json!(if rfc2328 {
            "RFC2328_COMPATIBLE"
        } else {
            "RFC1583_COMPATIBLE"
        }),
    );
    config.insert(
        "openconfig-network-instance:hide-transit-only-networks".into(),
        json!(leftover.take_flag(before, &process.clone().key("prefix-suppression"))),
    );
    config.insert(
        "openconfig-ospfv2-ext:capability-vrf-lite".into(),
        json!(leftover.take_flag(before, &process.clone().keys(&["capability", "vrf-lite"]))),
    );
    config.insert(
        "openconfig-ospfv2-ext:default-information-originate".into(),
        default_information_originate(ospf, process, before, leftover),
    );
    global.insert("openconfig-network-instance:config".into(), Value::Object(config));

    let graceful_restart =
        leftover.take_flag(before, &process.clone().keys(&["nsf-ietf", "nsf", "ietf"]));
    global.insert(
        "openconfig-network-instance:graceful-restart".into(),
        json!({
            "openconfig-network-instance:config": {
                "openconfig-network-instance:enabled": graceful_restart
            }
        }),
    );

    let ldp_sync = leftover.take_flag(before, &process.clone().keys(&["mpls", "ldp", "sync"]));
    global.insert(
        "openconfig-network-instance:mpls".into(),
        json!({
            "openconfig-network-instance:igp-ldp-sync": {
                "openconfig-network-instance:config": {
                    "openconfig-network-instance:enabled": ldp_sync
                }
            }
        }),
    );
}

fn default_information_originate(
    ospf: &Value,
    process: &TreePath,
    before: &Value,
    leftover: &mut Leftover,
) -> Value {
    let path = process.clone().keys(&["default-information", "originate"]);
    let Some(originate) = ospf.child_at(&["default-information", "originate"]) else {
        return json!({
            "openconfig-ospfv2-ext:config": {"openconfig-ospfv2-ext:enabled": false}
        });
    };

    let mut config = Map::new();
    config.insert("openconfig-ospfv2-ext:enabled".into(), json!(true));
    if leftover.take_flag(before, &path.clone().key("always")) {
        config.insert("openconfig-ospfv2-ext:always".into(), json!(true));
    }
    for field in ["metric", "metric-type"] {
        if let Some(value) = leftover.take(before, &path.clone().key(field)) {
            config.insert(format!("openconfig-ospfv2-ext:{field}"), value);
        }
    }
    // route-map has no OpenConfig counterpart yet and stays behind.
    if !originate.is_object() {
        leftover.remove(&path);
    } else {
        leftover.remove_if_consumed(&path);
    }

    json!({ "openconfig-ospfv2-ext:config": config })
}

/// LSA generation and SPF throttle timers.
///
/// Each timer needs all three of its values; a partial set is fatal.
pub fn translate_timers(
    global: &mut Map<String, Value>,
    ospf: &Value,
    process: &TreePath,
    process_id: &str,
    leftover: &mut Leftover,
) -> Result<(), TranslateError> {
    let timers = [
        (
            "lsa",
            "openconfig-network-instance:lsa-generation",
            ["start-interval", "hold-interval", "max-interval"],
            "start-interval, hold-interval, and max-interval",
        ),
        (
            "spf",
            "openconfig-network-instance:spf",
            ["spf-start", "spf-hold", "spf-max-wait"],
            "spf-start, spf-hold, and spf-max-wait",
        ),
    ];

    for (timer, container, [start, hold, max], required) in timers {
        let Some(throttle) = ospf.child_at(&["timers", "throttle", timer]) else {
            continue;
        };
        let values = (throttle.child(start), throttle.child(hold), throttle.child(max));
        match values {
            (Some(start), Some(hold), Some(max)) => {
                ensure_path(global, &["openconfig-network-instance:timers", container]).insert(
                    "openconfig-network-instance:config".into(),
                    json!({
                        "openconfig-network-instance:initial-delay": start,
                        "openconfig-network-instance:maximum-delay": max,
                        "openconfig-ospfv2-ext:hold-time": hold,
                    }),
                );
            }
            (None, None, None) => {}
            _ => {
                return Err(TranslateError::PartialTimers {
                    process: process_id.to_string(),
                    timer,
                    required,
                })
            }
        }
        leftover.remove(&process.clone().keys(&["timers", "throttle", timer]));
    }
    Ok(())
}
