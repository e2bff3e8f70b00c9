use config_tree_core::{Leftover, TreePath};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use super::area::AreaId;
use super::network::{bind_interfaces, network_statements};
use super::translate_instance;
use crate::context::TranslationContext;
use crate::error::TranslateError;
use crate::interfaces::{vrf_interfaces, VrfInterface};

const NI: &str = "openconfig-network-instance";

fn process(body: Value) -> Value {
    json!({"tailf-ned-cisco-ios:router": {"ospf": [body]}})
}

fn run(before: &Value) -> Result<(Vec<Value>, Leftover, TranslationContext), TranslateError> {
    let mut leftover = Leftover::new(before);
    let mut ctx = TranslationContext::default();
    let interfaces: Vec<VrfInterface> = vrf_interfaces(before)
        .into_iter()
        .filter(|i| i.vrf.is_none())
        .collect();
    let out = translate_instance(None, before, &mut leftover, &interfaces, &mut ctx)?;
    Ok((out, leftover, ctx))
}

fn areas(protocol: &Value) -> &Vec<Value> {
    protocol[format!("{NI}:ospfv2")][format!("{NI}:areas")][format!("{NI}:area")]
        .as_array()
        .expect("area list")
}

fn interface(address: &str) -> VrfInterface {
    VrfInterface {
        kind: "GigabitEthernet".into(),
        name: "0/1".into(),
        address: address.into(),
        mask: "255.255.255.0".into(),
        vrf: None,
        path: TreePath::root(),
    }
}

#[test]
fn most_specific_statement_claims_interface() {
    let ospf = json!({"network": [
        {"ip": "10.0.0.0", "mask": "0.0.0.255", "area": 1},
        {"ip": "10.0.0.5", "mask": "0.0.0.0", "area": 0}
    ]});
    let statements = network_statements(&ospf).expect("statements");
    let interfaces = [interface("10.0.0.5")];

    let bindings = bind_interfaces(&statements, &interfaces);

    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0].statement, 1);
    assert_eq!(bindings[0].area, AreaId::BACKBONE);
}

#[test]
fn statement_without_mask_sorts_last() {
    let ospf = json!({"network": [
        {"ip": "10.0.0.5", "area": 2},
        {"ip": "10.0.0.0", "mask": "0.0.0.255", "area": 1}
    ]});
    let statements = network_statements(&ospf).expect("statements");
    let interfaces = [interface("10.0.0.5")];

    let bindings = bind_interfaces(&statements, &interfaces);

    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0].statement, 1);
    assert_eq!(bindings[0].area, AreaId::parse(&json!(1)).expect("area"));
}

#[test]
fn equal_masks_keep_source_order() {
    let ospf = json!({"network": [
        {"ip": "10.0.0.0", "mask": "0.0.0.255", "area": 3},
        {"ip": "10.0.0.0", "mask": "0.0.0.255", "area": 4}
    ]});
    let statements = network_statements(&ospf).expect("statements");
    let interfaces = [interface("10.0.0.9")];

    let bindings = bind_interfaces(&statements, &interfaces);

    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0].statement, 0);
    assert_eq!(bindings[0].area, AreaId::parse(&json!(3)).expect("area"));
}

#[test]
fn dotted_and_integer_area_ids_are_equal() {
    let dotted = AreaId::parse(&json!("0.0.0.1")).expect("dotted");
    let plain = AreaId::parse(&json!(1)).expect("integer");
    assert_eq!(dotted, plain);
    assert_eq!(dotted.to_value(), json!("0.0.0.1"));
    assert!(matches!(
        AreaId::parse(&json!("backbone")),
        Err(TranslateError::InvalidAreaId(_))
    ));
}

#[test]
fn network_statement_binds_interface_and_neighbor() {
    let mut before = process(json!({
        "id": 1,
        "router-id": "1.1.1.1",
        "network": [{"ip": "10.0.0.0", "mask": "0.0.0.255", "area": 0}],
        "neighbor": [{"ip": "10.0.0.2"}]
    }));
    before["tailf-ned-cisco-ios:interface"] = json!({
        "GigabitEthernet": [{
            "name": "0/1",
            "ip": {
                "address": {"primary": {"address": "10.0.0.1", "mask": "255.255.255.0"}},
                "ospf": {"cost": 10}
            }
        }]
    });

    let (out, leftover, ctx) = run(&before).expect("translate");

    assert_eq!(out.len(), 1);
    let protocol = &out[0];
    assert_eq!(protocol[format!("{NI}:name")], json!("1"));
    assert_eq!(
        protocol[format!("{NI}:ospfv2")][format!("{NI}:global")][format!("{NI}:config")]
            [format!("{NI}:router-id")],
        json!("1.1.1.1")
    );

    let area = &areas(protocol)[0];
    assert_eq!(area[format!("{NI}:identifier")], json!(0));
    let intf = &area[format!("{NI}:interfaces")][format!("{NI}:interface")][0];
    assert_eq!(
        intf[format!("{NI}:config")],
        json!({
            "openconfig-network-instance:id": "GigabitEthernet0/1",
            "openconfig-network-instance:metric": 10
        })
    );
    assert_eq!(
        intf[format!("{NI}:neighbors")][format!("{NI}:neighbor")],
        json!([{
            "openconfig-network-instance:router-id": "10.0.0.2",
            "openconfig-network-instance:config": {
                "openconfig-network-instance:router-id": "10.0.0.2"
            }
        }])
    );

    assert!(ctx.notes.is_empty());
    assert_eq!(
        leftover.compact(),
        json!({
            "tailf-ned-cisco-ios:interface": {
                "GigabitEthernet": [{
                    "name": "0/1",
                    "ip": {"address": {"primary": {"address": "10.0.0.1", "mask": "255.255.255.0"}}}
                }]
            }
        })
    );
}

#[test]
fn stub_and_nssa_options() {
    let before = process(json!({
        "id": 1,
        "area": [
            {"id": 1, "stub": {"no-summary": [null]}},
            {"id": 2, "nssa": {"no-summary": [null]}}
        ]
    }));

    let (out, leftover, _) = run(&before).expect("translate");
    let areas = areas(&out[0]);

    assert_eq!(
        areas[0]["openconfig-ospfv2-ext:stub-options"],
        json!({
            "openconfig-ospfv2-ext:totally-stubby": {"openconfig-ospfv2-ext:config": {
                "openconfig-ospfv2-ext:enabled": true,
                "openconfig-ospfv2-ext:default-information-originate": true
            }},
            "openconfig-ospfv2-ext:stub": {"openconfig-ospfv2-ext:config": {
                "openconfig-ospfv2-ext:enabled": false,
                "openconfig-ospfv2-ext:default-information-originate": false
            }},
            "openconfig-ospfv2-ext:nssa": {"openconfig-ospfv2-ext:config": {
                "openconfig-ospfv2-ext:enabled": false,
                "openconfig-ospfv2-ext:default-information-originate": false,
                "openconfig-ospfv2-ext:no-summary": false
            }}
        })
    );
    let nssa = &areas[1]["openconfig-ospfv2-ext:stub-options"]["openconfig-ospfv2-ext:nssa"]
        ["openconfig-ospfv2-ext:config"];
    assert_eq!(nssa["openconfig-ospfv2-ext:enabled"], json!(true));
    assert_eq!(nssa["openconfig-ospfv2-ext:no-summary"], json!(true));

    assert_eq!(leftover.compact(), json!({}));
}

#[test]
fn stub_wins_over_nssa_with_note() {
    let before = process(json!({"id": 1, "area": [{"id": 1, "stub": {}, "nssa": {}}]}));

    let (out, leftover, ctx) = run(&before).expect("translate");

    let options = &areas(&out[0])[0]["openconfig-ospfv2-ext:stub-options"];
    assert_eq!(
        options["openconfig-ospfv2-ext:stub"]["openconfig-ospfv2-ext:config"]
            ["openconfig-ospfv2-ext:enabled"],
        json!(true)
    );
    assert_eq!(ctx.notes.for_feature("ospf").count(), 1);
    assert_eq!(
        leftover.compact(),
        json!({"tailf-ned-cisco-ios:router": {"ospf": [{"area": [{"id": 1, "nssa": {}}]}]}})
    );
}

#[test]
fn inter_area_policy_requires_backbone() {
    let before = process(json!({
        "id": 1,
        "area": [
            {"id": 0},
            {"id": 1, "filter-list": [{"prefix": "FROM-BACKBONE", "in": [null]}]}
        ]
    }));

    let (out, _, _) = run(&before).expect("translate");

    let policies = &out[0][format!("{NI}:ospfv2")][format!("{NI}:global")]
        [format!("{NI}:inter-area-propagation-policies")][format!("{NI}:inter-area-propagation-policy")];
    assert_eq!(
        policies[0][format!("{NI}:config")],
        json!({
            "openconfig-network-instance:src-area": 0,
            "openconfig-network-instance:dst-area": 1,
            "openconfig-network-instance:import-policy": ["FROM-BACKBONE"]
        })
    );

    let without_backbone = process(json!({
        "id": 1,
        "area": [{"id": 1, "filter-list": [{"prefix": "FROM-BACKBONE", "in": [null]}]}]
    }));
    let (out, leftover, _) = run(&without_backbone).expect("translate");
    assert!(out[0][format!("{NI}:ospfv2")][format!("{NI}:global")]
        .get(format!("{NI}:inter-area-propagation-policies"))
        .is_none());
    assert!(leftover.compact().to_string().contains("FROM-BACKBONE"));
}

#[test]
fn unbound_neighbor_is_noted() {
    let before = process(json!({"id": 7, "neighbor": [{"ip": "192.0.2.1"}]}));

    let (_, leftover, ctx) = run(&before).expect("translate");

    let notes: Vec<_> = ctx.notes.for_feature("ospf").collect();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].subject, "7");
    assert_eq!(notes[0].original, "neighbor 192.0.2.1");
    assert_eq!(
        leftover.compact(),
        json!({"tailf-ned-cisco-ios:router": {"ospf": [{"neighbor": [{"ip": "192.0.2.1"}]}]}})
    );
}

#[test]
fn throttle_timers_translate_when_complete() {
    let before = process(json!({
        "id": 1,
        "timers": {"throttle": {"spf": {"spf-start": 50, "spf-hold": 200, "spf-max-wait": 5000}}}
    }));

    let (out, leftover, _) = run(&before).expect("translate");

    assert_eq!(
        out[0][format!("{NI}:ospfv2")][format!("{NI}:global")][format!("{NI}:timers")]
            [format!("{NI}:spf")][format!("{NI}:config")],
        json!({
            "openconfig-network-instance:initial-delay": 50,
            "openconfig-network-instance:maximum-delay": 5000,
            "openconfig-ospfv2-ext:hold-time": 200
        })
    );
    assert_eq!(leftover.compact(), json!({}));
}

#[test]
fn partial_throttle_timers_are_fatal() {
    let before = process(json!({
        "id": 1,
        "timers": {"throttle": {"spf": {"spf-start": 50}}}
    }));

    assert_eq!(
        run(&before).err(),
        Some(TranslateError::PartialTimers {
            process: "1".into(),
            timer: "spf",
            required: "spf-start, spf-hold, and spf-max-wait",
        })
    );
}

#[test]
fn invalid_wildcard_is_fatal() {
    let before = process(json!({
        "id": 1,
        "network": [{"ip": "10.0.0.0", "mask": "0.0.0.x", "area": 0}]
    }));

    assert_eq!(
        run(&before).err(),
        Some(TranslateError::InvalidMask {
            ip: "10.0.0.0".into(),
            mask: "0.0.0.x".into(),
        })
    );
}

#[test]
fn processes_are_selected_by_vrf() {
    let before = json!({"tailf-ned-cisco-ios:router": {"ospf": [
        {"id": 1},
        {"id": 2, "vrf": "blue"}
    ]}});
    let mut leftover = Leftover::new(&before);
    let mut ctx = TranslationContext::default();

    let blue = translate_instance(Some("blue"), &before, &mut leftover, &[], &mut ctx)
        .expect("translate");

    assert_eq!(blue.len(), 1);
    assert_eq!(blue[0][format!("{NI}:name")], json!("2"));
}
