//! IOS-XE access lists to `openconfig-acl`.
//!
//! Named standard and extended lists become acl-sets. Each rule string is
//! decoded on its own: a rule that cannot be decoded is noted and stays in
//! the leftover while its siblings carry on, and the list's `name` is only
//! consumed once every rule translated. Interface, NTP and VTY line
//! references to the lists are handled in [`bindings`].

pub mod bindings;
pub mod rule;


use config_tree_core::{ensure_list, ensure_object, Leftover, TreeNode, TreePath};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::context::TranslationContext;
use crate::error::TranslateError;

pub use rule::{parse_rule, AclEntry, AclKind, AclRuleError};

pub const FEATURE: &str = "acl";
pub(crate) const ACL: &str = "openconfig-acl:acl";
const IP: &str = "tailf-ned-cisco-ios:ip";

/// An acl-set emitted for a named list, used to resolve references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinedAcl {
    pub name: String,
    pub kind: AclKind,
}

/// Translate every access list and its references.
pub fn translate(
    before: &Value,
    leftover: &mut Leftover,
    ctx: &mut TranslationContext,
) -> Result<Value, TranslateError> {
    let mut acl = Map::new();
    let mut defined = Vec::new();
    {
        let sets = ensure_list(
            ensure_object(&mut acl, "openconfig-acl:acl-sets"),
            "openconfig-acl:acl-set",
        );
        for kind in [AclKind::Standard, AclKind::Extended] {
            translate_acl_sets(before, leftover, ctx, kind, sets, &mut defined);
        }
    }

    bindings::translate_interfaces(before, leftover, ctx, &defined, &mut acl);
    bindings::translate_ntp(before, leftover, &mut acl);
    bindings::translate_lines(before, leftover, &mut acl);

    Ok(json!({ ACL: acl }))
}

fn translate_acl_sets(
    before: &Value,
    leftover: &mut Leftover,
    ctx: &mut TranslationContext,
    kind: AclKind,
    sets: &mut Vec<Value>,
    defined: &mut Vec<DefinedAcl>,
) {
    let base = TreePath::from_keys(&[IP, "access-list"]).keys(&kind.ned_path());
    let Some(lists) = base.lookup(before).and_then(Value::as_array) else {
        return;
    };

    for (acl_idx, ned_acl) in lists.iter().enumerate() {
        let acl_path = base.clone().index(acl_idx);
        let Some(name) = ned_acl.text_at(&["name"]) else {
            ctx.note(FEATURE, acl_path.to_string(), "", "access list has no name");
            continue;
        };

        let mut entries = Vec::new();
        let mut clean = true;
        let rules_path = acl_path.clone().key(kind.rule_list_key());
        for (rule_idx, rule) in ned_acl.list(kind.rule_list_key()).iter().enumerate() {
            let text = rule.text_at(&["rule"]).unwrap_or_default();
            match parse_rule(&text, kind, &ctx.mappings) {
                Ok(entry) => {
                    debug!(acl = %name, rule = %text, "translated access list rule");
                    entries.push(entry.to_value(kind));
                    leftover.remove(&rules_path.clone().index(rule_idx));
                }
                Err(err) => {
                    clean = false;
                    ctx.note(FEATURE, &name, text, err.to_string());
                }
            }
        }
        if clean {
            leftover.remove(&acl_path.clone().key("name"));
        }

        sets.push(json!({
            "openconfig-acl:name": name,
            "openconfig-acl:type": kind.acl_type(),
            "openconfig-acl:config": {
                "openconfig-acl:name": name,
                "openconfig-acl:type": kind.acl_type(),
                "openconfig-acl:description": name,
            },
            "openconfig-acl:acl-entries": {
                "openconfig-acl:acl-entry": entries,
            },
        }));
        defined.push(DefinedAcl { name, kind });
    }
}
