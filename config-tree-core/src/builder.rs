//! Get-or-create accessors for building destination trees.
//!
//! Containers are created on first access and returned on every later
//! access, so builders can be called repeatedly with the same path without
//! duplicating anything. Keyed list entries keep first-touched order.

use serde_json::{Map, Value};

/// Gets or creates an object under `key`.
///
/// A non-object value already stored under `key` is replaced.
pub fn ensure_object<'a>(parent: &'a mut Map<String, Value>, key: &str) -> &'a mut Map<String, Value> {
    let slot = parent
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    coerce_object(slot)
}

/// Gets or creates a nested object path and returns the innermost object.
pub fn ensure_path<'a>(
    parent: &'a mut Map<String, Value>,
    keys: &[&str],
) -> &'a mut Map<String, Value> {
    keys.iter().fold(parent, |node, key| ensure_object(node, key))
}

/// Gets or creates a list under `key`.
pub fn ensure_list<'a>(parent: &'a mut Map<String, Value>, key: &str) -> &'a mut Vec<Value> {
    let slot = parent
        .entry(key.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    if !slot.is_array() {
        *slot = Value::Array(Vec::new());
    }
    match slot {
        Value::Array(list) => list,
        _ => unreachable!("slot coerced to a list above"),
    }
}

/// Finds the list entry whose `key` field equals `id`, appending a new one if
/// none exists.
///
/// New entries are created by `seed`, which receives the identifier. The
/// returned entry is the same object on every call with an equal `id`.
pub fn get_or_insert_keyed<'a, F>(
    list: &'a mut Vec<Value>,
    key: &str,
    id: &Value,
    seed: F,
) -> &'a mut Map<String, Value>
where
    F: FnOnce(&Value) -> Map<String, Value>,
{
    let idx = match list.iter().position(|entry| entry.get(key) == Some(id)) {
        Some(idx) => idx,
        None => {
            list.push(Value::Object(seed(id)));
            list.len() - 1
        }
    };
    coerce_object(&mut list[idx])
}

/// Seed for YANG list entries: the key leaf plus its `config` echo.
pub fn keyed_entry(key: &str, config_key: &str, id: &Value) -> Map<String, Value> {
    let mut config = Map::new();
    config.insert(key.to_string(), id.clone());
    let mut entry = Map::new();
    entry.insert(key.to_string(), id.clone());
    entry.insert(config_key.to_string(), Value::Object(config));
    entry
}

fn coerce_object(slot: &mut Value) -> &mut Map<String, Value> {
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(map) => map,
        _ => unreachable!("slot coerced to an object above"),
    }
}
