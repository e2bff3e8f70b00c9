//! Leftover tracking for a translation pass.
//!
//! A [`Leftover`] starts as a deep copy of the source configuration. As a
//! translator places values into its output it consumes the matching source
//! fields here: object fields are deleted and list elements are overwritten
//! with a `null` tombstone so that sibling indices stay aligned with the
//! source tree. What remains afterwards is the untranslated configuration.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::tree::{scalar_text, Segment, TreePath};

#[derive(Debug, Clone, PartialEq)]
pub struct Leftover {
    root: Value,
    removed: Vec<TreePath>,
    tombstones: BTreeSet<TreePath>,
}

impl Leftover {
    /// Start tracking a deep copy of `source`.
    pub fn new(source: &Value) -> Self {
        Self::from_value(source.clone())
    }

    /// Start tracking an already-copied tree.
    pub fn from_value(root: Value) -> Self {
        Self {
            root,
            removed: Vec::new(),
            tombstones: BTreeSet::new(),
        }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn get(&self, path: &TreePath) -> Option<&Value> {
        path.lookup(&self.root)
    }

    /// True if the path still holds an unconsumed value.
    pub fn contains(&self, path: &TreePath) -> bool {
        self.get(path).is_some() && !self.tombstones.contains(path)
    }

    /// Consume the value at `path`.
    ///
    /// Object fields are deleted. List elements are tombstoned instead, see
    /// [`Leftover::tombstone`]. Returns the consumed value if one was present.
    pub fn remove(&mut self, path: &TreePath) -> Option<Value> {
        let (parent, last) = path.split_last()?;
        match last {
            Segment::Index(_) => {
                let previous = self.get(path).cloned()?;
                self.tombstone(path);
                Some(previous)
            }
            Segment::Key(key) => {
                let removed = parent
                    .lookup_mut(&mut self.root)?
                    .as_object_mut()?
                    .shift_remove(key)?;
                self.removed.push(path.clone());
                Some(removed)
            }
        }
    }

    /// Overwrite the value at `path` with a `null` tombstone.
    ///
    /// Returns false if nothing exists at `path`.
    pub fn tombstone(&mut self, path: &TreePath) -> bool {
        let Some(slot) = path.lookup_mut(&mut self.root) else {
            return false;
        };
        *slot = Value::Null;
        self.tombstones.insert(path.clone());
        true
    }

    /// Read `path` from `source` and consume it here.
    ///
    /// The value comes from the source so that a field consumed earlier can
    /// still be read again.
    pub fn take(&mut self, source: &Value, path: &TreePath) -> Option<Value> {
        let value = path.lookup(source)?.clone();
        self.remove(path);
        Some(value)
    }

    /// Like [`Leftover::take`], for scalar leaves rendered as text. Non-scalar
    /// values are left untouched.
    pub fn take_text(&mut self, source: &Value, path: &TreePath) -> Option<String> {
        let text = scalar_text(path.lookup(source)?)?;
        self.remove(path);
        Some(text)
    }

    /// Consume a presence leaf, returning whether it was configured.
    pub fn take_flag(&mut self, source: &Value, path: &TreePath) -> bool {
        if path.lookup(source).is_none() {
            return false;
        }
        self.remove(path);
        true
    }

    /// Delete the container at `path` if every element in it was consumed.
    ///
    /// Applies to lists whose elements are all tombstones and to empty
    /// objects. A container that was already empty in the source is kept.
    /// Returns true if the container was removed.
    pub fn remove_if_consumed(&mut self, path: &TreePath) -> bool {
        if !self.consumed_below(path) {
            return false;
        }
        let consumed = match self.get(path) {
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .all(|(idx, _)| self.tombstones.contains(&path.clone().index(idx))),
            Some(Value::Object(map)) => map.is_empty(),
            _ => false,
        };
        consumed && self.remove(path).is_some()
    }

    fn consumed_below(&self, path: &TreePath) -> bool {
        let prefix = path.segments();
        self.removed
            .iter()
            .chain(self.tombstones.iter())
            .any(|p| p.depth() > prefix.len() && p.segments().starts_with(prefix))
    }

    /// Paths deleted or tombstoned so far, in consumption order for
    /// deletions followed by tombstones in path order.
    pub fn consumed(&self) -> Vec<TreePath> {
        self.removed
            .iter()
            .chain(self.tombstones.iter())
            .cloned()
            .collect()
    }

    /// The remaining configuration with tombstones removed and any
    /// container emptied by consumption pruned.
    ///
    /// Containers that were already empty in the source are kept, as are
    /// presence markers like `[null]` that were never consumed.
    pub fn compact(&self) -> Value {
        let mut out = self.root.clone();
        let mut touched: BTreeSet<TreePath> = BTreeSet::new();
        for path in self.removed.iter().chain(self.tombstones.iter()) {
            touched.extend(path.ancestors());
        }
        touched.extend(self.tombstones.iter().cloned());

        // Descending order visits higher indices and deeper paths first, so
        // removing a list element never shifts a path still to be visited.
        for path in touched.iter().rev() {
            let tombstoned = self.tombstones.contains(path);
            let prune = match path.lookup(&out) {
                Some(Value::Null) => tombstoned,
                Some(Value::Array(items)) => items.is_empty(),
                Some(Value::Object(map)) => map.is_empty(),
                _ => false,
            };
            if prune {
                detach(&mut out, path);
            }
        }
        out
    }

    pub fn into_value(self) -> Value {
        self.root
    }
}

fn detach(root: &mut Value, path: &TreePath) {
    let Some((parent, last)) = path.split_last() else {
        return;
    };
    match (parent.lookup_mut(root), last) {
        (Some(Value::Object(map)), Segment::Key(key)) => {
            map.shift_remove(key);
        }
        (Some(Value::Array(items)), Segment::Index(idx)) if *idx < items.len() => {
            items.remove(*idx);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::Leftover;
    use crate::tree::TreePath;

    #[test]
    fn list_elements_are_tombstoned_not_shifted() {
        let source = json!({"rules": [{"rule": "a"}, {"rule": "b"}, {"rule": "c"}]});
        let mut leftover = Leftover::new(&source);

        leftover.remove(&TreePath::from_keys(&["rules"]).index(0));

        assert_eq!(
            leftover.root(),
            &json!({"rules": [null, {"rule": "b"}, {"rule": "c"}]})
        );
        assert!(!leftover.contains(&TreePath::from_keys(&["rules"]).index(0)));
        assert!(leftover.contains(&TreePath::from_keys(&["rules"]).index(1)));
    }

    #[test]
    fn compact_drops_tombstones_and_emptied_containers() {
        let source = json!({
            "acl": {"name": "10", "rules": [{"rule": "a"}, {"rule": "b"}]},
            "line": {"shutdown": [null], "empty": {}}
        });
        let mut leftover = Leftover::new(&source);
        let rules = TreePath::from_keys(&["acl", "rules"]);
        leftover.remove(&rules.clone().index(0));
        leftover.remove(&rules.clone().index(1));
        leftover.remove(&TreePath::from_keys(&["acl", "name"]));

        assert_eq!(
            leftover.compact(),
            json!({"line": {"shutdown": [null], "empty": {}}})
        );
    }

    #[test]
    fn compact_keeps_unconsumed_siblings_in_order() {
        let source = json!({"rules": [{"rule": "a"}, {"rule": "b"}, {"rule": "c"}]});
        let mut leftover = Leftover::new(&source);
        leftover.remove(&TreePath::from_keys(&["rules"]).index(0));
        leftover.remove(&TreePath::from_keys(&["rules"]).index(2));

        assert_eq!(leftover.compact(), json!({"rules": [{"rule": "b"}]}));
    }

    #[test]
    fn take_reads_source_and_consumes_leftover() {
        let source = json!({"router": {"id": 10, "shutdown": [null], "area": {"id": 0}}});
        let mut leftover = Leftover::new(&source);
        let router = TreePath::from_keys(&["router"]);

        assert_eq!(leftover.take_text(&source, &router.clone().key("id")), Some("10".to_string()));
        assert!(leftover.take_flag(&source, &router.clone().key("shutdown")));
        assert!(!leftover.take_flag(&source, &router.clone().key("missing")));
        assert_eq!(leftover.take_text(&source, &router.clone().key("area")), None);
        assert_eq!(leftover.root(), &json!({"router": {"area": {"id": 0}}}));

        // Already consumed fields still read from the source.
        assert_eq!(
            leftover.take(&source, &router.clone().key("id")),
            Some(json!(10))
        );
    }

    #[test]
    fn remove_if_consumed_requires_every_element() {
        let source = json!({"ip": {"access-group": [{"a": 1}, {"a": 2}]}});
        let mut leftover = Leftover::new(&source);
        let groups = TreePath::from_keys(&["ip", "access-group"]);

        leftover.remove(&groups.clone().index(0));
        assert!(!leftover.remove_if_consumed(&groups));

        leftover.remove(&groups.clone().index(1));
        assert!(leftover.remove_if_consumed(&groups));
        assert_eq!(leftover.root(), &json!({"ip": {}}));
    }

    #[test]
    fn remove_if_consumed_keeps_source_empty_containers() {
        let source = json!({"passive-interface": {"interface": []}, "timers": {}});
        let mut leftover = Leftover::new(&source);

        assert!(!leftover.remove_if_consumed(&TreePath::from_keys(&["passive-interface", "interface"])));
        assert!(!leftover.remove_if_consumed(&TreePath::from_keys(&["timers"])));
        assert!(leftover.consumed().is_empty());
        assert_eq!(leftover.compact(), source);
    }
}
