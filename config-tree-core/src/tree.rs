use std::fmt::{self, Display, Formatter};

use serde_json::Value;

/// One step of a [`TreePath`]: an object key or a list index.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

/// An address of a node inside a JSON tree.
///
/// Paths render as `a.b[2].c` for humans and as RFC 6901 pointers for
/// lookups. Ordering is lexicographic over segments, so a parent sorts
/// before its descendants and lower list indices sort first.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TreePath {
    segments: Vec<Segment>,
}

impl TreePath {
    /// The empty path, addressing the root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from a list of object keys.
    pub fn from_keys(keys: &[&str]) -> Self {
        Self {
            segments: keys.iter().map(|k| Segment::Key((*k).to_string())).collect(),
        }
    }

    /// Append an object key.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(Segment::Key(key.into()));
        self
    }

    /// Append a list index.
    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(Segment::Index(index));
        self
    }

    /// Append all keys in order.
    pub fn keys(mut self, keys: &[&str]) -> Self {
        self.segments
            .extend(keys.iter().map(|k| Segment::Key((*k).to_string())));
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Split into the parent path and the final segment.
    pub fn split_last(&self) -> Option<(TreePath, &Segment)> {
        let (last, rest) = self.segments.split_last()?;
        Some((
            TreePath {
                segments: rest.to_vec(),
            },
            last,
        ))
    }

    /// Every proper ancestor of this path, nearest first, excluding the root.
    pub fn ancestors(&self) -> Vec<TreePath> {
        (1..self.segments.len())
            .rev()
            .map(|len| TreePath {
                segments: self.segments[..len].to_vec(),
            })
            .collect()
    }

    /// Render as an RFC 6901 JSON pointer.
    pub fn to_pointer(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            out.push('/');
            match segment {
                Segment::Key(key) => out.push_str(&key.replace('~', "~0").replace('/', "~1")),
                Segment::Index(idx) => out.push_str(&idx.to_string()),
            }
        }
        out
    }

    pub fn lookup<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        root.pointer(&self.to_pointer())
    }

    pub fn lookup_mut<'a>(&self, root: &'a mut Value) -> Option<&'a mut Value> {
        root.pointer_mut(&self.to_pointer())
    }
}

impl Display for TreePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "$");
        }
        for (idx, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) if idx == 0 => write!(f, "{key}")?,
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Index(i) => write!(f, "[{i}]")?,
            }
        }
        Ok(())
    }
}

/// Read helpers for loosely structured configuration values.
///
/// Device configuration mixes numbers and strings for the same leaf, and
/// encodes presence-only leaves as `[null]`. These helpers smooth over both.
pub trait TreeNode {
    /// Return the child stored under `key`, if this is an object.
    fn child(&self, key: &str) -> Option<&Value>;

    /// Walk a nested key path.
    fn child_at(&self, path: &[&str]) -> Option<&Value>;

    /// Return true if `key` exists, whatever its value.
    fn has(&self, key: &str) -> bool;

    /// Walk a nested key path and render a scalar terminal value as text.
    fn text_at(&self, path: &[&str]) -> Option<String>;

    /// Return the list under `key`, or an empty slice.
    fn list(&self, key: &str) -> &[Value];
}

impl TreeNode for Value {
    fn child(&self, key: &str) -> Option<&Value> {
        self.as_object()?.get(key)
    }

    fn child_at(&self, path: &[&str]) -> Option<&Value> {
        let mut current = self;
        for segment in path {
            current = current.child(segment)?;
        }
        Some(current)
    }

    fn has(&self, key: &str) -> bool {
        self.as_object().is_some_and(|map| map.contains_key(key))
    }

    fn text_at(&self, path: &[&str]) -> Option<String> {
        scalar_text(self.child_at(path)?)
    }

    fn list(&self, key: &str) -> &[Value] {
        self.child(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Render a string, number, or boolean as text.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{TreeNode, TreePath};

    #[test]
    fn pointer_escapes_slashes_in_keys() {
        let path = TreePath::root().key("GigabitEthernet").key("0/1").index(3);
        assert_eq!(path.to_pointer(), "/GigabitEthernet/0~11/3");
        assert_eq!(path.to_string(), "GigabitEthernet.0/1[3]");
    }

    #[test]
    fn lookup_walks_keys_and_indices() {
        let root = json!({"a": {"b": [{"c": 1}, {"c": 2}]}});
        let path = TreePath::from_keys(&["a", "b"]).index(1).key("c");
        assert_eq!(path.lookup(&root), Some(&json!(2)));
    }

    #[test]
    fn ancestors_are_nearest_first() {
        let path = TreePath::from_keys(&["a", "b"]).index(0);
        let ancestors = path.ancestors();
        assert_eq!(ancestors[0], TreePath::from_keys(&["a", "b"]));
        assert_eq!(ancestors[1], TreePath::from_keys(&["a"]));
    }

    #[test]
    fn text_at_renders_numbers() {
        let root = json!({"router": {"id": 100, "name": "core"}});
        assert_eq!(root.text_at(&["router", "id"]), Some("100".to_string()));
        assert_eq!(root.text_at(&["router", "name"]), Some("core".to_string()));
        assert!(root.list("missing").is_empty());
    }
}
