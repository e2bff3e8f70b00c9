use serde_json::{Map, Value};

use crate::coverage::result::CoverageEntry;
use crate::tree::TreePath;

/// Configures coverage behavior.
#[derive(Debug, Clone)]
pub struct CoverageOptions {
    /// Include [`CoverageEntry::Remaining`] rows.
    pub include_remaining: bool,
    /// Maximum recursion depth. `-1` means unlimited.
    pub max_depth: i32,
    /// Paths or key names to ignore.
    pub ignore_paths: Vec<String>,
}

impl Default for CoverageOptions {
    fn default() -> Self {
        Self {
            include_remaining: false,
            max_depth: -1,
            ignore_paths: Vec::new(),
        }
    }
}

/// Compare a source tree against its leftover with default options.
pub fn coverage(source: &Value, leftover: &Value) -> Vec<CoverageEntry> {
    coverage_with_options(source, leftover, &CoverageOptions::default())
}

/// Compare a source tree against its leftover with custom options.
///
/// Only the source side is walked: the leftover can never hold fields the
/// source lacks, so anything extra there is reported as structural.
pub fn coverage_with_options(
    source: &Value,
    leftover: &Value,
    opts: &CoverageOptions,
) -> Vec<CoverageEntry> {
    let mut out = Vec::new();
    cover_node(source, Some(leftover), &TreePath::root(), 0, opts, &mut out);
    out
}

fn cover_node(
    source: &Value,
    leftover: Option<&Value>,
    path: &TreePath,
    depth: i32,
    opts: &CoverageOptions,
    out: &mut Vec<CoverageEntry>,
) {
    let rendered = path.to_string();
    if should_ignore(&rendered, opts) {
        return;
    }

    let Some(leftover) = leftover else {
        out.push(CoverageEntry::Consumed {
            path: rendered,
            node: source.clone(),
        });
        return;
    };

    // A tombstone standing in for a non-null source value.
    if leftover.is_null() && !source.is_null() {
        out.push(CoverageEntry::Consumed {
            path: rendered,
            node: source.clone(),
        });
        return;
    }

    if opts.max_depth >= 0 && depth >= opts.max_depth {
        if source == leftover {
            if opts.include_remaining {
                out.push(CoverageEntry::Remaining { path: rendered });
            }
        } else {
            out.push(CoverageEntry::Partial { path: rendered });
        }
        return;
    }

    match (source, leftover) {
        (Value::Object(src), Value::Object(left)) => {
            cover_object(src, left, path, depth, opts, out);
        }
        (Value::Array(src), Value::Array(left)) => {
            if src.len() != left.len() {
                out.push(CoverageEntry::Structural {
                    path: rendered.clone(),
                    description: format!(
                        "list length changed: source={} leftover={}",
                        src.len(),
                        left.len()
                    ),
                });
            }
            for (idx, item) in src.iter().enumerate() {
                let child = path.clone().index(idx);
                cover_node(item, left.get(idx), &child, depth + 1, opts, out);
            }
        }
        (src, left) if kind_matches(src, left) => {
            if src != left {
                out.push(CoverageEntry::Structural {
                    path: rendered,
                    description: format!("value changed: source={src} leftover={left}"),
                });
            } else if opts.include_remaining {
                out.push(CoverageEntry::Remaining { path: rendered });
            }
        }
        (src, left) => out.push(CoverageEntry::Structural {
            path: rendered,
            description: format!("shape mismatch: source={src} leftover={left}"),
        }),
    }
}

fn cover_object(
    source: &Map<String, Value>,
    leftover: &Map<String, Value>,
    path: &TreePath,
    depth: i32,
    opts: &CoverageOptions,
    out: &mut Vec<CoverageEntry>,
) {
    for (key, value) in source {
        let child = path.clone().key(key.as_str());
        cover_node(value, leftover.get(key), &child, depth + 1, opts, out);
    }
    for key in leftover.keys().filter(|k| !source.contains_key(*k)) {
        out.push(CoverageEntry::Structural {
            path: path.clone().key(key.as_str()).to_string(),
            description: "field missing from source".to_string(),
        });
    }
}

fn kind_matches(left: &Value, right: &Value) -> bool {
    std::mem::discriminant(left) == std::mem::discriminant(right)
}

fn should_ignore(path: &str, opts: &CoverageOptions) -> bool {
    opts.ignore_paths.iter().any(|ignore| {
        path == ignore
            || path.ends_with(&format!(".{ignore}"))
            || path.contains(&format!(".{ignore}["))
            || path.contains(&format!(".{ignore}."))
    })
}
