use serde::Serialize;
use serde_json::Value;

/// A single coverage outcome for a node path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum CoverageEntry {
    /// Node was deleted or tombstoned in the leftover.
    Consumed { path: String, node: Value },
    /// Node is still present and unchanged in the leftover.
    Remaining { path: String },
    /// Node is present but some descendants were consumed. Only reported
    /// at the depth limit.
    Partial { path: String },
    /// Leftover shape does not match the source (for example, a list
    /// replaced by an object).
    Structural { path: String, description: String },
}

impl CoverageEntry {
    pub fn path(&self) -> &str {
        match self {
            CoverageEntry::Consumed { path, .. }
            | CoverageEntry::Remaining { path }
            | CoverageEntry::Partial { path }
            | CoverageEntry::Structural { path, .. } => path,
        }
    }
}
