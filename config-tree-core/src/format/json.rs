use crate::coverage::CoverageEntry;

/// Format coverage entries as JSON.
pub fn format_json(entries: &[CoverageEntry]) -> String {
    serde_json::to_string_pretty(entries).unwrap_or_else(|_| "[]".to_string())
}
