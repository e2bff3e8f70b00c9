use crate::coverage::CoverageEntry;

/// Format coverage entries as plain text.
pub fn format_text(entries: &[CoverageEntry]) -> String {
    let mut lines = Vec::with_capacity(entries.len() + 1);
    for entry in entries {
        match entry {
            CoverageEntry::Consumed { path, .. } => lines.push(format!("- {path}")),
            CoverageEntry::Remaining { path } => lines.push(format!("= {path}")),
            CoverageEntry::Partial { path } => lines.push(format!("~ {path}")),
            CoverageEntry::Structural { path, description } => {
                lines.push(format!("! {path}: {description}"));
            }
        }
    }
    lines.join("\n")
}

/// Format a simple summary of coverage counts.
pub fn format_summary(entries: &[CoverageEntry]) -> String {
    let mut consumed = 0;
    let mut remaining = 0;
    let mut partial = 0;
    let mut structural = 0;

    for entry in entries {
        match entry {
            CoverageEntry::Consumed { .. } => consumed += 1,
            CoverageEntry::Remaining { .. } => remaining += 1,
            CoverageEntry::Partial { .. } => partial += 1,
            CoverageEntry::Structural { .. } => structural += 1,
        }
    }

    format!(
        "consumed={consumed} remaining={remaining} partial={partial} structural={structural}"
    )
}
