use colored::Colorize;
use config_tree_core::{format_summary, format_text, CoverageEntry};

use crate::notes::Notes;

/// Render coverage entries for terminal output.
pub fn render_coverage(entries: &[CoverageEntry]) -> String {
    let raw = format_text(entries);
    let mut out = Vec::new();

    for line in raw.lines() {
        let colored = if line.starts_with('-') {
            line.green().to_string()
        } else if line.starts_with('=') {
            line.red().to_string()
        } else if line.starts_with('~') {
            line.yellow().to_string()
        } else if line.starts_with('!') {
            line.magenta().to_string()
        } else {
            line.to_string()
        };
        out.push(colored);
    }

    out.join("\n")
}

/// Render coverage counts for terminal output.
pub fn render_coverage_summary(entries: &[CoverageEntry]) -> String {
    format_summary(entries).cyan().to_string()
}

/// Render translation notes, grouped under a heading per feature.
pub fn render_notes(notes: &Notes) -> String {
    if notes.is_empty() {
        return "notes: none".green().to_string();
    }

    let mut features: Vec<&str> = Vec::new();
    for note in notes.iter() {
        if !features.contains(&note.feature.as_str()) {
            features.push(&note.feature);
        }
    }
    let mut out = Vec::new();
    for feature in features {
        out.push(format!("{}", format!("[{feature}]").bold()));
        for note in notes.for_feature(feature) {
            out.push(format!("- {} {}", note.subject.yellow(), note.reason));
            if !note.original.is_empty() {
                out.push(format!("  original: {}", note.original.dimmed()));
            }
        }
    }
    out.join("\n")
}
