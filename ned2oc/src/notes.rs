use std::fmt::{self, Display, Formatter};

use serde::Serialize;
use tracing::warn;

/// Something the translators saw but could not carry into OpenConfig.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    /// Feature family, e.g. `acl` or `ospf`.
    pub feature: String,
    /// The element the note is about, e.g. the ACL or neighbor name.
    pub subject: String,
    /// Source configuration the note refers to.
    pub original: String,
    pub reason: String,
}

impl Display for Note {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.feature, self.subject)?;
        if !self.original.is_empty() {
            writeln!(f, "  original: {}", self.original)?;
        }
        write!(f, "  {}", self.reason)
    }
}

/// Notes collected during one translation, in the order they were recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Notes {
    entries: Vec<Note>,
}

impl Notes {
    pub fn push(&mut self, note: Note) {
        warn!(
            feature = %note.feature,
            subject = %note.subject,
            reason = %note.reason,
            "recorded translation note"
        );
        self.entries.push(note);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Notes recorded for one feature family.
    pub fn for_feature<'a>(&'a self, feature: &'a str) -> impl Iterator<Item = &'a Note> {
        self.entries.iter().filter(move |n| n.feature == feature)
    }

    /// Plain-text rendering used for the notes file, one blank line between
    /// notes.
    pub fn render(&self) -> String {
        let mut out = self
            .entries
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }
}
