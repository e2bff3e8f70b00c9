use crate::mappings::{default_xe_mappings, XeMappings};
use crate::notes::{Note, Notes};

/// Per-device translation state.
///
/// One context is created for each device translation and threaded through
/// every translator, so separate devices never share notes.
#[derive(Debug, Clone)]
pub struct TranslationContext {
    pub mappings: XeMappings,
    pub notes: Notes,
}

impl TranslationContext {
    pub fn new(mappings: XeMappings) -> Self {
        Self {
            mappings,
            notes: Notes::default(),
        }
    }

    /// Record a note about an element that was left in the leftover.
    pub fn note(
        &mut self,
        feature: &str,
        subject: impl Into<String>,
        original: impl Into<String>,
        reason: impl Into<String>,
    ) {
        self.notes.push(Note {
            feature: feature.to_string(),
            subject: subject.into(),
            original: original.into(),
            reason: reason.into(),
        });
    }
}

impl Default for TranslationContext {
    fn default() -> Self {
        Self::new(default_xe_mappings())
    }
}
