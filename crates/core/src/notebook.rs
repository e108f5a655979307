use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{format::format_timestamp, time_index::TimeIndex, types::NoteEntry};

/// Ordered log of notes taken while watching. Append and delete only.
#[derive(Debug, Clone, Default)]
pub struct NotebookLog {
    notes: Vec<NoteEntry>,
}

impl NotebookLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamps `text` with whatever is active at `seconds` and appends it.
    /// Blank input is ignored.
    pub fn append(
        &mut self,
        text: &str,
        index: &TimeIndex,
        seconds: f64,
        created_at: DateTime<Utc>,
    ) -> Option<&NoteEntry> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let display_timestamp = index
            .active_entry(seconds)
            .map(|entry| entry.timestamp())
            .unwrap_or_else(|| format_timestamp(seconds));
        let chapter_title = index
            .active_chapter(seconds)
            .map(|chapter| chapter.title.clone())
            .unwrap_or_default();

        debug!(%display_timestamp, chapter = %chapter_title, "Note appended");
        self.notes.push(NoteEntry {
            display_timestamp,
            chapter_title,
            text: text.to_string(),
            created_at,
            time_seconds: seconds,
        });
        self.notes.last()
    }

    /// Removes the note at `index`; out-of-range indices are ignored.
    pub fn delete(&mut self, index: usize) -> Option<NoteEntry> {
        (index < self.notes.len()).then(|| self.notes.remove(index))
    }

    pub fn notes(&self) -> &[NoteEntry] {
        &self.notes
    }

    pub fn get(&self, index: usize) -> Option<&NoteEntry> {
        self.notes.get(index)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}
