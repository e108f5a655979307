//! Playback-time lookup over transcript entries and chapters.
//!
//! Both collections are sorted by start time on construction, so lookups are
//! a single `partition_point` each.

use crate::types::{Chapter, TranscriptEntry};

#[derive(Debug, Clone, Default)]
pub struct TimeIndex {
    entries: Vec<TranscriptEntry>,
    chapters: Vec<Chapter>,
}

impl TimeIndex {
    pub fn new(mut entries: Vec<TranscriptEntry>, mut chapters: Vec<Chapter>) -> Self {
        entries.sort_by(|a, b| a.start_seconds.total_cmp(&b.start_seconds));
        chapters.sort_by(|a, b| a.start_seconds.total_cmp(&b.start_seconds));
        Self { entries, chapters }
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// Index of the entry with the greatest start time not after `seconds`.
    pub fn active_entry_index(&self, seconds: f64) -> Option<usize> {
        if !seconds.is_finite() {
            return None;
        }
        let after = self
            .entries
            .partition_point(|entry| entry.start_seconds <= seconds);
        after.checked_sub(1)
    }

    pub fn active_entry(&self, seconds: f64) -> Option<&TranscriptEntry> {
        self.active_entry_index(seconds).map(|i| &self.entries[i])
    }

    /// Index of the chapter whose `[start, end)` contains `seconds`. Gaps
    /// between chapters have no active chapter.
    pub fn active_chapter_index(&self, seconds: f64) -> Option<usize> {
        if !seconds.is_finite() {
            return None;
        }
        let after = self
            .chapters
            .partition_point(|chapter| chapter.start_seconds <= seconds);
        let candidate = after.checked_sub(1)?;
        self.chapters[candidate]
            .contains(seconds)
            .then_some(candidate)
    }

    pub fn active_chapter(&self, seconds: f64) -> Option<&Chapter> {
        self.active_chapter_index(seconds).map(|i| &self.chapters[i])
    }
}
