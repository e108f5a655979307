//! Per-video session state.
//!
//! A session is reset in full whenever a new video is loaded. Each load
//! issues a [`RequestTag`]; a transcript response is only applied when its
//! tag still matches, so a slow response for a superseded video can never
//! overwrite the current one.

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::Result,
    notebook::NotebookLog,
    time_index::TimeIndex,
    types::{Chapter, InitScope, NoteEntry, Transcript, TranscriptEntry, VideoMetadata},
};

/// Identifies one in-flight transcript request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTag {
    pub video_id: String,
    pub id: Uuid,
}

/// Everything a successful fetch delivers for one video.
#[derive(Debug, Clone, Default)]
pub struct VideoData {
    pub title: String,
    pub transcript: Option<Transcript>,
    pub chapters: Vec<Chapter>,
    pub metadata: Option<VideoMetadata>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// The response belonged to a superseded load and was dropped.
    Stale,
    /// The fetch failed; the session now waits for a pasted transcript.
    Failed { message: String },
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    video_id: String,
    video_title: String,
    transcript: Option<Transcript>,
    metadata: Option<VideoMetadata>,
    index: TimeIndex,
    current_time_seconds: f64,
    init_scope: InitScope,
    init_already_copied: bool,
    notebook: NotebookLog,
    manual_entry: bool,
    pending: Option<RequestTag>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scope(scope: InitScope) -> Self {
        Self {
            init_scope: scope,
            ..Self::default()
        }
    }

    /// Start loading `video_id`: resets every field, invalidates any request
    /// still in flight, and returns the tag the new response must carry. The
    /// configured scope is kept.
    pub fn begin_load(&mut self, video_id: &str) -> RequestTag {
        let tag = RequestTag {
            video_id: video_id.to_string(),
            id: Uuid::new_v4(),
        };
        *self = Self {
            video_id: video_id.to_string(),
            pending: Some(tag.clone()),
            ..Self::with_scope(self.init_scope)
        };
        info!(video_id, request = %tag.id, "Loading video");
        tag
    }

    /// Apply the result of the request identified by `tag`.
    pub fn apply_fetch(&mut self, tag: &RequestTag, result: Result<VideoData>) -> FetchOutcome {
        if self.pending.as_ref() != Some(tag) || tag.video_id != self.video_id {
            warn!(
                stale_video_id = %tag.video_id,
                current_video_id = %self.video_id,
                "Discarding stale transcript response"
            );
            return FetchOutcome::Stale;
        }
        self.pending = None;

        match result {
            Ok(data) => {
                let entries: Vec<TranscriptEntry> = data
                    .transcript
                    .as_ref()
                    .map(|t| t.entries.clone())
                    .unwrap_or_default();
                info!(
                    video_id = %self.video_id,
                    entries = entries.len(),
                    chapters = data.chapters.len(),
                    "Transcript loaded"
                );
                self.index = TimeIndex::new(entries, data.chapters);
                self.video_title = data.title;
                self.transcript = data.transcript;
                self.metadata = data.metadata;
                self.manual_entry = false;
                FetchOutcome::Applied
            }
            Err(err) => {
                warn!(video_id = %self.video_id, "Transcript fetch failed: {err}");
                self.manual_entry = true;
                FetchOutcome::Failed {
                    message: err.to_string(),
                }
            }
        }
    }

    /// Use pasted text as the transcript. Only accepted after a failed
    /// fetch; blank text is rejected.
    pub fn apply_manual_transcript(&mut self, text: &str) -> bool {
        if !self.manual_entry {
            return false;
        }
        let Some(transcript) = Transcript::manual(text) else {
            return false;
        };
        info!(video_id = %self.video_id, chars = text.len(), "Manual transcript entered");
        self.transcript = Some(transcript);
        self.pending = None;
        true
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn video_title(&self) -> &str {
        &self.video_title
    }

    pub fn transcript(&self) -> Option<&Transcript> {
        self.transcript.as_ref()
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        self.index.entries()
    }

    pub fn chapters(&self) -> &[Chapter] {
        self.index.chapters()
    }

    pub fn metadata(&self) -> Option<&VideoMetadata> {
        self.metadata.as_ref()
    }

    pub fn time_index(&self) -> &TimeIndex {
        &self.index
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_manual_entry(&self) -> bool {
        self.manual_entry
    }

    pub fn current_time(&self) -> f64 {
        self.current_time_seconds
    }

    pub fn set_current_time(&mut self, seconds: f64) {
        if seconds.is_finite() {
            self.current_time_seconds = seconds.max(0.0);
        }
    }

    pub fn active_entry_index(&self) -> Option<usize> {
        self.index.active_entry_index(self.current_time_seconds)
    }

    pub fn active_entry(&self) -> Option<&TranscriptEntry> {
        self.index.active_entry(self.current_time_seconds)
    }

    pub fn active_chapter_index(&self) -> Option<usize> {
        self.index.active_chapter_index(self.current_time_seconds)
    }

    pub fn active_chapter(&self) -> Option<&Chapter> {
        self.index.active_chapter(self.current_time_seconds)
    }

    pub fn init_scope(&self) -> InitScope {
        self.init_scope
    }

    pub fn set_init_scope(&mut self, scope: InitScope) {
        self.init_scope = scope;
    }

    pub fn init_already_copied(&self) -> bool {
        self.init_already_copied
    }

    pub fn mark_init_copied(&mut self) {
        self.init_already_copied = true;
    }

    pub fn notebook(&self) -> &NotebookLog {
        &self.notebook
    }

    pub fn add_note(&mut self, text: &str) -> Option<&NoteEntry> {
        self.add_note_at(text, Utc::now())
    }

    pub fn add_note_at(&mut self, text: &str, created_at: DateTime<Utc>) -> Option<&NoteEntry> {
        self.notebook
            .append(text, &self.index, self.current_time_seconds, created_at)
    }

    pub fn delete_note(&mut self, index: usize) -> Option<NoteEntry> {
        self.notebook.delete(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::VideoTutorError, types::TranscriptSource};

    fn data(title: &str) -> VideoData {
        VideoData {
            title: title.to_string(),
            transcript: Some(Transcript::new(
                vec![TranscriptEntry {
                    start_seconds: 1.0,
                    text: "hello".to_string(),
                    display_timestamp: Some("00:01".to_string()),
                }],
                None,
                TranscriptSource::Manual,
            )),
            chapters: vec![Chapter {
                title: "Only".to_string(),
                start_seconds: 0.0,
                end_seconds: 10.0,
                display_timestamp: "0:00".to_string(),
            }],
            metadata: None,
        }
    }

    #[test]
    fn test_matching_response_is_applied() {
        let mut session = SessionState::new();
        let tag = session.begin_load("aaaaaaaaaaa");
        assert!(session.is_loading());

        assert_eq!(session.apply_fetch(&tag, Ok(data("A"))), FetchOutcome::Applied);
        assert_eq!(session.video_title(), "A");
        assert_eq!(session.entries().len(), 1);
        assert!(!session.is_loading());
    }

    #[test]
    fn test_superseded_response_is_discarded() {
        let mut session = SessionState::new();
        let first = session.begin_load("aaaaaaaaaaa");
        let second = session.begin_load("bbbbbbbbbbb");

        assert_eq!(session.apply_fetch(&first, Ok(data("A"))), FetchOutcome::Stale);
        assert_eq!(session.video_id(), "bbbbbbbbbbb");
        assert_eq!(session.video_title(), "");
        assert!(session.transcript().is_none());
        assert!(session.is_loading());

        assert_eq!(session.apply_fetch(&second, Ok(data("B"))), FetchOutcome::Applied);
        assert_eq!(session.video_title(), "B");
    }

    #[test]
    fn test_reloading_same_video_invalidates_old_tag() {
        let mut session = SessionState::new();
        let first = session.begin_load("aaaaaaaaaaa");
        let _second = session.begin_load("aaaaaaaaaaa");
        assert_eq!(session.apply_fetch(&first, Ok(data("A"))), FetchOutcome::Stale);
    }

    #[test]
    fn test_tag_cannot_be_applied_twice() {
        let mut session = SessionState::new();
        let tag = session.begin_load("aaaaaaaaaaa");
        session.apply_fetch(&tag, Ok(data("A")));
        session.add_note("kept");
        assert_eq!(session.apply_fetch(&tag, Ok(data("again"))), FetchOutcome::Stale);
        assert_eq!(session.video_title(), "A");
        assert_eq!(session.notebook().len(), 1);
    }

    #[test]
    fn test_load_resets_everything_but_scope() {
        let mut session = SessionState::with_scope(InitScope::Plain);
        let tag = session.begin_load("aaaaaaaaaaa");
        session.apply_fetch(&tag, Ok(data("A")));
        session.set_current_time(5.0);
        session.add_note("note");
        session.mark_init_copied();

        session.begin_load("bbbbbbbbbbb");
        assert_eq!(session.current_time(), 0.0);
        assert!(session.notebook().is_empty());
        assert!(!session.init_already_copied());
        assert!(session.chapters().is_empty());
        assert_eq!(session.init_scope(), InitScope::Plain);
    }

    #[test]
    fn test_failed_fetch_enters_manual_mode() {
        let mut session = SessionState::new();
        let tag = session.begin_load("aaaaaaaaaaa");
        let outcome = session.apply_fetch(
            &tag,
            Err(VideoTutorError::TranscriptUnavailable {
                video_id: "aaaaaaaaaaa".to_string(),
                reason: "No transcript available for this video.".to_string(),
            }),
        );

        assert!(matches!(outcome, FetchOutcome::Failed { .. }));
        assert!(session.is_manual_entry());
        assert!(!session.apply_manual_transcript("   "));
        assert!(session.apply_manual_transcript("typed by hand"));
        let transcript = session.transcript().unwrap();
        assert!(transcript.entries.is_empty());
        assert_eq!(transcript.plain_text, "typed by hand");
    }

    #[test]
    fn test_manual_transcript_refused_after_successful_fetch() {
        let mut session = SessionState::new();
        assert!(!session.apply_manual_transcript("nothing loaded yet"));

        let tag = session.begin_load("aaaaaaaaaaa");
        session.apply_fetch(&tag, Ok(data("A")));
        assert!(!session.apply_manual_transcript("pasted over a real transcript"));

        let transcript = session.transcript().unwrap();
        assert_eq!(transcript.entries.len(), 1);
        assert_eq!(transcript.plain_text, "[00:01] hello");
        assert_eq!(session.entries().len(), 1);
    }

    #[test]
    fn test_current_time_rejects_non_finite() {
        let mut session = SessionState::new();
        session.set_current_time(12.0);
        session.set_current_time(f64::NAN);
        assert_eq!(session.current_time(), 12.0);
        session.set_current_time(-3.0);
        assert_eq!(session.current_time(), 0.0);
    }

    #[test]
    fn test_active_lookup_follows_current_time() {
        let mut session = SessionState::new();
        let tag = session.begin_load("aaaaaaaaaaa");
        session.apply_fetch(&tag, Ok(data("A")));

        session.set_current_time(0.5);
        assert!(session.active_entry().is_none());
        assert_eq!(session.active_chapter().unwrap().title, "Only");

        session.set_current_time(10.0);
        assert_eq!(session.active_entry().unwrap().text, "hello");
        assert!(session.active_chapter().is_none());
    }
}
