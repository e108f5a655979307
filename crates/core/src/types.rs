use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::format::{format_timestamp, format_transcript_with_timestamps};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TranscriptSource {
    Manual,
    AutoGenerated,
    #[default]
    Unknown,
}

impl TranscriptSource {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "manual" => TranscriptSource::Manual,
            "auto-generated" => TranscriptSource::AutoGenerated,
            _ => TranscriptSource::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TranscriptSource::Manual => "manual",
            TranscriptSource::AutoGenerated => "auto-generated",
            TranscriptSource::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub start_seconds: f64,
    pub text: String,
    pub display_timestamp: Option<String>,
}

impl TranscriptEntry {
    /// Display timestamp as delivered, or one derived from the start time.
    pub fn timestamp(&self) -> String {
        self.display_timestamp
            .clone()
            .unwrap_or_else(|| format_timestamp(self.start_seconds))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub entries: Vec<TranscriptEntry>,
    pub plain_text: String,
    pub source: TranscriptSource,
}

impl Transcript {
    /// Builds a transcript from entries in any order. Entries are sorted by
    /// start time; `plain_text` is computed when not supplied.
    pub fn new(
        mut entries: Vec<TranscriptEntry>,
        plain_text: Option<String>,
        source: TranscriptSource,
    ) -> Self {
        entries.sort_by(|a, b| a.start_seconds.total_cmp(&b.start_seconds));
        let plain_text = plain_text
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| format_transcript_with_timestamps(&entries));
        Self {
            entries,
            plain_text,
            source,
        }
    }

    /// Transcript pasted by hand after a failed fetch: no entries, no timing.
    pub fn manual(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            entries: Vec::new(),
            plain_text: text.to_string(),
            source: TranscriptSource::Unknown,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub title: String,
    pub start_seconds: f64,
    /// Exclusive.
    pub end_seconds: f64,
    pub display_timestamp: String,
}

impl Chapter {
    pub fn contains(&self, seconds: f64) -> bool {
        self.start_seconds <= seconds && seconds < self.end_seconds
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub channel: Option<String>,
    pub subscriber_count: Option<u64>,
    pub upload_date: Option<String>,
    pub duration_seconds: Option<f64>,
    pub view_count: Option<u64>,
    pub like_count: Option<u64>,
    pub categories: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub description: Option<String>,
    pub playlist_title: Option<String>,
    pub playlist_index: Option<u32>,
    pub playlist_count: Option<u32>,
    pub transcript_source: Option<TranscriptSource>,
}

impl VideoMetadata {
    pub fn has_playlist(&self) -> bool {
        self.playlist_title
            .as_deref()
            .is_some_and(|title| !title.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteEntry {
    pub display_timestamp: String,
    /// Empty when the note was taken outside any chapter.
    pub chapter_title: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub time_seconds: f64,
}

/// Which transcript rendering feeds the initialization message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitScope {
    #[default]
    Timestamped,
    Plain,
}

impl InitScope {
    /// Unrecognized values fall back to `Timestamped`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "plain" => InitScope::Plain,
            _ => InitScope::Timestamped,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InitScope::Timestamped => "timestamped",
            InitScope::Plain => "plain",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_sorts_entries_and_builds_plain_text() {
        let entries = vec![
            TranscriptEntry {
                start_seconds: 5.0,
                text: "second".to_string(),
                display_timestamp: None,
            },
            TranscriptEntry {
                start_seconds: 0.0,
                text: "first".to_string(),
                display_timestamp: Some("00:00".to_string()),
            },
        ];
        let transcript = Transcript::new(entries, None, TranscriptSource::Manual);

        assert_eq!(transcript.entries[0].text, "first");
        assert_eq!(transcript.plain_text, "[00:00] first\n[0:05] second");
    }

    #[test]
    fn test_manual_transcript_rejects_blank_text() {
        assert!(Transcript::manual("   \n").is_none());
        let transcript = Transcript::manual(" pasted words ").unwrap();
        assert!(transcript.entries.is_empty());
        assert_eq!(transcript.plain_text, "pasted words");
    }

    #[test]
    fn test_scope_parse_falls_back_to_timestamped() {
        assert_eq!(InitScope::parse("plain"), InitScope::Plain);
        assert_eq!(InitScope::parse("PLAIN"), InitScope::Plain);
        assert_eq!(InitScope::parse("timestamped"), InitScope::Timestamped);
        assert_eq!(InitScope::parse("bogus"), InitScope::Timestamped);
        assert_eq!(InitScope::parse(""), InitScope::Timestamped);
    }

    #[test]
    fn test_transcript_source_parse() {
        assert_eq!(TranscriptSource::parse("manual"), TranscriptSource::Manual);
        assert_eq!(
            TranscriptSource::parse("auto-generated"),
            TranscriptSource::AutoGenerated
        );
        assert_eq!(TranscriptSource::parse("other"), TranscriptSource::Unknown);
    }
}
