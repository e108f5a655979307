//! Text artifacts pasted into an external assistant.
//!
//! Every builder here is a pure function of a session snapshot and options.
//! The initialization message is an ordered list of optional sections joined
//! by a blank line, so each section can be tested on its own.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    format::{
        format_count, format_timestamp, format_transcript_plain, format_upload_date,
    },
    session::SessionState,
    types::{InitScope, Transcript, TranscriptSource, VideoMetadata},
    video::{export_filename, watch_url},
};

const SECTION_SEPARATOR: &str = "\n\n";
const UNTITLED: &str = "Untitled";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageOptions {
    pub include_description: bool,
    /// Ask for a whole-video summary up front.
    pub summary: bool,
    /// Ask for per-chapter summaries; only honoured when chapters exist.
    pub chapter_summary: bool,
}

impl Default for MessageOptions {
    fn default() -> Self {
        Self {
            include_description: true,
            summary: true,
            chapter_summary: true,
        }
    }
}

pub struct MessageInput<'a> {
    pub session: &'a SessionState,
    pub options: &'a MessageOptions,
    pub related_threads: &'a [String],
}

impl MessageInput<'_> {
    fn metadata(&self) -> Option<&VideoMetadata> {
        self.session.metadata()
    }

    fn transcript_source(&self) -> TranscriptSource {
        self.metadata()
            .and_then(|m| m.transcript_source)
            .or_else(|| self.session.transcript().map(|t| t.source))
            .unwrap_or_default()
    }
}

type SectionBuilder = fn(&MessageInput<'_>) -> Option<String>;

const INIT_SECTIONS: [SectionBuilder; 7] = [
    video_information_section,
    series_context_section,
    chapters_section,
    description_section,
    related_conversations_section,
    transcript_section,
    instructions_section,
];

/// The one-time, full-context message that opens a conversation.
pub fn build_init_message(
    session: &SessionState,
    options: &MessageOptions,
    related_threads: &[String],
) -> String {
    let input = MessageInput {
        session,
        options,
        related_threads,
    };
    INIT_SECTIONS
        .iter()
        .filter_map(|section| section(&input))
        .collect::<Vec<_>>()
        .join(SECTION_SEPARATOR)
}

/// Transcript text for the chosen scope. Without timed entries (manual
/// paste) both scopes render the stored text.
pub fn transcript_for_scope(transcript: &Transcript, scope: InitScope) -> String {
    if transcript.entries.is_empty() {
        return transcript.plain_text.clone();
    }
    match scope {
        InitScope::Timestamped => transcript.plain_text.clone(),
        InitScope::Plain => format_transcript_plain(&transcript.entries),
    }
}

fn title_or_untitled(title: &str) -> &str {
    let title = title.trim();
    if title.is_empty() { UNTITLED } else { title }
}

fn text_or_unknown(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("Unknown")
        .to_string()
}

fn non_empty_list(values: Option<&Vec<String>>) -> Option<String> {
    let values: Vec<&str> = values?
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect();
    (!values.is_empty()).then(|| values.join(", "))
}

pub fn video_information_section(input: &MessageInput<'_>) -> Option<String> {
    let session = input.session;
    let meta = input.metadata();

    let mut lines = vec![
        "## Video Information".to_string(),
        format!("Title: {}", title_or_untitled(session.video_title())),
        format!(
            "Channel: {} ({} subscribers)",
            text_or_unknown(meta.and_then(|m| m.channel.as_deref())),
            format_count(meta.and_then(|m| m.subscriber_count).unwrap_or(0))
        ),
        format!("URL: {}", watch_url(session.video_id())),
        format!(
            "Uploaded: {}",
            meta.and_then(|m| m.upload_date.as_deref())
                .filter(|d| !d.trim().is_empty())
                .map(format_upload_date)
                .unwrap_or_else(|| "Unknown".to_string())
        ),
        format!(
            "Duration: {}",
            meta.and_then(|m| m.duration_seconds)
                .filter(|d| *d > 0.0)
                .map(format_timestamp)
                .unwrap_or_else(|| "Unknown".to_string())
        ),
        format!(
            "Views: {}",
            format_count(meta.and_then(|m| m.view_count).unwrap_or(0))
        ),
        format!(
            "Likes: {}",
            format_count(meta.and_then(|m| m.like_count).unwrap_or(0))
        ),
    ];
    if let Some(categories) = non_empty_list(meta.and_then(|m| m.categories.as_ref())) {
        lines.push(format!("Categories: {}", categories));
    }
    if let Some(tags) = non_empty_list(meta.and_then(|m| m.tags.as_ref())) {
        lines.push(format!("Tags: {}", tags));
    }
    lines.push(format!(
        "Transcript source: {}",
        input.transcript_source().label()
    ));

    Some(lines.join("\n"))
}

pub fn series_context_section(input: &MessageInput<'_>) -> Option<String> {
    let meta = input.metadata().filter(|m| m.has_playlist())?;
    let title = meta.playlist_title.as_deref()?.trim();

    let position = match (meta.playlist_index, meta.playlist_count) {
        (Some(index), Some(count)) => format!("part {} of {}", index, count),
        (Some(index), None) => format!("part {}", index),
        _ => "part".to_string(),
    };
    Some(format!(
        "## Series Context\nThis video is {} of the series \"{}\".",
        position, title
    ))
}

pub fn chapters_section(input: &MessageInput<'_>) -> Option<String> {
    let chapters = input.session.chapters();
    if chapters.is_empty() {
        return None;
    }
    let lines = chapters
        .iter()
        .map(|chapter| format!("[{}] {}", chapter.display_timestamp, chapter.title))
        .collect::<Vec<_>>()
        .join("\n");
    Some(format!("## Video Chapters\n{}", lines))
}

pub fn description_section(input: &MessageInput<'_>) -> Option<String> {
    if !input.options.include_description {
        return None;
    }
    let description = input
        .metadata()
        .and_then(|m| m.description.as_deref())
        .map(str::trim)
        .filter(|d| !d.is_empty())?;
    Some(format!("## Video Description\n{}", description))
}

pub fn related_conversations_section(input: &MessageInput<'_>) -> Option<String> {
    let threads: Vec<String> = input
        .related_threads
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| format!("- {}", t))
        .collect();
    if threads.is_empty() {
        return None;
    }
    Some(format!(
        "## Related Conversations\nI have discussed related material in these earlier conversations:\n{}",
        threads.join("\n")
    ))
}

pub fn transcript_section(input: &MessageInput<'_>) -> Option<String> {
    let body = input
        .session
        .transcript()
        .map(|t| transcript_for_scope(t, input.session.init_scope()))
        .filter(|body| !body.trim().is_empty())
        .unwrap_or_else(|| "(no transcript available)".to_string());
    Some(format!("## Transcript\n{}", body))
}

pub fn instructions_section(input: &MessageInput<'_>) -> Option<String> {
    let has_chapters = !input.session.chapters().is_empty();
    let mut bullets = vec![
        "I will ask questions while I watch. Each question starts with a bracketed line giving my current timestamp and chapter.",
        "Ground your answers in the transcript around that timestamp, and say so when something is not covered by the video.",
    ];
    if input.options.summary {
        bullets.push("Start by giving me a short summary of the whole video.");
    }
    if input.options.chapter_summary && has_chapters {
        bullets.push("Then summarize each chapter in two or three sentences.");
    }
    if input.metadata().is_some_and(VideoMetadata::has_playlist) {
        bullets.push(
            "This video is part of a series; connect ideas to earlier or later parts when it helps.",
        );
    }
    if input.transcript_source() == TranscriptSource::AutoGenerated {
        bullets.push(
            "The transcript is auto-generated and may contain misheard words, especially names and technical terms; infer the intended meaning from context.",
        );
    }
    if !input.options.summary {
        bullets.push("For now, just confirm that you have read this context.");
    }

    let body = bullets
        .iter()
        .map(|b| format!("- {}", b))
        .collect::<Vec<_>>()
        .join("\n");
    Some(format!("## Instructions\n{}", body))
}

/// Short per-question reminder of where the viewer is.
pub fn build_context_snippet(session: &SessionState) -> String {
    let mut snippet = format!(
        "[Timestamp: {}. Video title: \"{}\"",
        format_timestamp(session.current_time()),
        title_or_untitled(session.video_title())
    );
    if let Some(chapter) = session.active_chapter() {
        snippet.push_str(&format!(". Chapter: \"{}\"", chapter.title));
    }
    snippet.push_str(".]");
    snippet
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub markdown: String,
    pub filename: String,
}

/// Markdown export of the notebook, notes in the order they were taken.
pub fn build_export_document(session: &SessionState, exported_on: NaiveDate) -> ExportDocument {
    let header = format!(
        "# Notes: {}\n\nVideo: {}\nExported: {}",
        title_or_untitled(session.video_title()),
        watch_url(session.video_id()),
        exported_on.format("%Y-%m-%d")
    );

    let mut blocks = vec![header];
    blocks.extend(session.notebook().notes().iter().map(|note| {
        let stamp = if note.chapter_title.is_empty() {
            format!("[{}]", note.display_timestamp)
        } else {
            format!("[{} | {}]", note.display_timestamp, note.chapter_title)
        };
        format!("{}\n{}", stamp, note.text)
    }));

    let mut markdown = blocks.join(SECTION_SEPARATOR);
    markdown.push('\n');

    ExportDocument {
        markdown,
        filename: export_filename(session.video_id()),
    }
}
