//! VideoTutor Core Library
//!
//! Context assembly and playback synchronization for studying a video with
//! an external AI assistant: time-indexed transcript lookup, the message
//! templater, the notebook, and the auto-scroll arbiter.

pub mod clipboard;
pub mod config;
pub mod error;
pub mod format;
pub mod message;
pub mod notebook;
pub mod paths;
pub mod playback;
pub mod preferences;
pub mod provider;
pub mod scroll;
pub mod session;
pub mod time_index;
pub mod types;
pub mod video;

// Re-export commonly used items at crate root
pub use clipboard::{ClipboardSink, CommandClipboard, CopyOutcome, FallbackSink, copy_text};
pub use config::{AppConfig, ProviderConfig, load_config};
pub use error::{Result, VideoTutorError};
pub use format::{format_count, format_timestamp, parse_timestamp};
pub use message::{
    ExportDocument, MessageOptions, build_context_snippet, build_export_document,
    build_init_message, transcript_for_scope,
};
pub use notebook::NotebookLog;
pub use playback::{PlaybackControl, PlaybackSync, TickUpdate, playback_interval};
pub use preferences::{JsonFilePreferenceStore, PreferenceStore, Preferences};
pub use provider::{HttpTranscriptProvider, TranscriptProvider};
pub use scroll::{Clock, ManualClock, ScrollArbiter, ScrollState, SystemClock};
pub use session::{FetchOutcome, RequestTag, SessionState, VideoData};
pub use time_index::TimeIndex;
pub use types::{
    Chapter, InitScope, NoteEntry, Transcript, TranscriptEntry, TranscriptSource, VideoMetadata,
};
pub use video::{extract_video_id, require_video_id, watch_url};
