use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, VideoTutorError};

static URL_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:v=|/v/|youtu\.be/)([a-zA-Z0-9_-]{11})").expect("valid video id pattern")
});
static BARE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-zA-Z0-9_-]{11})$").expect("valid bare id pattern"));

/// Extract the 11-character video id from a watch URL, short link, or a
/// bare id.
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();
    [&*URL_ID, &*BARE_ID]
        .iter()
        .find_map(|re| re.captures(input))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

pub fn require_video_id(input: &str) -> Result<String> {
    extract_video_id(input).ok_or_else(|| VideoTutorError::InvalidUrl {
        input: input.to_string(),
    })
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// Suggested filename for an exported notebook
pub fn export_filename(video_id: &str) -> String {
    format!("videotutor-notes-{}.md", video_id)
}
