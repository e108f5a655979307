//! Transcript retrieval.
//!
//! The transcript service is external; this module only knows the JSON shape
//! it answers with and how to turn that into [`VideoData`].

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::{
    config::ProviderConfig,
    error::{Result, VideoTutorError},
    format::format_timestamp,
    session::VideoData,
    types::{Chapter, Transcript, TranscriptEntry, TranscriptSource, VideoMetadata},
};

pub trait TranscriptProvider {
    /// Fetch transcript, chapters and metadata for `video_id`.
    async fn fetch(&self, video_id: &str) -> Result<VideoData>;
}

#[derive(Debug, Default, Deserialize)]
pub struct TranscriptResponse {
    #[serde(default)]
    pub video_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub entries: Vec<EntryPayload>,
    #[serde(default)]
    pub plain_text: Option<String>,
    #[serde(default)]
    pub chapters: Vec<ChapterPayload>,
    #[serde(default)]
    pub metadata: Option<MetadataPayload>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EntryPayload {
    pub time: f64,
    pub text: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChapterPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub start_time: f64,
    #[serde(default)]
    pub end_time: f64,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MetadataPayload {
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub channel_subscribers: Option<u64>,
    #[serde(default)]
    pub upload_date: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub view_count: Option<u64>,
    #[serde(default)]
    pub like_count: Option<u64>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub playlist_title: Option<String>,
    #[serde(default)]
    pub playlist_index: Option<u32>,
    #[serde(default)]
    pub playlist_count: Option<u32>,
    #[serde(default)]
    pub transcript_type: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn non_zero(value: Option<u64>) -> Option<u64> {
    value.filter(|v| *v > 0)
}

impl From<MetadataPayload> for VideoMetadata {
    fn from(raw: MetadataPayload) -> Self {
        VideoMetadata {
            channel: non_empty(raw.channel),
            subscriber_count: non_zero(raw.channel_subscribers),
            upload_date: non_empty(raw.upload_date),
            duration_seconds: raw.duration.filter(|d| d.is_finite() && *d > 0.0),
            view_count: non_zero(raw.view_count),
            like_count: non_zero(raw.like_count),
            categories: raw.categories.filter(|c| !c.is_empty()),
            tags: raw.tags.filter(|t| !t.is_empty()),
            description: non_empty(raw.description),
            playlist_title: non_empty(raw.playlist_title),
            playlist_index: raw.playlist_index,
            playlist_count: raw.playlist_count,
            transcript_source: raw.transcript_type.as_deref().map(TranscriptSource::parse),
        }
    }
}

impl TranscriptResponse {
    /// Normalize the wire payload. An `error` field turns into
    /// [`VideoTutorError::TranscriptUnavailable`].
    pub fn into_video_data(self, video_id: &str) -> Result<VideoData> {
        if let Some(reason) = non_empty(self.error) {
            return Err(VideoTutorError::TranscriptUnavailable {
                video_id: video_id.to_string(),
                reason,
            });
        }

        let metadata = self.metadata.map(VideoMetadata::from);
        let source = metadata
            .as_ref()
            .and_then(|m| m.transcript_source)
            .unwrap_or_default();

        let entries: Vec<TranscriptEntry> = self
            .entries
            .into_iter()
            .filter(|e| e.time.is_finite())
            .map(|e| TranscriptEntry {
                start_seconds: e.time,
                text: e.text,
                display_timestamp: non_empty(e.timestamp),
            })
            .collect();
        let transcript = Transcript::new(entries, self.plain_text, source);

        let chapters = self
            .chapters
            .into_iter()
            .filter(|c| c.start_time.is_finite() && c.end_time.is_finite())
            .map(|c| Chapter {
                display_timestamp: non_empty(c.timestamp)
                    .unwrap_or_else(|| format_timestamp(c.start_time)),
                title: c.title,
                start_seconds: c.start_time,
                end_seconds: c.end_time,
            })
            .collect();

        Ok(VideoData {
            title: self.title,
            transcript: Some(transcript),
            chapters,
            metadata,
        })
    }
}

/// Client for the transcript service's `POST /api/transcript` endpoint.
pub struct HttpTranscriptProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTranscriptProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/api/transcript", config.base_url.trim_end_matches('/')),
        })
    }
}

impl TranscriptProvider for HttpTranscriptProvider {
    async fn fetch(&self, video_id: &str) -> Result<VideoData> {
        debug!(endpoint = %self.endpoint, video_id, "Requesting transcript");
        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({ "url": video_id }))
            .send()
            .await?;

        // Failures still carry a JSON body with an `error` message.
        let status = response.status();
        let body = response.text().await?;
        let payload: TranscriptResponse = match serde_json::from_str(&body) {
            Ok(payload) => payload,
            Err(_) if !status.is_success() => {
                return Err(VideoTutorError::TranscriptUnavailable {
                    video_id: video_id.to_string(),
                    reason: format!("transcript service answered {}", status),
                });
            }
            Err(err) => return Err(err.into()),
        };

        payload.into_video_data(video_id)
    }
}
