use thiserror::Error;

#[derive(Error, Debug)]
pub enum VideoTutorError {
    #[error("Could not extract video ID from {input}")]
    InvalidUrl { input: String },

    #[error("Transcript unavailable for {video_id}: {reason}")]
    TranscriptUnavailable { video_id: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Transcript request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Config parse error: {0}")]
    ConfigError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, VideoTutorError>;
