//! Core data models for the relay service

use serde::{Deserialize, Serialize};

/// Resolved metadata for a single video, shaped for the JSON API.
///
/// Built per request from the collaborator manifest; never persisted
/// server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub id: String,

    pub title: String,

    /// Duration in seconds, when the upstream manifest reports one.
    pub duration: Option<u64>,

    pub views: Option<u64>,

    pub channel: Option<String>,

    pub thumbnail: Option<String>,

    pub formats: Vec<FormatDescriptor>,
}

/// One selectable encoded variant of a video.
///
/// `itag` is the opaque token used to pick this variant on the download
/// endpoint. Immutable once resolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormatDescriptor {
    pub itag: String,

    pub quality: String,

    /// Container extension (mp4, webm, ...).
    pub format: String,

    /// Human size string ("45.0 MB") or "Unknown".
    pub size: String,

    pub fps: Option<u64>,

    pub bitrate: Option<u64>,
}

/// Playable formats split by media type for the formats endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormatGroups {
    pub video: Vec<FormatDescriptor>,

    pub audio: Vec<FormatDescriptor>,
}

/// Health check payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,

    pub timestamp: String,
}

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Format not found: {0}")]
    FormatNotFound(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Parsing error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
