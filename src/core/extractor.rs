//! Extraction collaborator seam
//!
//! Manifest resolution and payload streaming are owned by an external
//! extraction library. This module defines the narrow contract the rest of
//! the service programs against, so the collaborator is injected per request
//! instead of imported globally, and tests can substitute a scripted one.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

use crate::core::models::AppResult;

/// Byte stream of one encoded variant's payload, yielded chunk by chunk.
pub type ByteStream = BoxStream<'static, AppResult<Bytes>>;

/// Contract for the external extraction collaborator.
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Fetch the manifest for a video URL: identity fields plus every
    /// encoded variant the upstream service currently offers.
    async fn fetch_manifest(&self, url: &str) -> AppResult<MediaManifest>;

    /// Open a byte stream for one manifest entry. The stream must yield the
    /// payload verbatim and must not buffer ahead of the consumer.
    async fn open_stream(&self, entry: &ManifestEntry) -> AppResult<ByteStream>;
}

/// Manifest data as reported by the collaborator for a single video.
#[derive(Debug, Clone)]
pub struct MediaManifest {
    pub video_id: String,

    pub title: String,

    pub channel: Option<String>,

    pub duration_seconds: Option<u64>,

    pub view_count: Option<u64>,

    pub thumbnail_url: Option<String>,

    pub entries: Vec<ManifestEntry>,
}

impl MediaManifest {
    /// Look up an entry by its itag token.
    pub fn find_entry(&self, itag: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|entry| entry.itag == itag)
    }
}

/// One encoded variant within a manifest.
#[derive(Debug, Clone)]
pub struct ManifestEntry {
    /// Opaque token selecting this variant on the download endpoint.
    pub itag: String,

    /// Container extension (mp4, webm, ...).
    pub container: String,

    pub quality_label: Option<String>,

    pub audio_quality: Option<String>,

    pub content_length: Option<u64>,

    pub bitrate: Option<u64>,

    pub fps: Option<u64>,

    pub has_video: bool,

    pub has_audio: bool,

    /// Direct payload locator resolved by the collaborator. Opaque to the
    /// rest of the service.
    pub source_url: String,
}

impl ManifestEntry {
    /// Whether this variant plays end-to-end on its own: muxed video+audio,
    /// or audio-only. Video-only silent streams are not playable.
    pub fn is_playable(&self) -> bool {
        (self.has_video && self.has_audio) || (self.has_audio && !self.has_video)
    }
}
