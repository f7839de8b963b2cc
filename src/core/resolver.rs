//! Metadata and format resolution
//!
//! Turns a raw URL into API-facing [`VideoMetadata`] by validating the URL,
//! asking the injected extraction collaborator for a manifest, filtering the
//! reported variants down to playable ones and mapping them into
//! [`FormatDescriptor`]s. One resolver is constructed per request.

use std::sync::Arc;

use tracing::debug;

use crate::core::extractor::{ManifestEntry, MediaExtractor, MediaManifest};
use crate::core::models::{AppError, AppResult, FormatDescriptor, FormatGroups, VideoMetadata};
use crate::core::url;
use crate::utils::format::format_size_mb;

/// Request-scoped resolver over an injected extraction collaborator.
pub struct VideoInfoResolver {
    extractor: Arc<dyn MediaExtractor>,
}

impl VideoInfoResolver {
    pub fn new(extractor: Arc<dyn MediaExtractor>) -> Self {
        Self { extractor }
    }

    /// Validate the URL and fetch its manifest from the collaborator.
    ///
    /// Invalid URLs are rejected before any network call is made.
    pub async fn manifest(&self, url: &str) -> AppResult<MediaManifest> {
        if !url::is_valid_video_url(url) {
            return Err(AppError::InvalidUrl(url.to_string()));
        }

        let manifest = self.extractor.fetch_manifest(url).await?;
        debug!(
            "Manifest for {} carries {} format entries",
            manifest.video_id,
            manifest.entries.len()
        );
        Ok(manifest)
    }

    /// Resolve full video metadata with the playable format list.
    pub async fn resolve(&self, url: &str) -> AppResult<VideoMetadata> {
        let manifest = self.manifest(url).await?;

        let formats = manifest
            .entries
            .iter()
            .filter(|entry| entry.is_playable())
            .map(describe_entry)
            .collect();

        Ok(VideoMetadata {
            id: manifest.video_id,
            title: manifest.title,
            duration: manifest.duration_seconds,
            views: manifest.view_count,
            channel: manifest.channel,
            thumbnail: manifest.thumbnail_url,
            formats,
        })
    }

    /// Resolve playable formats split into video (muxed) and audio-only
    /// groups.
    pub async fn resolve_format_groups(&self, url: &str) -> AppResult<FormatGroups> {
        let manifest = self.manifest(url).await?;

        let mut groups = FormatGroups::default();
        for entry in manifest.entries.iter().filter(|entry| entry.is_playable()) {
            if entry.has_video {
                groups.video.push(describe_entry(entry));
            } else {
                groups.audio.push(describe_entry(entry));
            }
        }

        Ok(groups)
    }
}

fn describe_entry(entry: &ManifestEntry) -> FormatDescriptor {
    let quality = entry
        .quality_label
        .clone()
        .or_else(|| entry.audio_quality.clone())
        .unwrap_or_else(|| "Audio Only".to_string());

    let size = match entry.content_length {
        Some(bytes) => format_size_mb(bytes),
        None => "Unknown".to_string(),
    };

    FormatDescriptor {
        itag: entry.itag.clone(),
        quality,
        format: entry.container.clone(),
        size,
        fps: entry.fps,
        bitrate: entry.bitrate,
    }
}

/// File name offered to the client for a chosen variant:
/// `<videoId>_<itag>.<container>`, stripped of anything that could not live
/// in a filename or a `Content-Disposition` header.
pub fn attachment_file_name(manifest: &MediaManifest, entry: &ManifestEntry) -> String {
    let raw = format!("{}_{}.{}", manifest.video_id, entry.itag, entry.container);
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        .collect()
}
