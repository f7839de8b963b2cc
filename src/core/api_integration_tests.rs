//! Integration tests for the metadata endpoints
//!
//! Drives the axum handlers directly with a stubbed extractor, the same way
//! a request would reach them through the router.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::to_bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::api::video::{formats, video_info, UrlQuery};
use crate::api::{health, AppState};
use crate::core::extractor::{ByteStream, ManifestEntry, MediaExtractor, MediaManifest};
use crate::core::models::{AppError, AppResult};
use crate::core::AppConfig;

const WATCH_URL: &str = "https://www.youtube.com/watch?v=abc123";

struct StubExtractor {
    manifest: Option<MediaManifest>,
}

#[async_trait]
impl MediaExtractor for StubExtractor {
    async fn fetch_manifest(&self, _url: &str) -> AppResult<MediaManifest> {
        self.manifest
            .clone()
            .ok_or_else(|| AppError::Extraction("Video unavailable".to_string()))
    }

    async fn open_stream(&self, _entry: &ManifestEntry) -> AppResult<ByteStream> {
        Err(AppError::Stream("not used here".to_string()))
    }
}

fn entry(itag: &str, has_video: bool, has_audio: bool) -> ManifestEntry {
    ManifestEntry {
        itag: itag.to_string(),
        container: "mp4".to_string(),
        quality_label: has_video.then(|| "720p".to_string()),
        audio_quality: (!has_video).then(|| "AUDIO_QUALITY_MEDIUM".to_string()),
        content_length: Some(47_185_920),
        bitrate: Some(1_000_000),
        fps: has_video.then_some(30),
        has_video,
        has_audio,
        source_url: String::new(),
    }
}

fn sample_manifest() -> MediaManifest {
    MediaManifest {
        video_id: "abc123".to_string(),
        title: "Sample Video".to_string(),
        channel: Some("Tech Channel".to_string()),
        duration_seconds: Some(630),
        view_count: Some(1_234_567),
        thumbnail_url: Some("https://i.ytimg.com/vi/abc123/hq720.jpg".to_string()),
        entries: vec![
            entry("22", true, true),
            entry("140", false, true),
            entry("137", true, false),
        ],
    }
}

fn state_over(manifest: Option<MediaManifest>) -> AppState {
    AppState {
        extractor: Arc::new(StubExtractor { manifest }),
        config: Arc::new(AppConfig::default()),
    }
}

fn url_query(url: Option<&str>) -> Query<UrlQuery> {
    Query(UrlQuery {
        url: url.map(str::to_string),
    })
}

async fn error_message(err: crate::api::ApiError) -> (StatusCode, String) {
    let response = err.into_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, value["error"].as_str().unwrap_or_default().to_string())
}

#[tokio::test]
async fn test_video_info_returns_playable_formats_only() {
    let state = state_over(Some(sample_manifest()));

    let metadata = video_info(State(state), url_query(Some(WATCH_URL)))
        .await
        .unwrap()
        .0;

    assert_eq!(metadata.id, "abc123");
    assert_eq!(metadata.title, "Sample Video");
    assert_eq!(metadata.duration, Some(630));
    assert_eq!(metadata.views, Some(1_234_567));

    let itags: Vec<&str> = metadata.formats.iter().map(|f| f.itag.as_str()).collect();
    assert_eq!(itags, vec!["22", "140"]);
    assert_eq!(metadata.formats[0].size, "45.0 MB");
}

#[tokio::test]
async fn test_video_info_requires_url() {
    let state = state_over(Some(sample_manifest()));

    let err = video_info(State(state), url_query(None)).await.unwrap_err();
    let (status, message) = error_message(err).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message, "URL is required");
}

#[tokio::test]
async fn test_video_info_rejects_invalid_url() {
    let state = state_over(Some(sample_manifest()));

    let err = video_info(State(state), url_query(Some("https://example.com/clip")))
        .await
        .unwrap_err();
    let (status, message) = error_message(err).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(message.starts_with("Invalid URL:"));
}

#[tokio::test]
async fn test_video_info_surfaces_extraction_failure() {
    let state = state_over(None);

    let err = video_info(State(state), url_query(Some(WATCH_URL)))
        .await
        .unwrap_err();
    let (status, message) = error_message(err).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        message,
        "Failed to get video info: Extraction error: Video unavailable"
    );
}

#[tokio::test]
async fn test_formats_split_by_media_type() {
    let state = state_over(Some(sample_manifest()));

    let groups = formats(State(state), url_query(Some(WATCH_URL)))
        .await
        .unwrap()
        .0;

    assert_eq!(groups.video.len(), 1);
    assert_eq!(groups.video[0].itag, "22");
    assert_eq!(groups.video[0].quality, "720p");
    assert_eq!(groups.audio.len(), 1);
    assert_eq!(groups.audio[0].itag, "140");
    assert_eq!(groups.audio[0].quality, "AUDIO_QUALITY_MEDIUM");
}

#[tokio::test]
async fn test_health_reports_ok_with_timestamp() {
    let payload = health().await.0;

    assert_eq!(payload.status, "OK");
    assert!(chrono::DateTime::parse_from_rfc3339(&payload.timestamp).is_ok());
}
