//! Streaming download proxy handler
//!
//! Relays the raw bytes of one encoded variant from the extraction
//! collaborator to the HTTP client. The payload is never written to disk or
//! accumulated in memory; the response body holds exactly one chunk in
//! flight, so backpressure flows from the client socket straight to the
//! upstream read.

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::header::{self, HeaderValue};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::api::{ApiError, ApiResult, AppState};
use crate::core::models::AppError;
use crate::core::resolver::attachment_file_name;
use crate::core::VideoInfoResolver;

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub url: Option<String>,
    pub itag: Option<String>,
}

/// `GET /api/download?url=&itag=`: streamed attachment of one variant.
pub async fn download(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> ApiResult<Response> {
    let (url, itag) = match (non_empty(query.url), non_empty(query.itag)) {
        (Some(url), Some(itag)) => (url, itag),
        _ => return Err(ApiError::bad_request("URL and itag are required")),
    };

    let request_id = Uuid::new_v4();
    info!("⬇️ [{}] Download requested: itag {} of {}", request_id, itag, url);

    // The manifest is re-resolved on every download call; the info call that
    // preceded it may have observed different upstream data.
    let resolver = VideoInfoResolver::new(state.extractor.clone());
    let manifest = match resolver.manifest(&url).await {
        Ok(manifest) => manifest,
        Err(err @ AppError::InvalidUrl(_)) => return Err(ApiError::bad_request(err.to_string())),
        Err(err) => {
            error!("❌ [{}] Manifest resolution failed: {}", request_id, err);
            return Err(ApiError::internal(format!(
                "Failed to download video: {}",
                err
            )));
        }
    };

    let Some(entry) = manifest.find_entry(&itag) else {
        warn!(
            "[{}] Format {} not in manifest for {}",
            request_id, itag, manifest.video_id
        );
        return Err(ApiError::bad_request("Format not found"));
    };

    // Open the upstream stream before committing any response byte, so an
    // open failure still yields a clean error status. Once streaming has
    // begun there is no way to signal an error; a mid-stream upstream
    // failure terminates the connection.
    let stream = match state.extractor.open_stream(entry).await {
        Ok(stream) => stream,
        Err(err) => {
            error!("❌ [{}] Failed to open upstream stream: {}", request_id, err);
            return Err(ApiError::internal(format!(
                "Failed to download video: {}",
                err
            )));
        }
    };

    let file_name = attachment_file_name(&manifest, entry);
    match entry.content_length {
        Some(length) => info!("🚚 [{}] Relaying {} ({} bytes)", request_id, file_name, length),
        None => info!("🚚 [{}] Relaying {} (length unknown)", request_id, file_name),
    }

    let mut response = Body::from_stream(stream).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("video/mp4"));
    if let Ok(value) = format!("attachment; filename=\"{}\"", file_name).parse() {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    if let Some(length) = entry.content_length {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
    }

    Ok(response)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
