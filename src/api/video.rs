//! Video metadata and format handlers

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::{error, info};

use crate::api::{ApiError, ApiResult, AppState};
use crate::core::models::{AppError, FormatGroups, VideoMetadata};
use crate::core::VideoInfoResolver;

#[derive(Debug, Deserialize)]
pub struct UrlQuery {
    pub url: Option<String>,
}

/// `GET /api/video-info?url=`: resolved metadata with playable formats.
pub async fn video_info(
    State(state): State<AppState>,
    Query(query): Query<UrlQuery>,
) -> ApiResult<Json<VideoMetadata>> {
    let url = require_url(query.url)?;
    info!("📺 Resolving video info for: {}", url);

    let resolver = VideoInfoResolver::new(state.extractor.clone());
    match resolver.resolve(&url).await {
        Ok(metadata) => {
            info!(
                "✅ Resolved {} playable formats for video: {}",
                metadata.formats.len(),
                metadata.id
            );
            Ok(Json(metadata))
        }
        Err(err @ AppError::InvalidUrl(_)) => Err(ApiError::bad_request(err.to_string())),
        Err(err) => {
            error!("❌ Failed to get video info: {}", err);
            Err(ApiError::internal(format!(
                "Failed to get video info: {}",
                err
            )))
        }
    }
}

/// `GET /api/formats?url=`: playable formats split by media type.
pub async fn formats(
    State(state): State<AppState>,
    Query(query): Query<UrlQuery>,
) -> ApiResult<Json<FormatGroups>> {
    let url = require_url(query.url)?;
    info!("🎬 Resolving formats for: {}", url);

    let resolver = VideoInfoResolver::new(state.extractor.clone());
    match resolver.resolve_format_groups(&url).await {
        Ok(groups) => {
            info!(
                "✅ Resolved {} video / {} audio formats",
                groups.video.len(),
                groups.audio.len()
            );
            Ok(Json(groups))
        }
        Err(err @ AppError::InvalidUrl(_)) => Err(ApiError::bad_request(err.to_string())),
        Err(err) => {
            error!("❌ Failed to get formats: {}", err);
            Err(ApiError::internal(format!("Failed to get formats: {}", err)))
        }
    }
}

pub(crate) fn require_url(url: Option<String>) -> Result<String, ApiError> {
    url.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::bad_request("URL is required"))
}
