//! HTTP API surface
//!
//! Thin axum handlers over the core resolver and relay. Handlers construct
//! their collaborators per request; the shared [`AppState`] only carries the
//! injected extractor and the loaded configuration. Every failure renders as
//! `{"error": <message>}` with a 400 or 500 status.

pub mod download;
pub mod video;

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use tokio_util::io::ReaderStream;

use crate::core::models::HealthStatus;
use crate::core::{AppConfig, MediaExtractor};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<dyn MediaExtractor>,
    pub config: Arc<AppConfig>,
}

/// JSON API error carrying the HTTP status to respond with.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Creates a 400 error with the provided message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// Creates a 404 error with the provided message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    /// Creates a 500 error with the provided message.
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        let body = serde_json::json!({
            "error": self.message,
        });
        (self.status, headers, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Build the service router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/video-info", get(video::video_info))
        .route("/api/formats", get(video::formats))
        .route("/api/download", get(download::download))
        .route("/api/health", get(health))
        .fallback(static_fallback)
        .with_state(state)
}

pub(crate) async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "OK".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Serve the static web client for anything outside `/api`.
async fn static_fallback(State(state): State<AppState>, req: Request) -> Response {
    let path = req.uri().path();
    if path == "/api" || path.starts_with("/api/") {
        return ApiError::not_found("endpoint not found").into_response();
    }

    let Some(root) = state.config.server.www_root.as_deref() else {
        return ApiError::not_found("file not found").into_response();
    };

    match serve_www_path(root, path).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

async fn serve_www_path(root: &Path, request_path: &str) -> ApiResult<Response> {
    let target = resolve_www_path(root, request_path)?;
    let is_dir = tokio::fs::metadata(&target)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false);

    if is_dir {
        stream_file(root.join("index.html")).await
    } else {
        stream_file(target).await
    }
}

/// Resolve a request path under the web root, refusing anything that is not
/// a plain relative component (`..`, absolute paths, drive prefixes).
fn resolve_www_path(root: &Path, request_path: &str) -> ApiResult<PathBuf> {
    let trimmed = request_path.trim_start_matches('/');
    if trimmed.is_empty() {
        return Ok(root.join("index.html"));
    }

    let candidate = Path::new(trimmed);
    if candidate
        .components()
        .any(|component| !matches!(component, Component::Normal(_)))
    {
        return Err(ApiError::not_found("file not found"));
    }
    Ok(root.join(candidate))
}

async fn stream_file(path: PathBuf) -> ApiResult<Response> {
    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|_| ApiError::not_found("file not found"))?;

    let mut response = Body::from_stream(ReaderStream::new(file)).into_response();
    if let Some(mime) = mime_guess::from_path(&path).first() {
        if let Ok(value) = mime.to_string().parse() {
            response.headers_mut().insert(header::CONTENT_TYPE, value);
        }
    }
    Ok(response)
}
