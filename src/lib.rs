//! tube-relay - Core Library
//!
//! This library provides the core functionality for the download relay
//! service: URL validation, manifest resolution through an injected
//! extraction collaborator, the streaming download proxy, and the client-side
//! progress and history types used by the terminal client.

pub mod api;
pub mod core;
pub mod utils;

// Re-export commonly used types
pub use crate::api::{router, AppState};
pub use crate::core::{
    config::AppConfig,
    extractor::{MediaExtractor, MediaManifest},
    history::{DownloadHistory, HistoryEntry, HistoryStore},
    models::{AppError, AppResult, FormatDescriptor, VideoMetadata},
    progress::{ProgressState, SyntheticProgress, TransferProgress},
    resolver::VideoInfoResolver,
    ytdl::RustyExtractor,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(!NAME.is_empty());
    }
}
