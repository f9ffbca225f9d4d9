//! HTTP clients for the upstream media-management APIs.

use async_trait::async_trait;
use serde::Deserialize;

pub mod api_client;
pub mod error;
pub mod overseerr;
pub mod radarr;
pub mod sonarr;

pub use overseerr::OverseerrClient;
pub use radarr::RadarrClient;
pub use sonarr::SonarrClient;

use crate::media::error::MediaError;

/// Canonical title and overview for a referenced item. Either field may be
/// absent when the upstream record is incomplete.
#[derive(Clone, Debug, Default)]
pub struct MediaMetadata {
    pub title: Option<String>,
    pub overview: Option<String>,
}

/// Metadata lookup used to enrich request notifications.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn movie_metadata(&self, tmdb_id: i64) -> Result<MediaMetadata, MediaError>;
    async fn series_metadata(&self, tmdb_id: i64) -> Result<MediaMetadata, MediaError>;
}

/// One pending item in a download queue.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub timeleft: Option<String>,
}

/// First page of a download queue.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuePage {
    #[serde(default)]
    pub total_records: u64,
    #[serde(default)]
    pub records: Vec<QueueItem>,
}
