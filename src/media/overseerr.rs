use async_trait::async_trait;
use serde_json::Value;

use crate::config::ApiEndpoint;
use crate::media::api_client::ApiClient;
use crate::media::error::MediaError;
use crate::media::MediaMetadata;
use crate::media::MetadataProvider;

pub struct OverseerrClient {
    api: ApiClient,
}

impl OverseerrClient {
    pub fn new(endpoint: &ApiEndpoint) -> Self {
        Self {
            api: ApiClient::new(endpoint),
        }
    }
}

#[async_trait]
impl MetadataProvider for OverseerrClient {
    async fn movie_metadata(&self, tmdb_id: i64) -> Result<MediaMetadata, MediaError> {
        let body = self
            .api
            .get_json(&format!("/api/v1/movie/{}", tmdb_id), &[])
            .await?;
        Ok(metadata_from(&body))
    }

    async fn series_metadata(&self, tmdb_id: i64) -> Result<MediaMetadata, MediaError> {
        let body = self
            .api
            .get_json(&format!("/api/v1/tv/{}", tmdb_id), &[])
            .await?;
        Ok(metadata_from(&body))
    }
}

// Movies carry `title`, series carry `name`.
fn metadata_from(body: &Value) -> MediaMetadata {
    MediaMetadata {
        title: body
            .get("title")
            .or_else(|| body.get("name"))
            .and_then(Value::as_str)
            .map(String::from),
        overview: body
            .get("overview")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(String::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_from_movie_body() {
        let body = serde_json::json!({"title": "Inception", "overview": "A heist in dreams."});
        let metadata = metadata_from(&body);
        assert_eq!(metadata.title.as_deref(), Some("Inception"));
        assert_eq!(metadata.overview.as_deref(), Some("A heist in dreams."));
    }

    #[test]
    fn test_metadata_from_series_body_uses_name() {
        let body = serde_json::json!({"name": "Severance", "overview": ""});
        let metadata = metadata_from(&body);
        assert_eq!(metadata.title.as_deref(), Some("Severance"));
        assert!(metadata.overview.is_none());
    }
}
