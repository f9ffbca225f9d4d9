use log::debug;
use serde_json::Value;

use crate::config::ApiEndpoint;
use crate::media::error::MediaError;

/// Shared HTTP client for the media-service APIs. All of them authenticate
/// with an `X-Api-Key` header and speak JSON.
pub struct ApiClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(endpoint: &ApiEndpoint) -> Self {
        Self {
            base_url: endpoint.url.trim_end_matches('/').to_string(),
            api_key: endpoint.token.clone(),
            client: reqwest::Client::new(),
        }
    }

    pub async fn get_json(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Value, MediaError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::UnexpectedStatus {
                status: status.as_u16(),
                endpoint: path.to_string(),
            });
        }

        Ok(response.json::<Value>().await?)
    }
}
