use crate::config::ApiEndpoint;
use crate::media::api_client::ApiClient;
use crate::media::error::MediaError;
use crate::media::QueuePage;

pub struct RadarrClient {
    api: ApiClient,
}

impl RadarrClient {
    pub fn new(endpoint: &ApiEndpoint) -> Self {
        Self {
            api: ApiClient::new(endpoint),
        }
    }

    /// Fetches the first page of the download queue.
    pub async fn get_queue(&self) -> Result<QueuePage, MediaError> {
        let body = self.api.get_json("/api/v3/queue", &[("page", "1")]).await?;
        Ok(serde_json::from_value(body)?)
    }
}
