#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum MediaError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Unexpected status {status} from `{endpoint}`")]
    UnexpectedStatus { status: u16, endpoint: String },

    #[error("Failed to parse API response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}
