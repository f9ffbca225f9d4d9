use crate::media::error::MediaError;
use crate::service::error::ServiceError;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GatewayError {
    #[error("Discord API error: {0}")]
    ApiError(#[from] serenity::Error),

    #[error("Channel {channel_id} is not a guild channel")]
    NotAGuildChannel { channel_id: u64 },

    #[error("Channel {channel_id} is not cached")]
    NotCached { channel_id: u64 },

    #[error("Invalid Discord id `{id}`")]
    InvalidId { id: u64 },
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum WebhookError {
    #[error("GatewayError: {0}")]
    Gateway(#[from] GatewayError),

    #[error("MediaError: {0}")]
    Media(#[from] MediaError),

    #[error("ServiceError: {0}")]
    Service(#[from] ServiceError),

    #[error("Malformed payload: {reason}")]
    MalformedPayload { reason: String },
}
