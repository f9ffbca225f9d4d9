//! Handler for request-system (Overseerr) notifications.
//!
//! The only handler that enriches payloads: referenced items are looked up
//! through the metadata API so the notification carries the canonical title
//! and overview. Lookup failures degrade to labeled placeholders.

use async_trait::async_trait;
use chrono::Utc;
use log::error;
use log::info;
use log::warn;
use serde_json::Value;

use crate::webhook::context::NotifyContext;
use crate::webhook::error::WebhookError;
use crate::webhook::handler::log_validation_failure;
use crate::webhook::handler::scalar_string;
use crate::webhook::handler::send_debug_copy;
use crate::webhook::handler::value_i64;
use crate::webhook::handler::value_str;
use crate::webhook::handler::SourceHandler;
use crate::webhook::message::Notification;
use crate::webhook::message::NotificationAuthor;
use crate::webhook::message::NotificationField;
use crate::webhook::message::NotificationFooter;
use crate::webhook::source::WebhookSource;

const FOOTER_ICON: &str =
    "https://raw.githubusercontent.com/sct/overseerr/develop/public/logo_full.svg";
const DEFAULT_COLOR: u32 = 0x7289da;

pub struct OverseerrHandler;

impl OverseerrHandler {
    /// Fetches the canonical title/overview for the referenced item.
    /// Never fails: incomplete data and lookup errors yield placeholders.
    async fn media_info(&self, ctx: &NotifyContext, media: Option<&Value>) -> (String, String) {
        let Some(media) = media else {
            return unknown_media();
        };
        let (Some(media_type), Some(tmdb_id)) =
            (value_str(media, "media_type"), value_i64(media, "tmdbId"))
        else {
            return unknown_media();
        };

        let (lookup, fallback_title) = match media_type {
            "movie" => (ctx.metadata.movie_metadata(tmdb_id).await, "Unknown movie"),
            "tv" => (ctx.metadata.series_metadata(tmdb_id).await, "Unknown series"),
            other => {
                warn!("Unsupported media type: {}", other);
                return (
                    "Unsupported media type".to_string(),
                    format!("Type: {}", other),
                );
            }
        };

        match lookup {
            Ok(metadata) => (
                metadata.title.unwrap_or_else(|| fallback_title.to_string()),
                metadata
                    .overview
                    .unwrap_or_else(|| "No overview available".to_string()),
            ),
            Err(e) => {
                error!("Media metadata lookup failed: {}", e);
                (
                    "Metadata lookup failed".to_string(),
                    "Could not retrieve media information".to_string(),
                )
            }
        }
    }

    /// Field order: request status, requester, requested season.
    fn build_fields(&self, ctx: &NotifyContext, payload: &Value) -> Vec<NotificationField> {
        let mut fields = Vec::new();

        // The status code arrives numeric from current payloads, stringly
        // from older ones.
        if let Some(status) = payload
            .get("media")
            .and_then(|media| scalar_string(media, "status"))
        {
            fields.push(NotificationField::new(
                "Request status",
                ctx.translator.translate("overseerr", "media_status", &status),
                true,
            ));
        }

        if let Some(username) = payload
            .get("request")
            .and_then(|request| value_str(request, "requestedBy_username"))
        {
            fields.push(NotificationField::new("Requested by", username, true));
        }

        if let Some(first_extra) = payload
            .get("extra")
            .and_then(Value::as_array)
            .and_then(|extra| extra.first())
        {
            fields.push(NotificationField::new(
                "Requested season",
                value_str(first_extra, "value").unwrap_or("Not specified"),
                true,
            ));
        }

        fields
    }
}

#[async_trait]
impl SourceHandler for OverseerrHandler {
    fn source(&self) -> WebhookSource {
        WebhookSource::Overseerr
    }

    async fn handle_notification(
        &self,
        ctx: &NotifyContext,
        payload: &Value,
    ) -> Result<Option<Notification>, WebhookError> {
        let errors = validate(payload);
        if !errors.is_empty() {
            log_validation_failure(self.source(), &errors);
            return Ok(None);
        }

        let event = value_str(payload, "event");
        let notification_type = value_str(payload, "notification_type");
        let label_key = event.or(notification_type).unwrap_or_default();

        send_debug_copy(ctx, self.source(), label_key, payload).await;

        let (title, description) = self.media_info(ctx, payload.get("media")).await;
        let fields = self.build_fields(ctx, payload);

        let notification = Notification {
            author: NotificationAuthor::new(
                ctx.translator.translate("overseerr", "event", label_key),
            ),
            title,
            description,
            color: embed_color(event, notification_type),
            fields,
            thumbnail: value_str(payload, "image").map(String::from),
            timestamp: Utc::now(),
            footer: Some(NotificationFooter::with_icon("Overseerr", FOOTER_ICON)),
        };

        info!(
            "Processed Overseerr notification for: {}",
            notification.title
        );
        Ok(Some(notification))
    }
}

// Placeholder returned when the media object is absent or lacks the
// type/id needed for a metadata lookup.
fn unknown_media() -> (String, String) {
    (
        "Unknown media".to_string(),
        "No media information available".to_string(),
    )
}

fn validate(payload: &Value) -> Vec<&'static str> {
    let mut errors = Vec::new();
    if !payload.is_object() {
        errors.push("payload is not a JSON object");
        return errors;
    }
    if value_str(payload, "event").is_none() && value_str(payload, "notification_type").is_none() {
        errors.push("event or notification_type");
    }
    errors
}

// The event string decides the color; the coarser notification type is the
// fallback before the generic default.
fn embed_color(event: Option<&str>, notification_type: Option<&str>) -> u32 {
    event
        .and_then(color_for)
        .or_else(|| notification_type.and_then(color_for))
        .unwrap_or(DEFAULT_COLOR)
}

fn color_for(event: &str) -> Option<u32> {
    match event {
        "REQUEST_APPROVED" => Some(0x00ff00),
        "REQUEST_DENIED" => Some(0xff0000),
        "REQUEST_PENDING" => Some(0xffff00),
        "MEDIA_AVAILABLE" => Some(0x0099ff),
        "MEDIA_FAILED" => Some(0xff6600),
        "REQUEST_AUTOMATICALLY_APPROVED" => Some(0x00cc99),
        _ => None,
    }
}
