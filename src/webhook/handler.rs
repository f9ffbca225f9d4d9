//! Source handler contract and helpers shared by the handlers.

use async_trait::async_trait;
use log::error;
use log::warn;
use serde_json::Value;

use crate::webhook::context::NotifyContext;
use crate::webhook::error::WebhookError;
use crate::webhook::message::Notification;
use crate::webhook::resolver::ResolveStrategy;
use crate::webhook::source::WebhookSource;
use crate::webhook::util::truncate_with_ellipsis;

/// Renders one source's payloads into notifications.
#[async_trait]
pub trait SourceHandler: Send + Sync {
    fn source(&self) -> WebhookSource;

    /// Validates, enriches and renders one payload. `Ok(None)` means the
    /// payload produced no notification (invalid or suppressed); that is a
    /// local recovery path, not an error.
    async fn handle_notification(
        &self,
        ctx: &NotifyContext,
        payload: &Value,
    ) -> Result<Option<Notification>, WebhookError>;
}

/// Logs a validation failure with the offending fields enumerated.
pub(crate) fn log_validation_failure(source: WebhookSource, errors: &[&str]) {
    warn!("Invalid {} payload: {}", source, errors.join(", "));
}

// Leaves room for the surrounding markdown under Discord's 2000-char limit.
const DEBUG_PAYLOAD_MAX_CHARS: usize = 1700;

/// Posts the raw payload to the source's admin channel. Best effort: any
/// failure is logged and never interrupts notification processing.
pub(crate) async fn send_debug_copy(
    ctx: &NotifyContext,
    source: WebhookSource,
    event_label: &str,
    payload: &Value,
) {
    let Some(channel_id) = ctx.config.source_admin_channel(source) else {
        return;
    };

    let body = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
    let text = format!(
        "🚀 **{} webhook received**\n**Type:** {}\n```json\n{}\n```",
        source.display_name(),
        event_label,
        truncate_with_ellipsis(&body, DEBUG_PAYLOAD_MAX_CHARS),
    );

    let resolved = ctx
        .resolver
        .resolve(
            ctx.gateway.as_ref(),
            ctx.config.admin_guild_id,
            channel_id,
            ResolveStrategy::CacheThenFetch,
        )
        .await;
    match resolved {
        Ok(channel) => {
            if let Err(e) = ctx.gateway.send_text(channel.id, &text).await {
                error!("Failed to send {} debug copy: {}", source, e);
            }
        }
        Err(e) => warn!("{} admin channel unavailable: {}", source, e),
    }
}

/// Reads a string field of a JSON object.
pub(crate) fn value_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

/// Reads an integer field that may arrive as a number or a numeric string.
pub(crate) fn value_i64(value: &Value, key: &str) -> Option<i64> {
    match value.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Reads a byte-count field that may arrive as a number or a numeric string.
pub(crate) fn value_u64(value: &Value, key: &str) -> Option<u64> {
    match value.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Renders a scalar field verbatim, whether it arrived as number or string.
pub(crate) fn scalar_string(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}
