//! Fan-out delivery: raw-payload audit, subscriber sends, admin copy.

use log::error;
use log::warn;
use serde_json::Value;
use uuid::Uuid;

use crate::service::settings_service::SubscriptionEntry;
use crate::webhook::context::NotifyContext;
use crate::webhook::message::Notification;
use crate::webhook::resolver::ResolveStrategy;
use crate::webhook::source::WebhookSource;

/// Aggregated outcome of one fan-out. Failures are recorded as readable
/// strings; they never abort the remaining deliveries.
#[derive(Debug, Default)]
pub struct DeliveryResult {
    /// `"Guild - #channel"` per delivered subscriber.
    pub success: Vec<String>,
    pub failed: Vec<String>,
    /// Deliveries actually sent, including the administrative copy.
    pub total_sent: usize,
}

impl DeliveryResult {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Single synthetic failure, used when a handler faults.
    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            success: Vec::new(),
            failed: vec![reason.into()],
            total_sent: 0,
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Delivers a rendered notification to every subscriber of `source`, then
/// to the administrative channel. Never returns an error: every failure
/// mode is downgraded to an entry in [`DeliveryResult::failed`].
pub async fn deliver(
    ctx: &NotifyContext,
    source: WebhookSource,
    notification: &Notification,
    raw_payload: Option<&Value>,
) -> DeliveryResult {
    let mut result = DeliveryResult::empty();

    if let Some(payload) = raw_payload {
        ship_raw_payload(ctx, source, payload).await;
    }

    match ctx.settings.get_webhook_source(source).await {
        Ok(subscriptions) => {
            for (guild_id, entry) in subscriptions.iter() {
                deliver_to_subscriber(ctx, notification, guild_id, entry, &mut result).await;
            }
        }
        Err(e) => {
            error!("Failed to load {} subscriptions: {}", source, e);
            result
                .failed
                .push(format!("Subscription lookup failed: {}", e));
        }
    }

    deliver_admin_copy(ctx, source, notification, &mut result).await;

    result
}

/// Sends to one subscriber using cache-only resolution; a fan-out to many
/// guilds must not trigger one remote fetch per destination.
async fn deliver_to_subscriber(
    ctx: &NotifyContext,
    notification: &Notification,
    guild_id: &str,
    entry: &SubscriptionEntry,
    result: &mut DeliveryResult,
) {
    let (Ok(guild), Ok(channel)) = (guild_id.parse::<u64>(), entry.channel_id.parse::<u64>())
    else {
        result.failed.push(format!(
            "Invalid subscription ids for {} ({})",
            entry.guild_name, guild_id
        ));
        return;
    };

    if ctx.gateway.cached_guild_name(guild).is_none() {
        result.failed.push(format!(
            "Server {} ({}) not found",
            entry.guild_name, guild_id
        ));
        return;
    }

    let resolved = ctx
        .resolver
        .resolve(
            ctx.gateway.as_ref(),
            guild,
            channel,
            ResolveStrategy::CacheOnly,
        )
        .await;
    let Ok(channel) = resolved else {
        result.failed.push(format!(
            "Channel #{} on {} not found",
            entry.channel_name, entry.guild_name
        ));
        return;
    };

    match ctx.gateway.send_notification(channel.id, notification).await {
        Ok(()) => {
            result
                .success
                .push(format!("{} - #{}", entry.guild_name, entry.channel_name));
            result.total_sent += 1;
        }
        Err(e) => {
            result
                .failed
                .push(format!("Send error on {}: {}", entry.guild_name, e));
        }
    }
}

/// The administrative copy is always sent last. Its footer is extended with
/// the subscriber delivery count; it raises `total_sent` but is not listed
/// under `success`.
async fn deliver_admin_copy(
    ctx: &NotifyContext,
    source: WebhookSource,
    notification: &Notification,
    result: &mut DeliveryResult,
) {
    let suffix = format!(
        "[{}] Delivered to {} server(s)",
        source.as_str().to_uppercase(),
        result.success.len()
    );
    let admin_copy = notification.with_footer_suffix(&suffix);

    let resolved = ctx
        .resolver
        .resolve(
            ctx.gateway.as_ref(),
            ctx.config.admin_guild_id,
            ctx.config.admin_notifications_channel_id,
            ResolveStrategy::CacheThenFetch,
        )
        .await;
    match resolved {
        Ok(channel) => match ctx.gateway.send_notification(channel.id, &admin_copy).await {
            Ok(()) => result.total_sent += 1,
            Err(e) => result.failed.push(format!("Admin delivery error: {}", e)),
        },
        Err(e) => result
            .failed
            .push(format!("Admin notification channel not found: {}", e)),
    }
}

/// Ships the unmodified inbound payload as a file attachment to the fixed
/// cross-source debug channel. Best effort.
async fn ship_raw_payload(ctx: &NotifyContext, source: WebhookSource, payload: &Value) {
    let Some(channel_id) = ctx.config.admin_debug_channel_id else {
        return;
    };

    let bytes = serde_json::to_vec_pretty(payload).unwrap_or_else(|_| payload.to_string().into_bytes());
    let filename = format!("{}-{}.json", source, Uuid::new_v4());
    let content = format!("📦 Raw {} payload", source.display_name());

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
            if let Err(e) = ctx
                .gateway
                .send_attachment(channel.id, &filename, bytes, &content)
                .await
            {
                error!("Failed to ship raw {} payload: {}", source, e);
            }
        }
        Err(e) => warn!("Debug channel unavailable for {} payload: {}", source, e),
    }
}
