//! Chat-platform client seam used by the delivery pipeline.

use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::Cache;
use serenity::all::ChannelId;
use serenity::all::Colour;
use serenity::all::CreateAttachment;
use serenity::all::CreateEmbed;
use serenity::all::CreateEmbedAuthor;
use serenity::all::CreateEmbedFooter;
use serenity::all::CreateMessage;
use serenity::all::GuildId;
use serenity::all::Http;
use serenity::all::Timestamp;

use crate::webhook::error::GatewayError;
use crate::webhook::message::Notification;

/// A destination channel the pipeline has resolved and can send to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedChannel {
    pub id: u64,
    pub name: String,
}

/// The narrow interface the pipeline needs from the chat platform:
/// cache lookups, an on-demand channel fetch and message sends.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    fn cached_guild_name(&self, guild_id: u64) -> Option<String>;
    fn cached_channel(&self, guild_id: u64, channel_id: u64) -> Option<ResolvedChannel>;
    async fn fetch_channel(&self, channel_id: u64) -> Result<ResolvedChannel, GatewayError>;
    async fn send_notification(
        &self,
        channel_id: u64,
        notification: &Notification,
    ) -> Result<(), GatewayError>;
    async fn send_text(&self, channel_id: u64, text: &str) -> Result<(), GatewayError>;
    async fn send_attachment(
        &self,
        channel_id: u64,
        filename: &str,
        bytes: Vec<u8>,
        content: &str,
    ) -> Result<(), GatewayError>;
}

/// Serenity-backed gateway sharing the bot's HTTP client and guild cache.
pub struct DiscordGateway {
    http: Arc<Http>,
    cache: Arc<Cache>,
}

impl DiscordGateway {
    pub fn new(http: Arc<Http>, cache: Arc<Cache>) -> Self {
        Self { http, cache }
    }
}

#[async_trait]
impl ChatGateway for DiscordGateway {
    fn cached_guild_name(&self, guild_id: u64) -> Option<String> {
        if guild_id == 0 {
            return None;
        }
        self.cache
            .guild(GuildId::new(guild_id))
            .map(|guild| guild.name.clone())
    }

    fn cached_channel(&self, guild_id: u64, channel_id: u64) -> Option<ResolvedChannel> {
        if guild_id == 0 || channel_id == 0 {
            return None;
        }
        let guild = self.cache.guild(GuildId::new(guild_id))?;
        let channel = guild.channels.get(&ChannelId::new(channel_id))?;
        Some(ResolvedChannel {
            id: channel_id,
            name: channel.name.clone(),
        })
    }

    async fn fetch_channel(&self, channel_id: u64) -> Result<ResolvedChannel, GatewayError> {
        if channel_id == 0 {
            return Err(GatewayError::InvalidId { id: channel_id });
        }
        let channel = self.http.get_channel(ChannelId::new(channel_id)).await?;
        let guild_channel = channel
            .guild()
            .ok_or(GatewayError::NotAGuildChannel { channel_id })?;
        Ok(ResolvedChannel {
            id: channel_id,
            name: guild_channel.name.clone(),
        })
    }

    async fn send_notification(
        &self,
        channel_id: u64,
        notification: &Notification,
    ) -> Result<(), GatewayError> {
        if channel_id == 0 {
            return Err(GatewayError::InvalidId { id: channel_id });
        }
        let message = CreateMessage::new().embed(build_embed(notification));
        ChannelId::new(channel_id)
            .send_message(&self.http, message)
            .await?;
        Ok(())
    }

    async fn send_text(&self, channel_id: u64, text: &str) -> Result<(), GatewayError> {
        if channel_id == 0 {
            return Err(GatewayError::InvalidId { id: channel_id });
        }
        ChannelId::new(channel_id)
            .send_message(&self.http, CreateMessage::new().content(text))
            .await?;
        Ok(())
    }

    async fn send_attachment(
        &self,
        channel_id: u64,
        filename: &str,
        bytes: Vec<u8>,
        content: &str,
    ) -> Result<(), GatewayError> {
        if channel_id == 0 {
            return Err(GatewayError::InvalidId { id: channel_id });
        }
        let attachment = CreateAttachment::bytes(bytes, filename.to_string());
        let message = CreateMessage::new().content(content).add_file(attachment);
        ChannelId::new(channel_id)
            .send_message(&self.http, message)
            .await?;
        Ok(())
    }
}

fn build_embed(notification: &Notification) -> CreateEmbed {
    let mut author = CreateEmbedAuthor::new(&notification.author.name);
    if let Some(icon_url) = &notification.author.icon_url {
        author = author.icon_url(icon_url);
    }

    let mut embed = CreateEmbed::new()
        .author(author)
        .title(&notification.title)
        .description(&notification.description)
        .colour(Colour::new(notification.color))
        .timestamp(
            Timestamp::from_unix_timestamp(notification.timestamp.timestamp())
                .unwrap_or_else(|_| Timestamp::now()),
        );

    for field in &notification.fields {
        embed = embed.field(&field.name, &field.value, field.inline);
    }

    if let Some(thumbnail) = &notification.thumbnail {
        embed = embed.thumbnail(thumbnail);
    }

    if let Some(footer) = &notification.footer {
        let mut embed_footer = CreateEmbedFooter::new(&footer.text);
        if let Some(icon_url) = &footer.icon_url {
            embed_footer = embed_footer.icon_url(icon_url);
        }
        embed = embed.footer(embed_footer);
    }

    embed
}
