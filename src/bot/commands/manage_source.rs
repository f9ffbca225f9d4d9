//! Operator command to manage source/channel associations.

use poise::serenity_prelude as serenity;

use crate::bot::checks;
use crate::bot::commands::Context;
use crate::bot::commands::Error;
use crate::bot::error::BotError;
use crate::service::settings_service::DeleteOutcome;
use crate::webhook::source::WebhookSource;

#[derive(Clone, Copy, poise::ChoiceParameter)]
pub enum SourceAction {
    #[name = "Associate"]
    Associate,
    #[name = "Dissociate"]
    Dissociate,
}

#[derive(Clone, Copy, poise::ChoiceParameter)]
pub enum SourceChoice {
    #[name = "Overseerr"]
    Overseerr,
    #[name = "Radarr"]
    Radarr,
    #[name = "Sonarr"]
    Sonarr,
    #[name = "Tdarr"]
    Tdarr,
}

impl From<SourceChoice> for WebhookSource {
    fn from(choice: SourceChoice) -> Self {
        match choice {
            SourceChoice::Overseerr => WebhookSource::Overseerr,
            SourceChoice::Radarr => WebhookSource::Radarr,
            SourceChoice::Sonarr => WebhookSource::Sonarr,
            SourceChoice::Tdarr => WebhookSource::Tdarr,
        }
    }
}

/// Associate a webhook source with a channel on this server, or remove the
/// association.
#[poise::command(slash_command, guild_only, rename = "managesource")]
pub async fn manage_source(
    ctx: Context<'_>,
    #[description = "Action to perform"] action: SourceAction,
    #[description = "The webhook source to manage"] source: SourceChoice,
    #[description = "Channel receiving the notifications (required to associate)"] channel: Option<
        serenity::GuildChannel,
    >,
) -> Result<(), Error> {
    checks::check_guild_permissions(ctx, &ctx.data().config.admin_role_id).await?;

    if let Err(remaining) = ctx
        .data()
        .cooldowns
        .check(ctx.author().id.get(), "managesource")
    {
        ctx.say(format!(
            "⏳ You are on cooldown, try again in {}s.",
            remaining.as_secs().max(1)
        ))
        .await?;
        return Ok(());
    }

    let (guild_id, guild_name) = {
        let guild = ctx.guild().ok_or(BotError::GuildOnlyCommand)?;
        (guild.id.get(), guild.name.clone())
    };
    let source = WebhookSource::from(source);
    let settings = &ctx.data().services.settings;

    match action {
        SourceAction::Associate => {
            let Some(channel) = channel else {
                ctx.say("❌ Please specify a channel for the association.")
                    .await?;
                return Ok(());
            };

            settings
                .update_webhook_source(
                    source,
                    &guild_id.to_string(),
                    &channel.id.get().to_string(),
                    &guild_name,
                    &channel.name,
                )
                .await?;
            ctx.say(format!(
                "✅ Source **{}** associated with <#{}> on this server.",
                source,
                channel.id.get()
            ))
            .await?;
        }
        SourceAction::Dissociate => {
            match settings
                .delete_webhook_source(source, &guild_id.to_string())
                .await?
            {
                DeleteOutcome::Deleted => {
                    ctx.say(format!(
                        "✅ Source **{}** dissociated from this server.",
                        source
                    ))
                    .await?;
                }
                DeleteOutcome::NotFound => {
                    ctx.say(format!(
                        "❌ No association found for source **{}** on this server.",
                        source
                    ))
                    .await?;
                }
            }
        }
    }

    Ok(())
}
