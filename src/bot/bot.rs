//! Discord client setup.

use std::sync::Arc;

use log::error;
use log::info;
use poise::serenity_prelude as serenity;

use crate::bot::checks::Cooldowns;
use crate::bot::commands;
use crate::bot::commands::Data;
use crate::config::Config;
use crate::media::RadarrClient;
use crate::media::SonarrClient;
use crate::service::Services;

/// Handles to the running Discord client, shared with the delivery gateway.
pub struct Bot {
    pub http: Arc<serenity::Http>,
    pub cache: Arc<serenity::Cache>,
}

impl Bot {
    /// Builds the command framework, starts the gateway client in the
    /// background and returns the HTTP/cache handles.
    pub async fn start(
        config: Arc<Config>,
        services: Arc<Services>,
        radarr: Arc<RadarrClient>,
        sonarr: Arc<SonarrClient>,
    ) -> anyhow::Result<Self> {
        let data = Data {
            cooldowns: Cooldowns::new(config.command_cooldown),
            config: config.clone(),
            services,
            radarr,
            sonarr,
        };

        let framework = poise::Framework::builder()
            .options(poise::FrameworkOptions {
                commands: commands::all_commands(),
                ..Default::default()
            })
            .setup(move |ctx, ready, framework| {
                Box::pin(async move {
                    poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                    info!("Connected as {}.", ready.user.name);
                    Ok(data)
                })
            })
            .build();

        let intents = serenity::GatewayIntents::non_privileged();
        let mut client = serenity::ClientBuilder::new(&config.discord_token, intents)
            .framework(framework)
            .await?;

        let http = client.http.clone();
        let cache = client.cache.clone();

        tokio::spawn(async move {
            if let Err(e) = client.start().await {
                error!("Discord client error: {:?}", e);
            }
        });

        Ok(Self { http, cache })
    }
}
