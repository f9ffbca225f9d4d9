use std::sync::Arc;

use crate::bot::checks::Cooldowns;
use crate::config::Config;
use crate::media::RadarrClient;
use crate::media::SonarrClient;
use crate::service::Services;

pub mod manage_source;
pub mod progress;

/// State shared by every command invocation.
pub struct Data {
    pub config: Arc<Config>,
    pub services: Arc<Services>,
    pub radarr: Arc<RadarrClient>,
    pub sonarr: Arc<SonarrClient>,
    pub cooldowns: Cooldowns,
}

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

pub fn all_commands() -> Vec<poise::Command<Data, Error>> {
    vec![manage_source::manage_source(), progress::progress()]
}
