//! Environment-backed configuration values.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::AppError;
use crate::webhook::source::WebhookSource;

/// Base URL and API token for one upstream media service.
#[derive(Clone, Debug, Default)]
pub struct ApiEndpoint {
    pub url: String,
    pub token: String,
}

/// Per-event notification switches for the Tdarr source.
///
/// These defaults are the single source of truth for which transcode events
/// produce a notification; `TDARR_NOTIFICATIONS` may override individual
/// switches with a JSON object.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct TdarrNotifications {
    #[serde(default = "enabled")]
    pub file_processed: bool,
    #[serde(default)]
    pub file_processing: bool,
    #[serde(default = "enabled")]
    pub file_error: bool,
    #[serde(default)]
    pub file_skipped: bool,
    #[serde(default)]
    pub worker_started: bool,
    #[serde(default = "enabled")]
    pub worker_stopped: bool,
    #[serde(default = "enabled")]
    pub library_scan_complete: bool,
    #[serde(default)]
    pub health_check: bool,
}

fn enabled() -> bool {
    true
}

impl Default for TdarrNotifications {
    fn default() -> Self {
        Self {
            file_processed: true,
            file_processing: false,
            file_error: true,
            file_skipped: false,
            worker_started: false,
            worker_stopped: true,
            library_scan_complete: true,
            health_check: false,
        }
    }
}

impl TdarrNotifications {
    /// Events not present in the table notify by default.
    pub fn allows(&self, event: &str) -> bool {
        match event {
            "file_processed" => self.file_processed,
            "file_processing" => self.file_processing,
            "file_error" => self.file_error,
            "file_skipped" => self.file_skipped,
            "worker_started" => self.worker_started,
            "worker_stopped" => self.worker_stopped,
            "library_scan_complete" => self.library_scan_complete,
            "health_check" => self.health_check,
            _ => true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub discord_token: String,
    pub bind_addr: String,
    pub db_url: String,
    pub db_path: String,
    pub logs_path: PathBuf,
    pub translations_path: Option<PathBuf>,
    pub locale: String,
    pub command_prefix: String,
    pub command_cooldown: Duration,
    pub admin_role_id: Option<String>,
    pub admin_guild_id: u64,
    pub admin_notifications_channel_id: u64,
    pub admin_debug_channel_id: Option<u64>,
    pub overseerr_admin_channel_id: Option<u64>,
    pub radarr_admin_channel_id: Option<u64>,
    pub sonarr_admin_channel_id: Option<u64>,
    pub tdarr_admin_channel_id: Option<u64>,
    pub overseerr: ApiEndpoint,
    pub radarr: ApiEndpoint,
    pub sonarr: ApiEndpoint,
    pub tdarr_notifications: TdarrNotifications,
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        Ok(Self {
            discord_token: require("DISCORD_TOKEN")?,
            bind_addr: env_or("WEBHOOK_BIND_ADDR", "0.0.0.0:8484"),
            db_url: env_or("DB_URL", "sqlite://data.db"),
            db_path: env_or("DB_PATH", "data.db"),
            logs_path: PathBuf::from(env_or("LOGS_PATH", "logs")),
            translations_path: std::env::var("TRANSLATIONS_PATH").ok().map(PathBuf::from),
            locale: env_or("LOCALE", "en"),
            command_prefix: env_or("COMMAND_PREFIX", "?"),
            command_cooldown: Duration::from_secs(
                env_parse("COMMAND_COOLDOWN_SECS")?.unwrap_or(5),
            ),
            admin_role_id: std::env::var("ADMIN_ROLE_ID").ok(),
            admin_guild_id: env_parse("ADMIN_GUILD_ID")?.ok_or(AppError::MissingConfig {
                key: "ADMIN_GUILD_ID".to_string(),
            })?,
            admin_notifications_channel_id: env_parse("ADMIN_NOTIFICATIONS_CHANNEL_ID")?.ok_or(
                AppError::MissingConfig {
                    key: "ADMIN_NOTIFICATIONS_CHANNEL_ID".to_string(),
                },
            )?,
            admin_debug_channel_id: env_parse("ADMIN_DEBUG_CHANNEL_ID")?,
            overseerr_admin_channel_id: env_parse("OVERSEERR_ADMIN_CHANNEL_ID")?,
            radarr_admin_channel_id: env_parse("RADARR_ADMIN_CHANNEL_ID")?,
            sonarr_admin_channel_id: env_parse("SONARR_ADMIN_CHANNEL_ID")?,
            tdarr_admin_channel_id: env_parse("TDARR_ADMIN_CHANNEL_ID")?,
            overseerr: api_endpoint("OVERSEERR", "http://localhost:5055"),
            radarr: api_endpoint("RADARR", "http://localhost:7878"),
            sonarr: api_endpoint("SONARR", "http://localhost:8989"),
            tdarr_notifications: tdarr_notifications()?,
        })
    }

    /// The per-source admin channel receiving raw-payload debug copies.
    pub fn source_admin_channel(&self, source: WebhookSource) -> Option<u64> {
        match source {
            WebhookSource::Overseerr => self.overseerr_admin_channel_id,
            WebhookSource::Radarr => self.radarr_admin_channel_id,
            WebhookSource::Sonarr => self.sonarr_admin_channel_id,
            WebhookSource::Tdarr => self.tdarr_admin_channel_id,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            discord_token: String::new(),
            bind_addr: "0.0.0.0:8484".to_string(),
            db_url: "sqlite://data.db".to_string(),
            db_path: "data.db".to_string(),
            logs_path: PathBuf::from("logs"),
            translations_path: None,
            locale: "en".to_string(),
            command_prefix: "?".to_string(),
            command_cooldown: Duration::from_secs(5),
            admin_role_id: None,
            admin_guild_id: 0,
            admin_notifications_channel_id: 0,
            admin_debug_channel_id: None,
            overseerr_admin_channel_id: None,
            radarr_admin_channel_id: None,
            sonarr_admin_channel_id: None,
            tdarr_admin_channel_id: None,
            overseerr: ApiEndpoint::default(),
            radarr: ApiEndpoint::default(),
            sonarr: ApiEndpoint::default(),
            tdarr_notifications: TdarrNotifications::default(),
        }
    }
}

fn require(key: &str) -> Result<String, AppError> {
    std::env::var(key).map_err(|_| AppError::MissingConfig {
        key: key.to_string(),
    })
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>, AppError> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::InvalidConfig {
                key: key.to_string(),
                value,
            }),
        Err(_) => Ok(None),
    }
}

fn api_endpoint(prefix: &str, default_url: &str) -> ApiEndpoint {
    ApiEndpoint {
        url: env_or(&format!("{prefix}_URL"), default_url),
        token: env_or(&format!("{prefix}_TOKEN"), ""),
    }
}

fn tdarr_notifications() -> Result<TdarrNotifications, AppError> {
    match std::env::var("TDARR_NOTIFICATIONS") {
        Ok(value) => {
            serde_json::from_str(&value).map_err(|_| AppError::InvalidConfig {
                key: "TDARR_NOTIFICATIONS".to_string(),
                value,
            })
        }
        Err(_) => Ok(TdarrNotifications::default()),
    }
}
