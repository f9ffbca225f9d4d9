//! Handler for TV-show-fetcher (Sonarr) notifications.

use async_trait::async_trait;
use chrono::NaiveDate;
use chrono::Utc;
use log::info;
use serde_json::Value;

use crate::webhook::context::NotifyContext;
use crate::webhook::error::WebhookError;
use crate::webhook::handler::log_validation_failure;
use crate::webhook::handler::send_debug_copy;
use crate::webhook::handler::value_i64;
use crate::webhook::handler::value_str;
use crate::webhook::handler::value_u64;
use crate::webhook::handler::SourceHandler;
use crate::webhook::message::Notification;
use crate::webhook::message::NotificationAuthor;
use crate::webhook::message::NotificationField;
use crate::webhook::message::NotificationFooter;
use crate::webhook::source::WebhookSource;
use crate::webhook::util::format_file_size;

const AUTHOR_ICON: &str = "https://raw.githubusercontent.com/Sonarr/Sonarr/develop/Logo/256.png";
const FOOTER_ICON: &str = "https://raw.githubusercontent.com/Sonarr/Sonarr/develop/Logo/64.png";
const DEFAULT_COLOR: u32 = 0x7289da;

pub struct SonarrHandler;

struct EventInfo {
    icon: &'static str,
    color: u32,
    label: String,
}

fn event_info(event: &str) -> EventInfo {
    let (icon, color, label) = match event {
        "Download" => ("📥", 0x00ff00, "Episode downloaded"),
        "EpisodeFileDelete" => ("🗑️", 0xff6600, "Episode file deleted"),
        "Grab" => ("🎯", 0xffff00, "Episode grabbed"),
        "Rename" => ("🔄", 0x0099ff, "Episode renamed"),
        "SeriesDelete" => ("❌", 0xff0000, "Series deleted"),
        "Test" => ("🧪", 0x7289da, "Test webhook"),
        "Health" => ("❤️", 0x00cc99, "Health check"),
        "ApplicationUpdate" => ("🆙", 0x9966cc, "Application update"),
        other => {
            return EventInfo {
                icon: "📺",
                color: DEFAULT_COLOR,
                label: other.to_string(),
            }
        }
    };
    EventInfo {
        icon,
        color,
        label: label.to_string(),
    }
}

#[derive(Default)]
struct SeriesInfo {
    title: String,
    year: Option<i64>,
    imdb_id: Option<String>,
    tvdb_id: Option<i64>,
    tmdb_id: Option<i64>,
    network: Option<String>,
    status: Option<String>,
    path: Option<String>,
}

fn extract_series_info(payload: &Value) -> SeriesInfo {
    let Some(series) = payload.get("series").or_else(|| payload.get("remoteSeries")) else {
        return SeriesInfo {
            title: "Unknown series".to_string(),
            ..SeriesInfo::default()
        };
    };

    SeriesInfo {
        title: value_str(series, "title")
            .unwrap_or("Unknown series")
            .to_string(),
        year: value_i64(series, "year"),
        imdb_id: value_str(series, "imdbId").map(String::from),
        tvdb_id: value_i64(series, "tvdbId"),
        tmdb_id: value_i64(series, "tmdbId"),
        network: value_str(series, "network").map(String::from),
        status: value_str(series, "status").map(String::from),
        path: value_str(series, "path").map(String::from),
    }
}

struct EpisodeInfo {
    label: String,
    title: Option<String>,
    air_date: Option<String>,
    quality: Option<String>,
    count: usize,
}

/// Summarizes the `episodes` array: a single entry keeps its own title and
/// air date, several entries collapse into a count summary.
fn extract_episode_info(payload: &Value) -> Option<EpisodeInfo> {
    let episodes = payload.get("episodes")?.as_array()?;
    let first = episodes.first()?;

    let file_quality = payload
        .pointer("/episodeFile/quality/quality/name")
        .and_then(Value::as_str)
        .map(String::from);
    let quality = first
        .pointer("/quality/quality/name")
        .and_then(Value::as_str)
        .map(String::from)
        .or(file_quality);

    if episodes.len() == 1 {
        let label = match (
            value_i64(first, "seasonNumber"),
            value_i64(first, "episodeNumber"),
        ) {
            (Some(season), Some(number)) => format!("S{:02}E{:02}", season, number),
            _ => "S?E?".to_string(),
        };
        return Some(EpisodeInfo {
            label,
            title: value_str(first, "title").map(String::from),
            air_date: value_str(first, "airDate").map(String::from),
            quality,
            count: 1,
        });
    }

    let mut seasons: Vec<i64> = episodes
        .iter()
        .filter_map(|episode| value_i64(episode, "seasonNumber"))
        .collect();
    seasons.sort_unstable();
    seasons.dedup();

    let numbers: Vec<String> = episodes
        .iter()
        .filter_map(|episode| value_i64(episode, "episodeNumber"))
        .map(|number| number.to_string())
        .collect();

    let label = if seasons.len() == 1 {
        format!("S{:02} E{}", seasons[0], numbers.join(", E"))
    } else {
        format!("Multiple seasons, E{}", numbers.join(", E"))
    };

    Some(EpisodeInfo {
        label,
        title: Some(format!("{} episodes", episodes.len())),
        air_date: None,
        quality,
        count: episodes.len(),
    })
}

struct ReleaseInfo {
    title: Option<String>,
    indexer: Option<String>,
    size: Option<u64>,
}

fn extract_release_info(payload: &Value) -> Option<ReleaseInfo> {
    let release = payload.get("release")?;
    Some(ReleaseInfo {
        title: value_str(release, "releaseTitle").map(String::from),
        indexer: value_str(release, "indexer").map(String::from),
        size: value_u64(release, "size").filter(|size| *size > 0),
    })
}

fn format_air_date(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format("%d %B %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Field order: instance, episode block, network, series status, release
/// block (Grab only), path (renames and deletions), external links.
fn build_fields(
    event: &str,
    series: &SeriesInfo,
    episode: Option<&EpisodeInfo>,
    release: Option<&ReleaseInfo>,
    instance_name: Option<&str>,
) -> Vec<NotificationField> {
    let mut fields = Vec::new();

    if let Some(instance) = instance_name {
        fields.push(NotificationField::new("📡 Instance", instance, true));
    }

    if let Some(episode) = episode {
        let value = match &episode.title {
            Some(title) => format!("{} - {}", episode.label, title),
            None => episode.label.clone(),
        };
        fields.push(NotificationField::new("📺 Episode", value, false));

        if let Some(quality) = &episode.quality {
            fields.push(NotificationField::new("🎬 Quality", quality, true));
        }
        if let Some(air_date) = &episode.air_date {
            fields.push(NotificationField::new(
                "📅 Air date",
                format_air_date(air_date),
                true,
            ));
        }
        if episode.count > 1 {
            fields.push(NotificationField::new(
                "📊 Episode count",
                episode.count.to_string(),
                true,
            ));
        }
    }

    if let Some(network) = &series.network {
        fields.push(NotificationField::new("📡 Network", network, true));
    }
    if let Some(status) = &series.status {
        fields.push(NotificationField::new("📊 Status", status, true));
    }

    if event == "Grab" {
        if let Some(release) = release {
            fields.push(NotificationField::new(
                "📦 Release",
                release.title.as_deref().unwrap_or("Unknown release"),
                false,
            ));
            if let Some(size) = release.size {
                fields.push(NotificationField::new(
                    "💾 Size",
                    format_file_size(size),
                    true,
                ));
            }
            if let Some(indexer) = &release.indexer {
                fields.push(NotificationField::new("🔍 Indexer", indexer, true));
            }
        }
    }

    if matches!(event, "Rename" | "EpisodeFileDelete") {
        if let Some(path) = &series.path {
            fields.push(NotificationField::new("📁 Path", path, false));
        }
    }

    let mut links = Vec::new();
    if let Some(imdb_id) = &series.imdb_id {
        links.push(format!("[IMDb](https://www.imdb.com/title/{})", imdb_id));
    }
    if let Some(tmdb_id) = series.tmdb_id {
        links.push(format!("[TMDb](https://www.themoviedb.org/tv/{})", tmdb_id));
    }
    if let Some(tvdb_id) = series.tvdb_id {
        links.push(format!("[TVDB](https://thetvdb.com/series/{})", tvdb_id));
    }
    if !links.is_empty() {
        fields.push(NotificationField::new("🔗 Links", links.join(" • "), false));
    }

    fields
}

fn build_description(series: &SeriesInfo, episode: Option<&EpisodeInfo>, event: &str) -> String {
    let mut description = match series.year {
        Some(year) => format!("**{}** ({})", series.title, year),
        None => format!("**{}**", series.title),
    };

    if let Some(episode) = episode {
        if matches!(event, "Download" | "Grab" | "EpisodeFileDelete") {
            description.push('\n');
            description.push_str(&episode.label);
        }
    }

    description
}

#[async_trait]
impl SourceHandler for SonarrHandler {
    fn source(&self) -> WebhookSource {
        WebhookSource::Sonarr
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
        let Some(event) = value_str(payload, "eventType") else {
            return Ok(None);
        };

        send_debug_copy(ctx, self.source(), event, payload).await;

        let event_info = event_info(event);
        let series = extract_series_info(payload);
        let episode = extract_episode_info(payload);
        let release = extract_release_info(payload);

        let fields = build_fields(
            event,
            &series,
            episode.as_ref(),
            release.as_ref(),
            value_str(payload, "instanceName"),
        );

        let notification = Notification {
            author: NotificationAuthor::with_icon("Sonarr", AUTHOR_ICON),
            title: format!("{} {}", event_info.icon, event_info.label),
            description: build_description(&series, episode.as_ref(), event),
            color: event_info.color,
            fields,
            thumbnail: None,
            timestamp: Utc::now(),
            footer: Some(NotificationFooter::with_icon("Sonarr", FOOTER_ICON)),
        };

        info!(
            "Processed Sonarr notification [{}] for: {}",
            event, series.title
        );
        Ok(Some(notification))
    }
}

fn validate(payload: &Value) -> Vec<&'static str> {
    let mut errors = Vec::new();
    if !payload.is_object() {
        errors.push("payload is not a JSON object");
        return errors;
    }
    if value_str(payload, "eventType").is_none() {
        errors.push("eventType");
    }
    if payload.get("series").is_none() && payload.get("remoteSeries").is_none() {
        errors.push("series or remoteSeries");
    }
    errors
}
