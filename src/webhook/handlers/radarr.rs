//! Handler for movie-fetcher (Radarr) notifications.

use async_trait::async_trait;
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

const AUTHOR_ICON: &str = "https://raw.githubusercontent.com/Radarr/Radarr/develop/Logo/256.png";
const FOOTER_ICON: &str = "https://raw.githubusercontent.com/Radarr/Radarr/develop/Logo/64.png";
const DEFAULT_COLOR: u32 = 0x7289da;

pub struct RadarrHandler;

struct EventInfo {
    icon: &'static str,
    color: u32,
    label: String,
}

/// Static classification table. Events outside the table render with the
/// generic icon/color and the raw event string as label.
fn event_info(event: &str) -> EventInfo {
    let (icon, color, label) = match event {
        "Download" => ("📥", 0x00ff00, "Download complete"),
        "Rename" => ("🔄", 0x0099ff, "Movie renamed"),
        "MovieFileDelete" => ("🗑️", 0xff6600, "Movie file deleted"),
        "MovieDelete" => ("❌", 0xff0000, "Movie deleted"),
        "Grab" => ("🎯", 0xffff00, "Release grabbed"),
        "Test" => ("🧪", 0x7289da, "Test webhook"),
        "Health" => ("❤️", 0x00cc99, "Health check"),
        "ApplicationUpdate" => ("🆙", 0x9966cc, "Application update"),
        other => {
            return EventInfo {
                icon: "📡",
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
struct MovieInfo {
    title: String,
    year: Option<i64>,
    imdb_id: Option<String>,
    tmdb_id: Option<i64>,
    quality: Option<String>,
    path: Option<String>,
}

fn extract_movie_info(payload: &Value) -> MovieInfo {
    let Some(movie) = payload.get("movie").or_else(|| payload.get("remoteMovie")) else {
        return MovieInfo {
            title: "Unknown movie".to_string(),
            ..MovieInfo::default()
        };
    };

    MovieInfo {
        title: value_str(movie, "title")
            .unwrap_or("Unknown movie")
            .to_string(),
        year: value_i64(movie, "year"),
        imdb_id: value_str(movie, "imdbId").map(String::from),
        tmdb_id: value_i64(movie, "tmdbId"),
        quality: movie
            .pointer("/quality/quality/name")
            .and_then(Value::as_str)
            .map(String::from),
        path: value_str(movie, "path").map(String::from),
    }
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

/// Field order: instance, event-specific block (quality/release for grabs
/// and downloads, path for renames and deletions), then external links.
fn build_fields(
    event: &str,
    movie: &MovieInfo,
    release: Option<&ReleaseInfo>,
    instance_name: Option<&str>,
) -> Vec<NotificationField> {
    let mut fields = Vec::new();

    if let Some(instance) = instance_name {
        fields.push(NotificationField::new("📡 Instance", instance, true));
    }

    match event {
        "Download" | "Grab" => {
            fields.push(NotificationField::new(
                "🎬 Quality",
                movie.quality.as_deref().unwrap_or("Unknown quality"),
                true,
            ));
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
        "Rename" | "MovieFileDelete" => {
            if let Some(path) = &movie.path {
                fields.push(NotificationField::new("📁 Path", path, false));
            }
        }
        _ => {
            fields.push(NotificationField::new(
                "🎬 Quality",
                movie.quality.as_deref().unwrap_or("Unknown quality"),
                true,
            ));
        }
    }

    let mut links = Vec::new();
    if let Some(imdb_id) = &movie.imdb_id {
        links.push(format!("[IMDb](https://www.imdb.com/title/{})", imdb_id));
    }
    if let Some(tmdb_id) = movie.tmdb_id {
        links.push(format!(
            "[TMDb](https://www.themoviedb.org/movie/{})",
            tmdb_id
        ));
    }
    if !links.is_empty() {
        fields.push(NotificationField::new("🔗 Links", links.join(" • "), false));
    }

    fields
}

#[async_trait]
impl SourceHandler for RadarrHandler {
    fn source(&self) -> WebhookSource {
        WebhookSource::Radarr
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
        let movie = extract_movie_info(payload);
        let release = extract_release_info(payload);
        let fields = build_fields(
            event,
            &movie,
            release.as_ref(),
            value_str(payload, "instanceName"),
        );

        let description = match movie.year {
            Some(year) => format!("**{}** ({})", movie.title, year),
            None => format!("**{}**", movie.title),
        };

        let notification = Notification {
            author: NotificationAuthor::with_icon("Radarr", AUTHOR_ICON),
            title: format!("{} {}", event_info.icon, event_info.label),
            description,
            color: event_info.color,
            fields,
            thumbnail: None,
            timestamp: Utc::now(),
            footer: Some(NotificationFooter::with_icon("Radarr", FOOTER_ICON)),
        };

        info!(
            "Processed Radarr notification [{}] for: {}",
            event, movie.title
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
    if payload.get("movie").is_none() && payload.get("remoteMovie").is_none() {
        errors.push("movie or remoteMovie");
    }
    errors
}
