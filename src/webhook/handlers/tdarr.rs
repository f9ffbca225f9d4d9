//! Handler for transcode-worker (Tdarr) notifications.
//!
//! The only handler with a suppression policy: a per-event switch table
//! decides whether an event produces a notification at all.

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use log::info;
use serde_json::Value;

use crate::webhook::context::NotifyContext;
use crate::webhook::error::WebhookError;
use crate::webhook::handler::log_validation_failure;
use crate::webhook::handler::scalar_string;
use crate::webhook::handler::send_debug_copy;
use crate::webhook::handler::value_str;
use crate::webhook::handler::value_u64;
use crate::webhook::handler::SourceHandler;
use crate::webhook::message::Notification;
use crate::webhook::message::NotificationAuthor;
use crate::webhook::message::NotificationField;
use crate::webhook::message::NotificationFooter;
use crate::webhook::source::WebhookSource;
use crate::webhook::util::format_process_time;
use crate::webhook::util::truncate_with_ellipsis;

const FOOTER_ICON: &str =
    "https://raw.githubusercontent.com/HaveAGitGat/Tdarr/master/images/logo.png";
const DEFAULT_COLOR: u32 = 0x7289da;
const ERROR_MAX_CHARS: usize = 200;

pub struct TdarrHandler;

fn event_color(event: &str) -> u32 {
    match event {
        "file_processed" => 0x00ff00,
        "file_processing" => 0xffff00,
        "file_error" => 0xff0000,
        "file_skipped" => 0x808080,
        "worker_started" => 0x0099ff,
        "worker_stopped" => 0xff6600,
        "library_scan_complete" => 0x00cc99,
        "health_check" => 0x9932cc,
        _ => DEFAULT_COLOR,
    }
}

fn event_icon(event: &str) -> &'static str {
    match event {
        "file_processed" => "✅",
        "file_processing" => "⚙️",
        "file_error" => "❌",
        "file_skipped" => "⏭️",
        "worker_started" => "🚀",
        "worker_stopped" => "⏹️",
        "library_scan_complete" => "📚",
        "health_check" => "🏥",
        _ => "📁",
    }
}

/// Paths arrive from both unix and windows workers.
fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn parent_dir(path: &str) -> Option<&str> {
    let parts: Vec<&str> = path.split(['/', '\\']).filter(|p| !p.is_empty()).collect();
    if parts.len() >= 2 {
        Some(parts[parts.len() - 2])
    } else {
        None
    }
}

fn file_info(payload: &Value) -> (String, String) {
    let original_path = value_str(payload, "originalFilePath");

    let title = original_path
        .map(|path| file_name(path).to_string())
        .or_else(|| value_str(payload, "file").map(String::from))
        .unwrap_or_else(|| "Unknown file".to_string());

    let description = original_path
        .and_then(parent_dir)
        .map(|dir| format!("Folder: {}", dir))
        .unwrap_or_else(|| "Tdarr file processing".to_string());

    (title, description)
}

/// Field order: original file, size delta, process time, worker, library,
/// progress, ETA, performance, error.
fn build_fields(payload: &Value) -> Vec<NotificationField> {
    let mut fields = Vec::new();

    if let Some(path) = value_str(payload, "originalFilePath") {
        fields.push(NotificationField::new(
            "Original file",
            format!("`{}`", file_name(path)),
            false,
        ));
    }

    if let (Some(original), Some(output)) = (
        value_u64(payload, "originalFileSize"),
        value_u64(payload, "outputFileSize"),
    ) {
        let original_mb = (original as f64 / 1_048_576.0).round() as u64;
        let output_mb = (output as f64 / 1_048_576.0).round() as u64;
        let reduction = if original > 0 {
            ((original as f64 - output as f64) / original as f64 * 100.0).round() as i64
        } else {
            0
        };
        let value = if reduction > 0 {
            format!("{} MB → {} MB (-{}%)", original_mb, output_mb, reduction)
        } else {
            format!("{} MB → {} MB", original_mb, output_mb)
        };
        fields.push(NotificationField::new("Size", value, true));
    }

    if let Some(process_time) = value_u64(payload, "processTime") {
        fields.push(NotificationField::new(
            "Process time",
            format_process_time(process_time),
            true,
        ));
    }

    if let Some(worker) = scalar_string(payload, "worker") {
        fields.push(NotificationField::new("Worker", worker, true));
    }

    if let Some(library) = value_str(payload, "library") {
        fields.push(NotificationField::new("Library", library, true));
    }

    if let Some(percentage) = scalar_string(payload, "percentage") {
        fields.push(NotificationField::new(
            "Progress",
            format!("{}%", percentage),
            true,
        ));
    }

    if let Some(eta) = value_str(payload, "eta") {
        fields.push(NotificationField::new("ETA", eta, true));
    }

    let fps = scalar_string(payload, "fps");
    let bitrate = scalar_string(payload, "bitrate");
    if fps.is_some() || bitrate.is_some() {
        let value = match (fps, bitrate) {
            (Some(fps), Some(bitrate)) => format!("{} FPS • {} kb/s", fps, bitrate),
            (Some(fps), None) => format!("{} FPS", fps),
            (None, Some(bitrate)) => format!("{} kb/s", bitrate),
            (None, None) => unreachable!(),
        };
        fields.push(NotificationField::new("Performance", value, true));
    }

    if let Some(error) = value_str(payload, "error") {
        fields.push(NotificationField::new(
            "Error",
            format!("```{}```", truncate_with_ellipsis(error, ERROR_MAX_CHARS)),
            false,
        ));
    }

    fields
}

#[async_trait]
impl SourceHandler for TdarrHandler {
    fn source(&self) -> WebhookSource {
        WebhookSource::Tdarr
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
        let Some(event) = value_str(payload, "event") else {
            return Ok(None);
        };

        send_debug_copy(ctx, self.source(), event, payload).await;

        if !ctx.config.tdarr_notifications.allows(event) {
            debug!("Tdarr notification suppressed for event: {}", event);
            return Ok(None);
        }

        let (title, description) = file_info(payload);
        let fields = build_fields(payload);

        let label = ctx.translator.translate("tdarr", "event", event);
        let label = if label == event {
            event.replace('_', " ").to_uppercase()
        } else {
            label
        };

        let notification = Notification {
            author: NotificationAuthor::new(format!("{} {}", event_icon(event), label)),
            title,
            description,
            color: event_color(event),
            fields,
            thumbnail: None,
            timestamp: Utc::now(),
            footer: Some(NotificationFooter::with_icon("Tdarr", FOOTER_ICON)),
        };

        info!(
            "Processed Tdarr notification for: {} ({})",
            notification.title, event
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
    match value_str(payload, "event") {
        None => errors.push("event"),
        Some(event) => {
            if event.starts_with("file_")
                && value_str(payload, "originalFilePath").is_none()
                && value_str(payload, "file").is_none()
            {
                errors.push("originalFilePath or file");
            }
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_validate_requires_a_file_for_file_events() {
        assert_eq!(
            validate(&json!({"event": "file_processed"})),
            vec!["originalFilePath or file"]
        );
        assert!(validate(&json!({"event": "worker_stopped"})).is_empty());
        assert!(validate(&json!({
            "event": "file_processed",
            "originalFilePath": "/media/movies/a.mkv"
        }))
        .is_empty());
    }

    #[test]
    fn test_file_info_extracts_name_and_parent_dir() {
        let payload = json!({"originalFilePath": "/media/movies/Heat (1995)/heat.mkv"});
        let (title, description) = file_info(&payload);
        assert_eq!(title, "heat.mkv");
        assert_eq!(description, "Folder: Heat (1995)");
    }

    #[test]
    fn test_file_info_handles_windows_paths() {
        let payload = json!({"originalFilePath": "D:\\media\\shows\\dark.mkv"});
        let (title, description) = file_info(&payload);
        assert_eq!(title, "dark.mkv");
        assert_eq!(description, "Folder: shows");
    }

    #[test]
    fn test_size_field_reports_reduction() {
        let payload = json!({
            "originalFileSize": 2_097_152u64,
            "outputFileSize": 1_048_576u64
        });
        let fields = build_fields(&payload);
        assert_eq!(fields[0].name, "Size");
        assert_eq!(fields[0].value, "2 MB → 1 MB (-50%)");
    }

    #[test]
    fn test_size_field_omits_negative_reduction() {
        let payload = json!({
            "originalFileSize": 1_048_576u64,
            "outputFileSize": 2_097_152u64
        });
        let fields = build_fields(&payload);
        assert_eq!(fields[0].value, "1 MB → 2 MB");
    }

    #[test]
    fn test_error_field_is_truncated() {
        let payload = json!({"error": "x".repeat(300)});
        let fields = build_fields(&payload);
        assert_eq!(fields[0].name, "Error");
        assert_eq!(fields[0].value, format!("```{}...```", "x".repeat(200)));
    }

    #[test]
    fn test_event_styling_fallback() {
        assert_eq!(event_color("queue_paused"), DEFAULT_COLOR);
        assert_eq!(event_icon("queue_paused"), "📁");
    }
}
