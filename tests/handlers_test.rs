//! Integration tests for the source handlers.

use std::sync::Arc;

use mockall::predicate::eq;
use serde_json::json;

use arrcord::media::error::MediaError;
use arrcord::media::MediaMetadata;
use arrcord::webhook::handler::SourceHandler;
use arrcord::webhook::handlers::OverseerrHandler;
use arrcord::webhook::handlers::RadarrHandler;
use arrcord::webhook::handlers::SonarrHandler;
use arrcord::webhook::handlers::TdarrHandler;

mod common;

use common::FakeGateway;
use common::MockMetadata;
use common::NullMetadata;
use common::Sent;

#[tokio::test]
async fn test_overseerr_movie_request_enriched_with_metadata() {
    let gateway = Arc::new(FakeGateway::new());
    let mut metadata = MockMetadata::new();
    metadata
        .expect_movie_metadata()
        .with(eq(603))
        .returning(|_| {
            Ok(MediaMetadata {
                title: Some("The Matrix".to_string()),
                overview: Some("A hacker discovers reality.".to_string()),
            })
        });
    let harness = common::setup_context(gateway, Arc::new(metadata)).await;

    let payload = json!({
        "notification_type": "MEDIA_PENDING",
        "event": "MEDIA_PENDING",
        "image": "https://image.test/poster.jpg",
        "media": {"media_type": "movie", "tmdbId": 603, "status": 2},
        "request": {"requestedBy_username": "alice"},
        "extra": [{"name": "Requested Seasons", "value": "1"}]
    });

    let notification = OverseerrHandler
        .handle_notification(&harness.ctx, &payload)
        .await
        .expect("handler failed")
        .expect("no notification produced");

    assert_eq!(notification.title, "The Matrix");
    assert_eq!(notification.description, "A hacker discovers reality.");
    assert_eq!(notification.author.name, "New media request");
    assert_eq!(
        notification.thumbnail.as_deref(),
        Some("https://image.test/poster.jpg")
    );

    let names: Vec<&str> = notification.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Request status", "Requested by", "Requested season"]
    );
    assert_eq!(notification.fields[0].value, "Pending");
    assert_eq!(notification.fields[1].value, "alice");
    assert_eq!(notification.fields[2].value, "1");

    common::teardown_db(harness.db_path).await;
}

#[tokio::test]
async fn test_overseerr_missing_event_returns_none_without_lookup() {
    let gateway = Arc::new(FakeGateway::new());
    // No expectations set: any metadata call would panic the mock.
    let metadata = MockMetadata::new();
    let harness = common::setup_context(gateway, Arc::new(metadata)).await;

    let payload = json!({"media": {"media_type": "movie", "tmdbId": 603}});
    let result = OverseerrHandler
        .handle_notification(&harness.ctx, &payload)
        .await
        .expect("handler failed");

    assert!(result.is_none());
    common::teardown_db(harness.db_path).await;
}

#[tokio::test]
async fn test_overseerr_enrichment_failure_substitutes_placeholder() {
    let gateway = Arc::new(FakeGateway::new());
    let mut metadata = MockMetadata::new();
    metadata.expect_series_metadata().returning(|_| {
        Err(MediaError::UnexpectedStatus {
            status: 500,
            endpoint: "/api/v1/tv/1399".to_string(),
        })
    });
    let harness = common::setup_context(gateway, Arc::new(metadata)).await;

    let payload = json!({
        "event": "MEDIA_APPROVED",
        "media": {"media_type": "tv", "tmdbId": 1399}
    });

    let notification = OverseerrHandler
        .handle_notification(&harness.ctx, &payload)
        .await
        .expect("handler failed")
        .expect("no notification produced");

    assert_eq!(notification.title, "Metadata lookup failed");
    assert_eq!(
        notification.description,
        "Could not retrieve media information"
    );

    common::teardown_db(harness.db_path).await;
}

#[tokio::test]
async fn test_overseerr_incomplete_metadata_uses_labeled_placeholders() {
    let gateway = Arc::new(FakeGateway::new());
    let mut metadata = MockMetadata::new();
    metadata
        .expect_series_metadata()
        .with(eq(1399))
        .returning(|_| Ok(MediaMetadata::default()));
    let harness = common::setup_context(gateway, Arc::new(metadata)).await;

    let payload = json!({
        "event": "MEDIA_AVAILABLE",
        "media": {"media_type": "tv", "tmdbId": 1399}
    });

    let notification = OverseerrHandler
        .handle_notification(&harness.ctx, &payload)
        .await
        .expect("handler failed")
        .expect("no notification produced");

    assert_eq!(notification.title, "Unknown series");
    assert_eq!(notification.description, "No overview available");
    assert_eq!(notification.color, 0x0099ff);

    common::teardown_db(harness.db_path).await;
}

#[tokio::test]
async fn test_radarr_unknown_event_still_renders() {
    let gateway = Arc::new(FakeGateway::new());
    let harness = common::setup_context(gateway, Arc::new(NullMetadata)).await;

    let payload = json!({
        "eventType": "ManualInteractionRequired",
        "movie": {"title": "Heat", "year": 1995}
    });

    let notification = RadarrHandler
        .handle_notification(&harness.ctx, &payload)
        .await
        .expect("handler failed")
        .expect("no notification produced");

    assert_eq!(notification.title, "📡 ManualInteractionRequired");
    assert_eq!(notification.color, 0x7289da);
    assert_eq!(notification.description, "**Heat** (1995)");

    common::teardown_db(harness.db_path).await;
}

#[tokio::test]
async fn test_radarr_missing_movie_returns_none() {
    let gateway = Arc::new(FakeGateway::new());
    let harness = common::setup_context(gateway, Arc::new(NullMetadata)).await;

    let payload = json!({"eventType": "Download"});
    let result = RadarrHandler
        .handle_notification(&harness.ctx, &payload)
        .await
        .expect("handler failed");

    assert!(result.is_none());
    common::teardown_db(harness.db_path).await;
}

#[tokio::test]
async fn test_radarr_debug_copy_reaches_source_admin_channel() {
    let gateway = Arc::new(FakeGateway::new());
    gateway.add_fetchable_channel(910, "radarr-debug");
    let harness = common::setup_context_with_config(gateway, Arc::new(NullMetadata), |config| {
        config.radarr_admin_channel_id = Some(910);
    })
    .await;

    let payload = json!({
        "eventType": "Test",
        "movie": {"title": "Heat"}
    });

    RadarrHandler
        .handle_notification(&harness.ctx, &payload)
        .await
        .expect("handler failed")
        .expect("no notification produced");

    let sent = harness.gateway.sent();
    assert_eq!(sent.len(), 1);
    match &sent[0] {
        Sent::Text { channel_id, text } => {
            assert_eq!(*channel_id, 910);
            assert!(text.contains("Radarr webhook received"));
            assert!(text.contains("Test"));
        }
        other => panic!("Expected a text debug copy, got {:?}", other),
    }

    common::teardown_db(harness.db_path).await;
}

#[tokio::test]
async fn test_sonarr_download_renders_episode_block() {
    let gateway = Arc::new(FakeGateway::new());
    let harness = common::setup_context(gateway, Arc::new(NullMetadata)).await;

    let payload = json!({
        "eventType": "Download",
        "series": {"title": "Dark", "year": 2017},
        "episodes": [{
            "seasonNumber": 1,
            "episodeNumber": 5,
            "title": "Truths",
            "quality": {"quality": {"name": "WEBDL-1080p"}}
        }]
    });

    let notification = SonarrHandler
        .handle_notification(&harness.ctx, &payload)
        .await
        .expect("handler failed")
        .expect("no notification produced");

    assert_eq!(notification.title, "📥 Episode downloaded");
    assert_eq!(notification.description, "**Dark** (2017)\nS01E05");

    let names: Vec<&str> = notification.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["📺 Episode", "🎬 Quality"]);
    assert_eq!(notification.fields[0].value, "S01E05 - Truths");

    common::teardown_db(harness.db_path).await;
}

#[tokio::test]
async fn test_tdarr_file_processing_suppressed_by_default() {
    let gateway = Arc::new(FakeGateway::new());
    let harness = common::setup_context(gateway, Arc::new(NullMetadata)).await;

    let payload = json!({
        "event": "file_processing",
        "originalFilePath": "/media/movies/heat.mkv",
        "percentage": 42
    });

    let result = TdarrHandler
        .handle_notification(&harness.ctx, &payload)
        .await
        .expect("handler failed");

    assert!(result.is_none());
    assert!(harness.gateway.sent().is_empty());

    common::teardown_db(harness.db_path).await;
}

#[tokio::test]
async fn test_tdarr_suppression_override_enables_event() {
    let gateway = Arc::new(FakeGateway::new());
    let harness = common::setup_context_with_config(gateway, Arc::new(NullMetadata), |config| {
        config.tdarr_notifications.file_processing = true;
    })
    .await;

    let payload = json!({
        "event": "file_processing",
        "originalFilePath": "/media/movies/heat.mkv",
        "percentage": 42,
        "fps": 120
    });

    let notification = TdarrHandler
        .handle_notification(&harness.ctx, &payload)
        .await
        .expect("handler failed")
        .expect("no notification produced");

    assert_eq!(notification.title, "heat.mkv");
    assert_eq!(notification.author.name, "⚙️ File processing");
    assert_eq!(notification.color, 0xffff00);

    let names: Vec<&str> = notification.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Original file", "Progress", "Performance"]
    );
    assert_eq!(notification.fields[1].value, "42%");
    assert_eq!(notification.fields[2].value, "120 FPS");

    common::teardown_db(harness.db_path).await;
}

#[tokio::test]
async fn test_tdarr_file_error_includes_truncated_error() {
    let gateway = Arc::new(FakeGateway::new());
    let harness = common::setup_context(gateway, Arc::new(NullMetadata)).await;

    let long_error = "transcode failed ".repeat(30);
    let payload = json!({
        "event": "file_error",
        "originalFilePath": "/media/shows/dark/dark.mkv",
        "worker": 2,
        "error": long_error
    });

    let notification = TdarrHandler
        .handle_notification(&harness.ctx, &payload)
        .await
        .expect("handler failed")
        .expect("no notification produced");

    assert_eq!(notification.author.name, "❌ Processing error");
    assert_eq!(notification.description, "Folder: dark");

    let error_field = notification
        .fields
        .iter()
        .find(|f| f.name == "Error")
        .expect("error field missing");
    assert!(error_field.value.ends_with("...```"));
    // 200 chars plus the code fence and ellipsis marker.
    assert_eq!(error_field.value.chars().count(), 209);

    common::teardown_db(harness.db_path).await;
}
