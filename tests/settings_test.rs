//! Integration tests for the subscription store adapter.

use chrono::Utc;

use arrcord::database::table::Table;
use arrcord::service::settings_service::DeleteOutcome;
use arrcord::service::settings_service::SettingsService;
use arrcord::webhook::source::WebhookSource;

mod common;

#[tokio::test]
async fn test_update_then_get_roundtrip() {
    let (db, db_path) = common::setup_db().await;
    let service = SettingsService::new(db.clone(), "?");

    let before = Utc::now();
    service
        .update_webhook_source(WebhookSource::Radarr, "42", "4242", "Guild", "alerts")
        .await
        .expect("update failed");

    let subs = service
        .get_webhook_source(WebhookSource::Radarr)
        .await
        .expect("get failed");
    let entry = subs.get("42").expect("entry missing");

    assert_eq!(entry.channel_id, "4242");
    assert_eq!(entry.guild_name, "Guild");
    assert_eq!(entry.channel_name, "alerts");
    assert!(entry.updated_at >= before);

    common::teardown_db(db_path).await;
}

#[tokio::test]
async fn test_missing_bucket_reads_as_empty_mapping() {
    let (db, db_path) = common::setup_db().await;
    let service = SettingsService::new(db.clone(), "?");

    let subs = service
        .get_webhook_source(WebhookSource::Tdarr)
        .await
        .expect("get failed");

    assert!(subs.is_empty());
    assert!(subs.get("42").is_none());

    common::teardown_db(db_path).await;
}

#[tokio::test]
async fn test_delete_missing_entry_reports_not_found() {
    let (db, db_path) = common::setup_db().await;
    let service = SettingsService::new(db.clone(), "?");

    let outcome = service
        .delete_webhook_source(WebhookSource::Sonarr, "42")
        .await
        .expect("delete failed");

    assert_eq!(outcome, DeleteOutcome::NotFound);

    common::teardown_db(db_path).await;
}

#[tokio::test]
async fn test_deleting_last_entry_removes_the_bucket() {
    let (db, db_path) = common::setup_db().await;
    let service = SettingsService::new(db.clone(), "?");

    service
        .update_webhook_source(WebhookSource::Overseerr, "1", "11", "One", "general")
        .await
        .expect("update failed");
    service
        .update_webhook_source(WebhookSource::Overseerr, "2", "22", "Two", "general")
        .await
        .expect("update failed");

    let outcome = service
        .delete_webhook_source(WebhookSource::Overseerr, "1")
        .await
        .expect("delete failed");
    assert_eq!(outcome, DeleteOutcome::Deleted);

    // The bucket is still stored while one association remains.
    let stored = db
        .settings_table
        .select(&"webhook-overseerr".to_string())
        .await
        .expect("select failed");
    assert!(stored.is_some());

    service
        .delete_webhook_source(WebhookSource::Overseerr, "2")
        .await
        .expect("delete failed");

    let stored = db
        .settings_table
        .select(&"webhook-overseerr".to_string())
        .await
        .expect("select failed");
    assert!(stored.is_none());

    common::teardown_db(db_path).await;
}

#[tokio::test]
async fn test_update_overwrites_existing_association() {
    let (db, db_path) = common::setup_db().await;
    let service = SettingsService::new(db.clone(), "?");

    service
        .update_webhook_source(WebhookSource::Radarr, "42", "4242", "Guild", "alerts")
        .await
        .expect("update failed");
    service
        .update_webhook_source(WebhookSource::Radarr, "42", "9999", "Guild", "movies")
        .await
        .expect("update failed");

    let subs = service
        .get_webhook_source(WebhookSource::Radarr)
        .await
        .expect("get failed");
    assert_eq!(subs.len(), 1);
    let entry = subs.get("42").expect("entry missing");
    assert_eq!(entry.channel_id, "9999");
    assert_eq!(entry.channel_name, "movies");

    common::teardown_db(db_path).await;
}

#[tokio::test]
async fn test_prefix_defaults_and_reset() {
    let (db, db_path) = common::setup_db().await;
    let service = SettingsService::new(db.clone(), "?");

    assert_eq!(service.prefix(42).await.expect("prefix failed"), "?");

    service.set_prefix(42, "!").await.expect("set failed");
    assert_eq!(service.prefix(42).await.expect("prefix failed"), "!");

    // Setting the default prefix deletes the stored entry.
    service.set_prefix(42, "?").await.expect("set failed");
    let stored = db
        .settings_table
        .select(&"prefix-42".to_string())
        .await
        .expect("select failed");
    assert!(stored.is_none());

    common::teardown_db(db_path).await;
}
