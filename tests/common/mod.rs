use std::collections::HashMap;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use arrcord::config::Config;
use arrcord::database::Database;
use arrcord::i18n::Translator;
use arrcord::media::error::MediaError;
use arrcord::media::MediaMetadata;
use arrcord::media::MetadataProvider;
use arrcord::service::Services;
use arrcord::webhook::context::NotifyContext;
use arrcord::webhook::error::GatewayError;
use arrcord::webhook::gateway::ChatGateway;
use arrcord::webhook::gateway::ResolvedChannel;
use arrcord::webhook::message::Notification;

#[allow(dead_code)]
pub const ADMIN_GUILD: u64 = 900;
#[allow(dead_code)]
pub const ADMIN_CHANNEL: u64 = 901;
#[allow(dead_code)]
pub const DEBUG_CHANNEL: u64 = 902;

pub async fn setup_db() -> (Arc<Database>, PathBuf) {
    let uuid = Uuid::new_v4();
    let db_path = std::env::temp_dir().join(format!("arrcord-test-{}.db", uuid));
    let db_url = format!("sqlite://{}", db_path.to_str().unwrap());

    let db = Database::new(&db_url, db_path.to_str().unwrap())
        .await
        .expect("Failed to create database");
    db.create_all_tables().await.expect("Failed to create tables");

    (Arc::new(db), db_path)
}

pub async fn teardown_db(db_path: PathBuf) {
    if db_path.exists() {
        let _ = std::fs::remove_file(db_path);
    }
}

// FAKE GATEWAY

#[derive(Clone, Debug)]
#[allow(dead_code)]
pub enum Sent {
    Notification {
        channel_id: u64,
        notification: Notification,
    },
    Text {
        channel_id: u64,
        text: String,
    },
    Attachment {
        channel_id: u64,
        filename: String,
    },
}

#[derive(Default)]
pub struct FakeGatewayState {
    pub guilds: HashMap<u64, String>,
    /// channel id -> (guild id, channel name)
    pub cached_channels: HashMap<u64, (u64, String)>,
    /// channels only reachable through a remote fetch
    pub fetchable_channels: HashMap<u64, String>,
    pub failing_channels: HashSet<u64>,
    pub sent: Vec<Sent>,
    pub fetch_calls: usize,
}

#[derive(Default)]
pub struct FakeGateway {
    pub state: RwLock<FakeGatewayState>,
}

#[allow(dead_code)]
impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_guild(&self, guild_id: u64, name: &str) {
        self.state
            .write()
            .unwrap()
            .guilds
            .insert(guild_id, name.to_string());
    }

    pub fn add_cached_channel(&self, guild_id: u64, channel_id: u64, name: &str) {
        self.state
            .write()
            .unwrap()
            .cached_channels
            .insert(channel_id, (guild_id, name.to_string()));
    }

    pub fn add_fetchable_channel(&self, channel_id: u64, name: &str) {
        self.state
            .write()
            .unwrap()
            .fetchable_channels
            .insert(channel_id, name.to_string());
    }

    pub fn fail_sends_to(&self, channel_id: u64) {
        self.state.write().unwrap().failing_channels.insert(channel_id);
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.state.read().unwrap().sent.clone()
    }

    pub fn fetch_calls(&self) -> usize {
        self.state.read().unwrap().fetch_calls
    }
}

#[async_trait]
impl ChatGateway for FakeGateway {
    fn cached_guild_name(&self, guild_id: u64) -> Option<String> {
        self.state.read().unwrap().guilds.get(&guild_id).cloned()
    }

    fn cached_channel(&self, guild_id: u64, channel_id: u64) -> Option<ResolvedChannel> {
        let state = self.state.read().unwrap();
        state
            .cached_channels
            .get(&channel_id)
            .filter(|(guild, _)| *guild == guild_id)
            .map(|(_, name)| ResolvedChannel {
                id: channel_id,
                name: name.clone(),
            })
    }

    async fn fetch_channel(&self, channel_id: u64) -> Result<ResolvedChannel, GatewayError> {
        let mut state = self.state.write().unwrap();
        state.fetch_calls += 1;
        state
            .fetchable_channels
            .get(&channel_id)
            .map(|name| ResolvedChannel {
                id: channel_id,
                name: name.clone(),
            })
            .ok_or(GatewayError::NotCached { channel_id })
    }

    async fn send_notification(
        &self,
        channel_id: u64,
        notification: &Notification,
    ) -> Result<(), GatewayError> {
        let mut state = self.state.write().unwrap();
        if state.failing_channels.contains(&channel_id) {
            return Err(GatewayError::InvalidId { id: channel_id });
        }
        state.sent.push(Sent::Notification {
            channel_id,
            notification: notification.clone(),
        });
        Ok(())
    }

    async fn send_text(&self, channel_id: u64, text: &str) -> Result<(), GatewayError> {
        let mut state = self.state.write().unwrap();
        if state.failing_channels.contains(&channel_id) {
            return Err(GatewayError::InvalidId { id: channel_id });
        }
        state.sent.push(Sent::Text {
            channel_id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_attachment(
        &self,
        channel_id: u64,
        filename: &str,
        _bytes: Vec<u8>,
        _content: &str,
    ) -> Result<(), GatewayError> {
        let mut state = self.state.write().unwrap();
        if state.failing_channels.contains(&channel_id) {
            return Err(GatewayError::InvalidId { id: channel_id });
        }
        state.sent.push(Sent::Attachment {
            channel_id,
            filename: filename.to_string(),
        });
        Ok(())
    }
}

// METADATA MOCKS

mockall::mock! {
    pub Metadata {}

    #[async_trait]
    impl MetadataProvider for Metadata {
        async fn movie_metadata(&self, tmdb_id: i64) -> Result<MediaMetadata, MediaError>;
        async fn series_metadata(&self, tmdb_id: i64) -> Result<MediaMetadata, MediaError>;
    }
}

/// Metadata provider for tests that never reach enrichment.
pub struct NullMetadata;

#[async_trait]
impl MetadataProvider for NullMetadata {
    async fn movie_metadata(&self, _tmdb_id: i64) -> Result<MediaMetadata, MediaError> {
        Ok(MediaMetadata::default())
    }

    async fn series_metadata(&self, _tmdb_id: i64) -> Result<MediaMetadata, MediaError> {
        Ok(MediaMetadata::default())
    }
}

// CONTEXT HARNESS

pub struct TestHarness {
    pub ctx: NotifyContext,
    pub gateway: Arc<FakeGateway>,
    pub db_path: PathBuf,
}

#[allow(dead_code)]
pub async fn setup_context(
    gateway: Arc<FakeGateway>,
    metadata: Arc<dyn MetadataProvider>,
) -> TestHarness {
    setup_context_with_config(gateway, metadata, |_| {}).await
}

#[allow(dead_code)]
pub async fn setup_context_with_config(
    gateway: Arc<FakeGateway>,
    metadata: Arc<dyn MetadataProvider>,
    configure: impl FnOnce(&mut Config),
) -> TestHarness {
    let (db, db_path) = setup_db().await;

    let mut config = Config::default();
    config.admin_guild_id = ADMIN_GUILD;
    config.admin_notifications_channel_id = ADMIN_CHANNEL;
    config.admin_debug_channel_id = Some(DEBUG_CHANNEL);
    configure(&mut config);
    let config = Arc::new(config);

    let services = Services::new(db, &config);
    let ctx = NotifyContext::new(
        config,
        gateway.clone(),
        metadata,
        services.settings.clone(),
        Arc::new(Translator::new("en")),
    );

    TestHarness {
        ctx,
        gateway,
        db_path,
    }
}
