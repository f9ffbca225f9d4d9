//! Shared state for one running notification pipeline.

use std::sync::Arc;

use crate::config::Config;
use crate::i18n::Translator;
use crate::media::MetadataProvider;
use crate::service::settings_service::SettingsService;
use crate::webhook::gateway::ChatGateway;
use crate::webhook::resolver::ChannelResolver;

/// Everything the handlers and the delivery pipeline need, owned explicitly
/// and passed by reference so tests can build isolated instances.
pub struct NotifyContext {
    pub config: Arc<Config>,
    pub gateway: Arc<dyn ChatGateway>,
    pub metadata: Arc<dyn MetadataProvider>,
    pub settings: Arc<SettingsService>,
    pub translator: Arc<Translator>,
    pub resolver: ChannelResolver,
}

impl NotifyContext {
    pub fn new(
        config: Arc<Config>,
        gateway: Arc<dyn ChatGateway>,
        metadata: Arc<dyn MetadataProvider>,
        settings: Arc<SettingsService>,
        translator: Arc<Translator>,
    ) -> Self {
        Self {
            config,
            gateway,
            metadata,
            settings,
            translator,
            resolver: ChannelResolver::new(),
        }
    }
}
