use std::sync::Arc;

use crate::config::Config;
use crate::database::Database;
use crate::service::settings_service::SettingsService;

pub mod error;
pub mod settings_service;

pub struct Services {
    pub settings: Arc<SettingsService>,
}

impl Services {
    pub fn new(db: Arc<Database>, config: &Config) -> Self {
        Self {
            settings: Arc::new(SettingsService::new(db, &config.command_prefix)),
        }
    }
}
