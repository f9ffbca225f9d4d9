//! Sqlite-backed persistent key-value settings store.

use std::str::FromStr;

use log::debug;
use log::info;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;

use crate::database::table::SettingsTable;
use crate::database::table::Table;

pub mod error;
pub mod model;
pub mod table;

pub struct Database {
    pub pool: SqlitePool,
    pub settings_table: SettingsTable,
}

impl Database {
    pub async fn new(db_url: &str, db_path: &str) -> anyhow::Result<Self> {
        let path = std::path::Path::new(db_path);
        if !path.exists() {
            debug!("Database path {db_path} does not exist. Creating...");
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, "")?;
            info!("Created {db_path}");
        }

        debug!("Connecting to db...");
        let opts = SqliteConnectOptions::from_str(db_url)?.foreign_keys(true);
        let pool = SqlitePool::connect_with(opts).await?;
        info!("Connected to db.");

        let settings_table = SettingsTable::new(pool.clone());

        Ok(Self {
            pool,
            settings_table,
        })
    }

    pub async fn create_all_tables(&self) -> anyhow::Result<()> {
        self.settings_table.create_table().await?;
        Ok(())
    }

    pub async fn drop_all_tables(&self) -> anyhow::Result<()> {
        self.settings_table.drop_table().await?;
        Ok(())
    }

    pub async fn delete_all_tables(&self) -> anyhow::Result<()> {
        self.settings_table.delete_all().await?;
        Ok(())
    }
}
