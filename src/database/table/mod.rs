pub mod settings_table;

use async_trait::async_trait;
use sqlx::Error as DbError;
use sqlx::SqlitePool;

pub use settings_table::SettingsTable;

pub struct BaseTable {
    pub pool: SqlitePool,
}

impl BaseTable {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
pub trait Table<T, ID> {
    async fn create_table(&self) -> Result<(), DbError>;
    async fn drop_table(&self) -> Result<(), DbError>;
    async fn select_all(&self) -> Result<Vec<T>, DbError>;
    async fn delete_all(&self) -> Result<(), DbError>;
    async fn upsert(&self, model: &T) -> Result<(), DbError>;
    async fn select(&self, id: &ID) -> Result<Option<T>, DbError>;
    async fn delete(&self, id: &ID) -> Result<bool, DbError>;
}
