use async_trait::async_trait;
use sqlx::Error as DbError;
use sqlx::SqlitePool;

use super::BaseTable;
use super::Table;
use crate::database::model::SettingModel;

pub struct SettingsTable {
    base: BaseTable,
}

impl SettingsTable {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            base: BaseTable::new(pool),
        }
    }

    pub async fn select_all_by_key_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<SettingModel>, DbError> {
        let ret = sqlx::query_as::<_, SettingModel>(
            "SELECT key, value FROM settings WHERE key LIKE ? ORDER BY key",
        )
        .bind(format!("{}%", prefix))
        .fetch_all(&self.base.pool)
        .await?;
        Ok(ret)
    }
}

#[async_trait]
impl Table<SettingModel, String> for SettingsTable {
    async fn create_table(&self) -> Result<(), DbError> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )"#,
        )
        .execute(&self.base.pool)
        .await?;
        Ok(())
    }

    async fn drop_table(&self) -> Result<(), DbError> {
        sqlx::query("DROP TABLE IF EXISTS settings")
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }

    async fn select_all(&self) -> Result<Vec<SettingModel>, DbError> {
        let ret = sqlx::query_as::<_, SettingModel>("SELECT key, value FROM settings")
            .fetch_all(&self.base.pool)
            .await?;
        Ok(ret)
    }

    async fn delete_all(&self) -> Result<(), DbError> {
        sqlx::query("DELETE FROM settings")
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }

    async fn upsert(&self, model: &SettingModel) -> Result<(), DbError> {
        sqlx::query(
            r#"INSERT INTO settings (key, value) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value"#,
        )
        .bind(&model.key)
        .bind(&model.value)
        .execute(&self.base.pool)
        .await?;
        Ok(())
    }

    async fn select(&self, id: &String) -> Result<Option<SettingModel>, DbError> {
        let model =
            sqlx::query_as::<_, SettingModel>("SELECT key, value FROM settings WHERE key = ?")
                .bind(id)
                .fetch_optional(&self.base.pool)
                .await?;
        Ok(model)
    }

    async fn delete(&self, id: &String) -> Result<bool, DbError> {
        let res = sqlx::query("DELETE FROM settings WHERE key = ?")
            .bind(id)
            .execute(&self.base.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
