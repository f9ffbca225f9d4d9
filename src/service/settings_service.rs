//! Settings service for persisted per-guild configuration.
//!
//! Backs the webhook subscription store: one bucket per source, keyed by
//! guild id, holding the destination channel and display metadata.

use std::fmt;
use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;
use serde::de::MapAccess;
use serde::de::Visitor;
use serde::ser::SerializeMap;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use crate::database::model::SettingModel;
use crate::database::table::Table;
use crate::database::Database;
use crate::service::error::ServiceError;
use crate::webhook::source::WebhookSource;

/// One stored channel association for a `(source, guild)` pair.
///
/// Display names are captured at write time and are not re-fetched on read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionEntry {
    pub channel_id: String,
    pub guild_name: String,
    pub channel_name: String,
    pub updated_at: DateTime<Utc>,
}

/// All subscriptions for one source, in insertion order.
///
/// Serialized as a JSON object keyed by guild id. Updating an existing guild
/// keeps its position; new guilds are appended, so fan-out iterates in the
/// order associations were created.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SourceSubscriptions {
    entries: Vec<(String, SubscriptionEntry)>,
}

impl SourceSubscriptions {
    pub fn get(&self, guild_id: &str) -> Option<&SubscriptionEntry> {
        self.entries
            .iter()
            .find(|(id, _)| id == guild_id)
            .map(|(_, entry)| entry)
    }

    pub fn insert(&mut self, guild_id: String, entry: SubscriptionEntry) {
        match self.entries.iter_mut().find(|(id, _)| *id == guild_id) {
            Some((_, existing)) => *existing = entry,
            None => self.entries.push((guild_id, entry)),
        }
    }

    pub fn remove(&mut self, guild_id: &str) -> Option<SubscriptionEntry> {
        let index = self.entries.iter().position(|(id, _)| id == guild_id)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SubscriptionEntry)> {
        self.entries
            .iter()
            .map(|(id, entry)| (id.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for SourceSubscriptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (guild_id, entry) in &self.entries {
            map.serialize_entry(guild_id, entry)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SourceSubscriptions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = SourceSubscriptions;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of guild ids to subscription entries")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut subs = SourceSubscriptions::default();
                while let Some((guild_id, entry)) =
                    access.next_entry::<String, SubscriptionEntry>()?
                {
                    subs.insert(guild_id, entry);
                }
                Ok(subs)
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Outcome of removing a subscription.
#[derive(Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

pub struct SettingsService {
    db: Arc<Database>,
    default_prefix: String,
}

impl SettingsService {
    pub fn new(db: Arc<Database>, default_prefix: &str) -> Self {
        Self {
            db,
            default_prefix: default_prefix.to_string(),
        }
    }

    /// Retrieves all channel associations for a source.
    /// Returns an empty mapping when no bucket is stored.
    pub async fn get_webhook_source(
        &self,
        source: WebhookSource,
    ) -> Result<SourceSubscriptions, ServiceError> {
        let key = webhook_key(source);
        match self.db.settings_table.select(&key).await? {
            Some(model) => serde_json::from_str(&model.value)
                .map_err(|e| ServiceError::Serialization { key, source: e }),
            None => Ok(SourceSubscriptions::default()),
        }
    }

    /// Adds or updates the channel association of a guild for a source,
    /// stamping `updated_at`. Last write wins on racing updates.
    pub async fn update_webhook_source(
        &self,
        source: WebhookSource,
        guild_id: &str,
        channel_id: &str,
        guild_name: &str,
        channel_name: &str,
    ) -> Result<(), ServiceError> {
        let mut current = self.get_webhook_source(source).await?;
        current.insert(
            guild_id.to_string(),
            SubscriptionEntry {
                channel_id: channel_id.to_string(),
                guild_name: guild_name.to_string(),
                channel_name: channel_name.to_string(),
                updated_at: Utc::now(),
            },
        );
        self.store_webhook_source(source, &current).await
    }

    /// Removes the association of a guild for a source. The whole bucket is
    /// deleted once the last association is gone.
    pub async fn delete_webhook_source(
        &self,
        source: WebhookSource,
        guild_id: &str,
    ) -> Result<DeleteOutcome, ServiceError> {
        let mut current = self.get_webhook_source(source).await?;
        if current.remove(guild_id).is_none() {
            return Ok(DeleteOutcome::NotFound);
        }

        if current.is_empty() {
            self.db.settings_table.delete(&webhook_key(source)).await?;
        } else {
            self.store_webhook_source(source, &current).await?;
        }
        Ok(DeleteOutcome::Deleted)
    }

    /// Retrieves the command prefix for a guild, falling back to the default.
    pub async fn prefix(&self, guild_id: u64) -> Result<String, ServiceError> {
        let key = prefix_key(guild_id);
        match self.db.settings_table.select(&key).await? {
            Some(model) => Ok(model.value),
            None => Ok(self.default_prefix.clone()),
        }
    }

    /// Updates the command prefix for a guild. Setting the default prefix
    /// deletes the stored entry instead.
    pub async fn set_prefix(&self, guild_id: u64, new_prefix: &str) -> Result<(), ServiceError> {
        let key = prefix_key(guild_id);
        if new_prefix == self.default_prefix {
            self.db.settings_table.delete(&key).await?;
            return Ok(());
        }

        let model = SettingModel {
            key,
            value: new_prefix.to_string(),
        };
        self.db.settings_table.upsert(&model).await?;
        Ok(())
    }

    async fn store_webhook_source(
        &self,
        source: WebhookSource,
        subs: &SourceSubscriptions,
    ) -> Result<(), ServiceError> {
        let key = webhook_key(source);
        let value = serde_json::to_string(subs).map_err(|e| ServiceError::Serialization {
            key: key.clone(),
            source: e,
        })?;
        self.db.settings_table.upsert(&SettingModel { key, value }).await?;
        Ok(())
    }
}

fn webhook_key(source: WebhookSource) -> String {
    format!("webhook-{}", source)
}

fn prefix_key(guild_id: u64) -> String {
    format!("prefix-{}", guild_id)
}
