use serde::Serialize;
use sqlx::FromRow;

/// One persisted setting. The value is an opaque JSON document owned by the
/// caller; this layer never inspects it.
#[derive(FromRow, Debug, Serialize, Default)]
pub struct SettingModel {
    pub key: String,
    pub value: String,
}
