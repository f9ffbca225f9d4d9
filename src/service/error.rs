use crate::database::error::DatabaseError;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ServiceError {
    #[error("DatabaseError: {0}")]
    DatabaseError(#[from] DatabaseError),

    #[error("Invalid stored value for key `{key}`: {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        Self::DatabaseError(DatabaseError::BackendError(e))
    }
}
