use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Minimal account model: identity plus the opaque bearer credential the
/// auth extractor resolves. The token is never serialized back to clients.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub token: String,
    pub created_at: DateTime<Utc>,
}
