use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Named classification for events. Identity is the unique name. Deleting a
/// category cascades to its events at the schema level.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Derived with COUNT(*) over referencing events, never stored.
    pub events_count: i64,
    pub created_at: DateTime<Utc>,
}
