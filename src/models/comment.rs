use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// User-submitted text attached to an event. `author` is the commenting
/// user's username, joined in by the detail query.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub event_id: Uuid,
    pub created_by: Uuid,
    pub author: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}
