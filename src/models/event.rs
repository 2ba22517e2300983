use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const EVENT_NAME_MAX_LEN: usize = 50;
pub const EVENT_VENUE_MAX_LEN: usize = 200;

/// The central entity. `details` is opaque rich-text HTML: it is stored and
/// returned unmodified, and sanitization is the presentation layer's job.
/// Every event has exactly one category and one creator; deleting either
/// deletes the event (schema cascade).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub details: String,
    pub venue: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub category_id: Uuid,
    pub creator_id: Uuid,
    /// Derived with COUNT(*) over the event's comments, never stored.
    pub comments_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Canonical detail-page path for this event.
    pub fn absolute_url(&self) -> String {
        format!("/events/{}", self.id)
    }
}
