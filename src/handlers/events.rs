use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::actions::{create_action, ActionTarget, VERB_CREATED_EVENT, VERB_UPDATED_EVENT};
use crate::auth::CurrentUser;
use crate::models::event::{EVENT_NAME_MAX_LEN, EVENT_VENUE_MAX_LEN};
use crate::models::{Comment, Event};
use crate::utils::error::{AppError, FieldErrors};
use crate::utils::pagination::{Page, PageMeta, PageQuery};
use crate::utils::response::{created, success};

/// Shared projection so every event row carries its derived comment count.
const EVENT_SELECT: &str = "SELECT e.id, e.name, e.details, e.venue, e.date, e.time, \
     e.category_id, e.creator_id, \
     (SELECT COUNT(*) FROM comments c WHERE c.event_id = e.id) AS comments_count, \
     e.created_at, e.updated_at \
     FROM events e";

#[derive(Serialize)]
struct EventPayload {
    #[serde(flatten)]
    event: Event,
    url: String,
}

impl From<Event> for EventPayload {
    fn from(event: Event) -> Self {
        let url = event.absolute_url();
        Self { event, url }
    }
}

#[derive(Serialize)]
struct EventListData {
    events: Vec<EventPayload>,
    #[serde(flatten)]
    meta: PageMeta,
}

#[derive(Serialize)]
struct EventDetailData {
    #[serde(flatten)]
    event: EventPayload,
    comments: Vec<Comment>,
}

#[derive(Debug, Deserialize)]
pub struct EventForm {
    pub category_id: Uuid,
    pub name: String,
    pub details: String,
    pub venue: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl EventForm {
    fn validate(&self) -> Result<(), AppError> {
        let mut errors = FieldErrors::new();

        if self.name.trim().is_empty() {
            errors.insert("name", "This field is required".to_string());
        } else if self.name.chars().count() > EVENT_NAME_MAX_LEN {
            errors.insert(
                "name",
                format!("Ensure this field has at most {} characters", EVENT_NAME_MAX_LEN),
            );
        }

        if self.venue.trim().is_empty() {
            errors.insert("venue", "This field is required".to_string());
        } else if self.venue.chars().count() > EVENT_VENUE_MAX_LEN {
            errors.insert(
                "venue",
                format!("Ensure this field has at most {} characters", EVENT_VENUE_MAX_LEN),
            );
        }

        if self.details.trim().is_empty() {
            errors.insert("details", "This field is required".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::FormError(errors))
        }
    }
}

async fn fetch_event(pool: &PgPool, id: Uuid) -> Result<Event, AppError> {
    let sql = format!("{EVENT_SELECT} WHERE e.id = $1");
    sqlx::query_as::<_, Event>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event with id '{}' was not found", id)))
}

async fn ensure_category_exists(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM categories WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await?;
    if exists {
        Ok(())
    } else {
        let mut errors = FieldErrors::new();
        errors.insert("category_id", format!("Unknown category '{}'", id));
        Err(AppError::FormError(errors))
    }
}

/// GET /events. Every event, ordered by date then time, 10 per page.
pub async fn list_events(
    State(pool): State<PgPool>,
    Query(query): Query<PageQuery>,
) -> Result<Response, AppError> {
    let page = Page::from_query(&query)?;

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
        .fetch_one(&pool)
        .await?;

    let sql = format!("{EVENT_SELECT} ORDER BY e.date, e.time LIMIT $1 OFFSET $2");
    let events = sqlx::query_as::<_, Event>(&sql)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&pool)
        .await?;

    let data = EventListData {
        events: events.into_iter().map(EventPayload::from).collect(),
        meta: PageMeta::new(page, count),
    };
    Ok(success(data, "Events retrieved successfully").into_response())
}

/// GET /. Events with a date strictly after today, 10 per page. The
/// landing page orders by time alone, not by date then time.
pub async fn upcoming_events(
    State(pool): State<PgPool>,
    Query(query): Query<PageQuery>,
) -> Result<Response, AppError> {
    let page = Page::from_query(&query)?;

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events WHERE date > CURRENT_DATE")
        .fetch_one(&pool)
        .await?;

    let sql = format!("{EVENT_SELECT} WHERE e.date > CURRENT_DATE ORDER BY e.time LIMIT $1 OFFSET $2");
    let events = sqlx::query_as::<_, Event>(&sql)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&pool)
        .await?;

    let data = EventListData {
        events: events.into_iter().map(EventPayload::from).collect(),
        meta: PageMeta::new(page, count),
    };
    Ok(success(data, "Upcoming events retrieved successfully").into_response())
}

/// GET /events/:id. The event plus its full comment list, oldest first.
pub async fn event_detail(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let event = fetch_event(&pool, id).await?;

    let comments = sqlx::query_as::<_, Comment>(
        "SELECT c.id, c.event_id, c.created_by, u.username AS author, c.comment, c.created_at \
         FROM comments c JOIN users u ON u.id = c.created_by \
         WHERE c.event_id = $1 ORDER BY c.created_at",
    )
    .bind(id)
    .fetch_all(&pool)
    .await?;

    let data = EventDetailData {
        event: EventPayload::from(event),
        comments,
    };
    Ok(success(data, "Event retrieved successfully").into_response())
}

/// POST /events. Authenticated only; the caller becomes the creator.
pub async fn create_event(
    State(pool): State<PgPool>,
    CurrentUser(user): CurrentUser,
    Json(form): Json<EventForm>,
) -> Result<Response, AppError> {
    form.validate()?;
    ensure_category_exists(&pool, form.category_id).await?;

    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO events (name, details, venue, date, time, category_id, creator_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
    )
    .bind(&form.name)
    .bind(&form.details)
    .bind(&form.venue)
    .bind(form.date)
    .bind(form.time)
    .bind(form.category_id)
    .bind(user.id)
    .fetch_one(&pool)
    .await?;

    create_action(&pool, &user, VERB_CREATED_EVENT, ActionTarget::Event(id)).await?;

    let event = fetch_event(&pool, id).await?;
    let message = format!("{} was created successfully", event.name);
    Ok(created(EventPayload::from(event), message).into_response())
}

/// PUT /events/:id. Authenticated only. The creator is never reassigned.
pub async fn update_event(
    State(pool): State<PgPool>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(form): Json<EventForm>,
) -> Result<Response, AppError> {
    // 404 before validation so an unknown id is not reported as a form error
    fetch_event(&pool, id).await?;
    form.validate()?;
    ensure_category_exists(&pool, form.category_id).await?;

    sqlx::query(
        "UPDATE events SET name = $1, details = $2, venue = $3, date = $4, time = $5, \
         category_id = $6, updated_at = now() WHERE id = $7",
    )
    .bind(&form.name)
    .bind(&form.details)
    .bind(&form.venue)
    .bind(form.date)
    .bind(form.time)
    .bind(form.category_id)
    .bind(id)
    .execute(&pool)
    .await?;

    create_action(&pool, &user, VERB_UPDATED_EVENT, ActionTarget::Event(id)).await?;

    let event = fetch_event(&pool, id).await?;
    let message = format!("{} was updated successfully", event.name);
    Ok(success(EventPayload::from(event), message).into_response())
}

#[derive(Serialize)]
struct EventDeletedData {
    url: &'static str,
}

/// DELETE /events/:id. Authenticated only; comments cascade with the row.
pub async fn delete_event(
    State(pool): State<PgPool>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let event = fetch_event(&pool, id).await?;

    sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;

    tracing::info!(user = %user.username, event = %event.name, "Event deleted");

    let message = format!("{} was deleted successfully", event.name);
    Ok(success(EventDeletedData { url: "/events" }, message).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> EventForm {
        EventForm {
            category_id: Uuid::new_v4(),
            name: "Jazz Night".to_string(),
            details: "<p>An evening of jazz.</p>".to_string(),
            venue: "Blue Note".to_string(),
            date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(valid_form().validate().is_ok());
    }

    #[test]
    fn test_blank_fields_are_rejected() {
        let mut form = valid_form();
        form.name = "   ".to_string();
        form.venue = String::new();
        form.details = String::new();

        let err = form.validate().unwrap_err();
        match err {
            AppError::FormError(errors) => {
                assert!(errors.contains_key("name"));
                assert!(errors.contains_key("venue"));
                assert!(errors.contains_key("details"));
            }
            other => panic!("expected FormError, got {:?}", other),
        }
    }

    #[test]
    fn test_name_length_limit() {
        let mut form = valid_form();
        form.name = "x".repeat(EVENT_NAME_MAX_LEN);
        assert!(form.validate().is_ok());

        form.name = "x".repeat(EVENT_NAME_MAX_LEN + 1);
        let err = form.validate().unwrap_err();
        match err {
            AppError::FormError(errors) => {
                assert!(errors.contains_key("name"));
                assert!(!errors.contains_key("venue"));
            }
            other => panic!("expected FormError, got {:?}", other),
        }
    }

    #[test]
    fn test_venue_length_limit() {
        let mut form = valid_form();
        form.venue = "x".repeat(EVENT_VENUE_MAX_LEN + 1);
        let err = form.validate().unwrap_err();
        match err {
            AppError::FormError(errors) => assert!(errors.contains_key("venue")),
            other => panic!("expected FormError, got {:?}", other),
        }
    }

    #[test]
    fn test_form_dates_parse_from_json() {
        let form: EventForm = serde_json::from_value(serde_json::json!({
            "category_id": Uuid::new_v4(),
            "name": "Jazz Night",
            "details": "<p>details</p>",
            "venue": "Blue Note",
            "date": "2030-01-01",
            "time": "19:00:00",
        }))
        .unwrap();
        assert_eq!(form.date, NaiveDate::from_ymd_opt(2030, 1, 1).unwrap());
        assert_eq!(form.time, NaiveTime::from_hms_opt(19, 0, 0).unwrap());
    }
}
