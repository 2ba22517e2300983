use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::actions::{create_action, ActionTarget, VERB_ADDED_COMMENT};
use crate::auth::CurrentUser;
use crate::models::Comment;
use crate::utils::error::{AppError, FieldErrors};
use crate::utils::response::created;

pub const COMMENT_MAX_LEN: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct CommentForm {
    pub comment: String,
}

impl CommentForm {
    fn validate(&self) -> Result<(), AppError> {
        let mut errors = FieldErrors::new();

        if self.comment.trim().is_empty() {
            errors.insert("comment", "This field is required".to_string());
        } else if self.comment.chars().count() > COMMENT_MAX_LEN {
            errors.insert(
                "comment",
                format!("Ensure this field has at most {} characters", COMMENT_MAX_LEN),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::FormError(errors))
        }
    }
}

/// POST /events/:id. Attaches a comment to the event. Authenticated only;
/// nothing is persisted and no action is logged on a failed request.
pub async fn create_comment(
    State(pool): State<PgPool>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<Uuid>,
    Json(form): Json<CommentForm>,
) -> Result<Response, AppError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM events WHERE id = $1)")
        .bind(event_id)
        .fetch_one(&pool)
        .await?;
    if !exists {
        return Err(AppError::NotFound(format!(
            "Event with id '{}' was not found",
            event_id
        )));
    }

    form.validate()?;

    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO comments (event_id, created_by, comment) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(event_id)
    .bind(user.id)
    .bind(form.comment.trim())
    .fetch_one(&pool)
    .await?;

    create_action(&pool, &user, VERB_ADDED_COMMENT, ActionTarget::Comment(id)).await?;

    let comment = sqlx::query_as::<_, Comment>(
        "SELECT c.id, c.event_id, c.created_by, u.username AS author, c.comment, c.created_at \
         FROM comments c JOIN users u ON u.id = c.created_by WHERE c.id = $1",
    )
    .bind(id)
    .fetch_one(&pool)
    .await?;

    Ok(created(comment, "Comment was added successfully").into_response())
}
