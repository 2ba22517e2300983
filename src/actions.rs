use sqlx::PgPool;
use uuid::Uuid;

use crate::models::User;
use crate::utils::error::AppError;

pub const VERB_ADDED_COMMENT: &str = "added a comment";
pub const VERB_CREATED_EVENT: &str = "created a new event";
pub const VERB_UPDATED_EVENT: &str = "updated an event";

/// What an activity-log entry points at.
#[derive(Debug, Clone, Copy)]
pub enum ActionTarget {
    Event(Uuid),
    Comment(Uuid),
}

impl ActionTarget {
    pub fn kind(&self) -> &'static str {
        match self {
            ActionTarget::Event(_) => "event",
            ActionTarget::Comment(_) => "comment",
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            ActionTarget::Event(id) | ActionTarget::Comment(id) => *id,
        }
    }
}

/// Appends an entry to the activity log. Invoked as a side effect after a
/// mutation has been validated, never on a failed request.
pub async fn create_action(
    pool: &PgPool,
    user: &User,
    verb: &str,
    target: ActionTarget,
) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO actions (user_id, verb, target_type, target_id) VALUES ($1, $2, $3, $4)",
    )
    .bind(user.id)
    .bind(verb)
    .bind(target.kind())
    .bind(target.id())
    .execute(pool)
    .await?;

    tracing::info!(
        user = %user.username,
        verb = verb,
        target_type = target.kind(),
        target_id = %target.id(),
        "Action logged"
    );
    Ok(())
}
