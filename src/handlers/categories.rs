use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use sqlx::PgPool;

use crate::models::Category;
use crate::utils::error::AppError;
use crate::utils::response::success;

#[derive(Serialize)]
struct CategoryListData {
    categories: Vec<Category>,
}

/// GET /categories. The full taxonomy, name ascending, with per-category
/// event counts. Categories are administrator-maintained; this surface is
/// read-only.
pub async fn list_categories(State(pool): State<PgPool>) -> Result<Response, AppError> {
    let categories = sqlx::query_as::<_, Category>(
        "SELECT cat.id, cat.name, cat.description, \
         (SELECT COUNT(*) FROM events e WHERE e.category_id = cat.id) AS events_count, \
         cat.created_at \
         FROM categories cat ORDER BY cat.name",
    )
    .fetch_all(&pool)
    .await?;

    let data = CategoryListData { categories };
    Ok(success(data, "Categories retrieved successfully").into_response())
}
