use axum::routing::get;
use axum::Router;
use sqlx::PgPool;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::categories::list_categories;
use crate::handlers::comments::create_comment;
use crate::handlers::events::{
    create_event, delete_event, event_detail, list_events, upcoming_events, update_event,
};
use crate::handlers::health_check;

pub fn create_routes(pool: PgPool) -> Router {
    Router::new()
        .route("/", get(upcoming_events))
        .route("/health", get(health_check))
        .route("/events", get(list_events).post(create_event))
        // GET renders the detail view, POST submits a comment
        .route(
            "/events/:id",
            get(event_detail)
                .post(create_comment)
                .put(update_event)
                .delete(delete_event),
        )
        .route("/categories", get(list_categories))
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
        .with_state(pool)
}
