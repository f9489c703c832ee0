use axum::{
    middleware,
    routing::{delete, get},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bookmark routes under /api
fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/bookmarks",
            get(handlers::list_bookmarks).post(handlers::create_bookmark),
        )
        .route("/bookmarks/:item_id", delete(handlers::delete_bookmark))
}
