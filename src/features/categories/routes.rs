use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::core::middleware::admin_key_middleware;
use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;

/// Public, read-only category routes
pub fn routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route("/api/categories", get(handlers::list_categories))
        .route("/api/categories/{slug}", get(handlers::get_category))
        .with_state(service)
}

/// Category management routes, gated by the admin key
pub fn admin_routes(service: Arc<CategoryService>, admin_key: Arc<String>) -> Router {
    Router::new()
        .route("/api/admin/categories", post(handlers::create_category))
        .route(
            "/api/admin/categories/{id}",
            get(handlers::get_category_by_id)
                .patch(handlers::update_category)
                .delete(handlers::delete_category),
        )
        .route_layer(from_fn_with_state(admin_key, admin_key_middleware))
        .with_state(service)
}
