#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
use axum::Router;
#[cfg(test)]
use axum_test::TestServer;

#[cfg(test)]
use crate::core::config::CategoryConfig;
#[cfg(test)]
use crate::features::categories::repositories::CategoryRepository;
#[cfg(test)]
use crate::features::categories::{routes, CategoryService};

#[cfg(test)]
pub use crate::core::middleware::ADMIN_KEY_HEADER as ADMIN_HEADER;

#[cfg(test)]
pub const TEST_ADMIN_KEY: &str = "test-admin-key";

/// Public and admin category routes over the given store
#[cfg(test)]
pub fn category_app(repository: Arc<dyn CategoryRepository>) -> Router {
    let service = Arc::new(CategoryService::new(repository, CategoryConfig::default()));

    Router::new()
        .merge(routes::routes(Arc::clone(&service)))
        .merge(routes::admin_routes(
            service,
            Arc::new(TEST_ADMIN_KEY.to_string()),
        ))
}

#[cfg(test)]
pub fn test_server(repository: Arc<dyn CategoryRepository>) -> TestServer {
    TestServer::new(category_app(repository)).unwrap()
}
