//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::docs;
use super::handlers;
use super::state::AppState;

/// Facts are short strings; anything bigger than this is refused.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive, clients are trusted
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let collection = get(handlers::get_facts).post(handlers::create_fact);

    Router::new()
        .route("/", get(handlers::root))
        .route("/docs", get(docs::docs_page))
        .route("/openapi.json", get(docs::openapi_spec))
        .route("/health", get(handlers::health_check))
        .route(
            "/fact/{fact_id}",
            get(handlers::get_fact)
                .put(handlers::update_fact)
                .delete(handlers::delete_fact),
        )
        .route("/facts", collection.clone())
        .route("/facts/", collection)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::FactRepository;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let repo = Arc::new(LocalRepository::new()) as Arc<dyn FactRepository>;
        let state = AppState::new(repo, AppConfig::default());
        let _router = create_router(state);
    }
}
