//! Application setup and server configuration.

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, Method,
    },
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::routes::{
    clear_resolved_handler, create_complaint_handler, find_similar_handler, get_complaint_handler,
    health_handler, list_complaints_handler, mark_duplicate_handler, update_complaint_handler,
};

/// Browsers may call every route from any origin.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            CONTENT_TYPE,
        ])
}

/// Build the Axum application router
pub fn build_app(deps: ServerDeps) -> Router {
    Router::new()
        // Duplicate detection
        .route("/functions/v1/find-similar-complaints", post(find_similar_handler))
        .route("/functions/v1/mark-duplicate", post(mark_duplicate_handler))
        // Complaint lifecycle
        .route(
            "/complaints",
            post(create_complaint_handler).get(list_complaints_handler),
        )
        .route("/complaints/clear-resolved", post(clear_resolved_handler))
        .route(
            "/complaints/:id",
            get(get_complaint_handler).patch(update_complaint_handler),
        )
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(deps))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}
