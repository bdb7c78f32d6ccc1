use super::handlers::{ApiState, handle_list_scores, handle_root, handle_submit_score};
use super::protocol::{ENDPOINT_ROOT, ENDPOINT_SCORES};

use axum::{
    Extension, Router,
    http::{Method, header::CONTENT_TYPE},
    routing::get,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Builds the application router. Browsers on any origin may call the API.
pub fn build_router(state: Arc<ApiState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route(ENDPOINT_ROOT, get(handle_root))
        .route(
            ENDPOINT_SCORES,
            get(handle_list_scores).post(handle_submit_score),
        )
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
