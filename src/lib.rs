pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod history;
pub mod provider;
pub mod routes;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, Method, Uri};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use error::FeedError;
use state::AppState;

/// Assemble the full application: datafeed routes, permissive CORS on every
/// response (including OPTIONS preflight), and a plain-text 404 fallback.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    routes::api_router()
        .fallback(unknown_endpoint)
        .layer(cors)
        .with_state(state)
}

async fn unknown_endpoint(uri: Uri) -> FeedError {
    FeedError::NotFound(format!("unknown endpoint: {}", uri.path()))
}
