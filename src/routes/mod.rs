pub mod history;
pub mod meta;

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// Assemble the datafeed router.
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new().merge(meta::routes()).merge(history::routes())
}
