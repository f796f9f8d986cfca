use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::history::{self, HistoryResponse};
use crate::state::AppState;

/// Build the history sub-router.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/history", get(get_history))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_symbol")]
    symbol: String,
    #[serde(default = "default_resolution")]
    resolution: String,
    #[serde(default)]
    from: i64,
    /// Defaults to now when the chart omits it.
    to: Option<i64>,
}

fn default_symbol() -> String {
    "AAPL".to_string()
}

fn default_resolution() -> String {
    "1D".to_string()
}

fn now_s() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// GET /history — normalized OHLCV columns for a symbol and range.
///
/// Always answers 200; fetch failures are reported inside the body via the
/// `s` status field so the chart can tell "nothing to show" from "broken
/// upstream" without treating either as a transport error.
async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(q): Query<HistoryQuery>,
) -> Json<HistoryResponse> {
    let to = q.to.unwrap_or_else(now_s);
    if let (Some(from_dt), Some(to_dt)) = (
        chrono::DateTime::from_timestamp(q.from, 0),
        chrono::DateTime::from_timestamp(to, 0),
    ) {
        tracing::info!(
            "history {} {} from {from_dt} to {to_dt}",
            q.symbol,
            q.resolution
        );
    }
    Json(history::fetch_history(&state, &q.symbol, &q.resolution, q.from, to).await)
}
