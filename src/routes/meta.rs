use axum::extract::Query;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::catalog;
use crate::state::AppState;

pub const SUPPORTED_RESOLUTIONS: &[&str] = &["1", "5", "15", "30", "60", "240", "1D"];

fn now_s() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Build the metadata sub-router.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/config", get(datafeed_config))
        .route("/symbol_info", get(symbol_info))
        .route("/symbols", get(symbol_metadata))
        .route("/search", get(search))
        .route("/time", get(server_time))
}

/// GET /config — static datafeed capabilities.
async fn datafeed_config() -> Json<Value> {
    Json(json!({
        "supported_resolutions": SUPPORTED_RESOLUTIONS,
        "supports_group_request": false,
        "supports_marks": false,
        "supports_search": true,
        "supports_time": true,
        "supports_timescale_marks": false,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SymbolInfoQuery {
    /// Accepted for UDF compatibility; grouping is not supported.
    #[serde(default)]
    #[allow(dead_code)]
    group: String,
}

/// GET /symbol_info — the whole catalog in UDF symbol-info shape.
async fn symbol_info(Query(_q): Query<SymbolInfoQuery>) -> Json<Value> {
    let symbols: Vec<Value> = catalog::all()
        .iter()
        .map(|s| {
            json!({
                "symbol": s.symbol,
                "full_name": s.full_name,
                "description": s.description,
                "exchange": s.exchange,
                "currency": "USD",
                "type": s.kind,
            })
        })
        .collect();
    Json(json!({ "symbols": symbols }))
}

#[derive(Debug, Deserialize)]
pub struct SymbolQuery {
    #[serde(default = "default_symbol")]
    symbol: String,
}

fn default_symbol() -> String {
    "AAPL".to_string()
}

/// GET /symbols — per-symbol session/timezone/pricescale metadata.
async fn symbol_metadata(Query(q): Query<SymbolQuery>) -> Json<Value> {
    let description = catalog::find(&q.symbol)
        .map(|s| s.full_name.to_string())
        .unwrap_or_else(|| q.symbol.clone());
    Json(json!({
        "name": q.symbol,
        "exchange-traded": "NASDAQ",
        "exchange-listed": "NASDAQ",
        "timezone": "America/New_York",
        "minmov": 1,
        "minmov2": 0,
        "pointvalue": 1,
        "session": "0930-1600",
        "has_intraday": true,
        "has_no_volume": false,
        "description": description,
        "type": "stock",
        "supported_resolutions": SUPPORTED_RESOLUTIONS,
        "pricescale": 100,
        "ticker": q.symbol,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    query: String,
    #[serde(default = "default_search_limit")]
    limit: usize,
}

fn default_search_limit() -> usize {
    10
}

/// GET /search — case-insensitive substring search over the catalog.
async fn search(Query(q): Query<SearchQuery>) -> Json<Vec<Value>> {
    let hits: Vec<Value> = catalog::search(&q.query, q.limit)
        .into_iter()
        .map(|s| {
            json!({
                "symbol": s.symbol,
                "full_name": s.full_name,
                "description": s.description,
                "exchange": s.exchange,
                "ticker": s.symbol,
                "type": s.kind,
            })
        })
        .collect();
    Json(hits)
}

/// GET /time — current unix time in seconds, as a bare integer.
async fn server_time() -> Json<i64> {
    Json(now_s())
}
