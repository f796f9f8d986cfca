use serde::{Deserialize, Serialize};

use crate::cache::CacheKey;
use crate::provider::ProviderBar;
use crate::state::AppState;

/// Upstream query window: always anchored to "now" and chosen from the chart
/// resolution alone. The caller's from/to only narrow the result afterwards,
/// so ranges entirely outside the lookback come back as empty ok envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub range: &'static str,
    pub interval: &'static str,
}

pub fn window_for_resolution(resolution: &str) -> FetchWindow {
    match resolution {
        "1D" => FetchWindow {
            range: "2y",
            interval: "1d",
        },
        "60" | "240" => FetchWindow {
            range: "60d",
            interval: "1h",
        },
        _ => FetchWindow {
            range: "7d",
            interval: "5m",
        },
    }
}

/// One normalized chart bar. Time is epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarPoint {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// UDF history payload: exactly one of ok / no_data / error, tagged by `s`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "s", rename_all = "snake_case")]
pub enum HistoryResponse {
    Ok {
        t: Vec<i64>,
        o: Vec<f64>,
        h: Vec<f64>,
        l: Vec<f64>,
        c: Vec<f64>,
        v: Vec<u64>,
    },
    NoData,
    Error {
        errmsg: String,
    },
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Shape provider observations into chart bars.
///
/// The range filter compares the raw second-resolution timestamps against
/// `[from_ts, to_ts]` inclusive, while the stored time is in milliseconds —
/// kept that way for wire compatibility with existing chart clients. Prices
/// round to 2 decimals; absent or non-finite volume coerces to 0; output is
/// sorted ascending because the provider does not guarantee order.
pub fn normalize_bars(observations: &[ProviderBar], from_ts: i64, to_ts: i64) -> Vec<BarPoint> {
    let mut bars: Vec<BarPoint> = observations
        .iter()
        .filter(|b| from_ts <= b.ts && b.ts <= to_ts)
        .map(|b| BarPoint {
            time: b.ts * 1000,
            open: round2(b.open),
            high: round2(b.high),
            low: round2(b.low),
            close: round2(b.close),
            volume: b
                .volume
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(|v| v as u64)
                .unwrap_or(0),
        })
        .collect();
    bars.sort_by_key(|b| b.time);
    bars
}

fn envelope(bars: &[BarPoint]) -> HistoryResponse {
    HistoryResponse::Ok {
        t: bars.iter().map(|b| b.time).collect(),
        o: bars.iter().map(|b| b.open).collect(),
        h: bars.iter().map(|b| b.high).collect(),
        l: bars.iter().map(|b| b.low).collect(),
        c: bars.iter().map(|b| b.close).collect(),
        v: bars.iter().map(|b| b.volume).collect(),
    }
}

/// Serve a history request, consulting the cache first.
///
/// Success envelopes are cached (an ok with zero bars included); `no_data`
/// and `error` are not, so the next request retries upstream. Concurrent
/// misses on one key may each hit upstream; the later write simply wins.
pub async fn fetch_history(
    state: &AppState,
    symbol: &str,
    resolution: &str,
    from_ts: i64,
    to_ts: i64,
) -> HistoryResponse {
    let key = CacheKey::new(symbol, resolution, from_ts, to_ts);
    if let Some(hit) = state.cache.get(&key) {
        tracing::debug!("cache hit for {symbol} {resolution} [{from_ts}, {to_ts}]");
        return hit;
    }

    let window = window_for_resolution(resolution);
    let observations = match state.source.fetch_bars(symbol, window).await {
        Ok(obs) => obs,
        Err(e) => {
            tracing::warn!("upstream fetch failed for {symbol}: {e}");
            return HistoryResponse::Error {
                errmsg: e.to_string(),
            };
        }
    };

    if observations.is_empty() {
        tracing::info!(
            "no data for {symbol} over {}/{}",
            window.range,
            window.interval
        );
        return HistoryResponse::NoData;
    }

    let bars = normalize_bars(&observations, from_ts, to_ts);
    tracing::info!(
        "fetched {} bars for {symbol} {resolution} ({} upstream observations)",
        bars.len(),
        observations.len()
    );
    let response = envelope(&bars);
    state.cache.put(key, response.clone());
    response
}
