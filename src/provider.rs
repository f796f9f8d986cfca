use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::history::FetchWindow;

/// A single upstream observation, timestamped in unix seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProviderBar {
    pub ts: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Missing for bars the provider reports without volume.
    pub volume: Option<f64>,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("upstream request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upstream error: {0}")]
    Upstream(String),
    #[error("malformed upstream payload: {0}")]
    Decode(String),
}

/// Source of raw OHLCV observations for a symbol over a now-anchored window.
#[async_trait]
pub trait BarSource: Send + Sync {
    async fn fetch_bars(
        &self,
        symbol: &str,
        window: FetchWindow,
    ) -> Result<Vec<ProviderBar>, ProviderError>;
}

/// Yahoo Finance v8 chart API client.
pub struct YahooClient {
    base_url: String,
    http: reqwest::Client,
}

impl YahooClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ProviderError> {
        // Yahoo rejects requests without a browser-looking User-Agent.
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) chartfeed/0.1")
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }
}

#[async_trait]
impl BarSource for YahooClient {
    async fn fetch_bars(
        &self,
        symbol: &str,
        window: FetchWindow,
    ) -> Result<Vec<ProviderBar>, ProviderError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let resp = self
            .http
            .get(&url)
            .query(&[("range", window.range), ("interval", window.interval)])
            .send()
            .await?
            .error_for_status()?;
        let body: ChartEnvelope = resp.json().await?;
        decode_chart(body)
    }
}

// ── Wire format ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartNode,
}

#[derive(Debug, Deserialize)]
struct ChartNode {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

fn decode_chart(body: ChartEnvelope) -> Result<Vec<ProviderBar>, ProviderError> {
    if let Some(err) = body.chart.error {
        let msg = err
            .description
            .or(err.code)
            .unwrap_or_else(|| "unspecified upstream error".to_string());
        return Err(ProviderError::Upstream(msg));
    }

    let result = body
        .chart
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
        .ok_or_else(|| ProviderError::Decode("missing chart.result".to_string()))?;
    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Decode("missing indicators.quote".to_string()))?;

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        // Slots with a missing OHLC value are halted or blank periods; skip.
        let (Some(open), Some(high), Some(low), Some(close)) = (
            quote.open.get(i).copied().flatten(),
            quote.high.get(i).copied().flatten(),
            quote.low.get(i).copied().flatten(),
            quote.close.get(i).copied().flatten(),
        ) else {
            continue;
        };
        let volume = quote.volume.get(i).copied().flatten();
        bars.push(ProviderBar {
            ts,
            open,
            high,
            low,
            close,
            volume,
        });
    }
    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(v: serde_json::Value) -> ChartEnvelope {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn decodes_chart_payload() {
        let body = envelope(json!({
            "chart": {
                "result": [{
                    "meta": { "symbol": "AAPL", "regularMarketPrice": 190.1 },
                    "timestamp": [1_700_000_000_i64, 1_700_086_400_i64],
                    "indicators": {
                        "quote": [{
                            "open":   [189.51, 190.02],
                            "high":   [191.00, 192.34],
                            "low":    [188.90, 189.77],
                            "close":  [190.10, 191.45],
                            "volume": [51_230_000.0, null]
                        }]
                    }
                }],
                "error": null
            }
        }));

        let bars = decode_chart(body).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].ts, 1_700_000_000);
        assert_eq!(bars[0].open, 189.51);
        assert_eq!(bars[0].volume, Some(51_230_000.0));
        assert_eq!(bars[1].volume, None);
    }

    #[test]
    fn slot_with_null_ohlc_is_skipped() {
        let body = envelope(json!({
            "chart": {
                "result": [{
                    "timestamp": [1, 2, 3],
                    "indicators": {
                        "quote": [{
                            "open":   [1.0, null, 3.0],
                            "high":   [1.0, 2.0, 3.0],
                            "low":    [1.0, 2.0, 3.0],
                            "close":  [1.0, 2.0, 3.0],
                            "volume": [10.0, 20.0, 30.0]
                        }]
                    }
                }],
                "error": null
            }
        }));

        let bars = decode_chart(body).unwrap();
        let ts: Vec<i64> = bars.iter().map(|b| b.ts).collect();
        assert_eq!(ts, [1, 3]);
    }

    #[test]
    fn upstream_error_body_is_reported() {
        let body = envelope(json!({
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
            }
        }));

        match decode_chart(body) {
            Err(ProviderError::Upstream(msg)) => {
                assert!(msg.contains("delisted"));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[test]
    fn missing_result_is_a_decode_error() {
        let body = envelope(json!({ "chart": { "result": [], "error": null } }));
        assert!(matches!(decode_chart(body), Err(ProviderError::Decode(_))));
    }

    #[test]
    fn missing_quote_block_is_a_decode_error() {
        let body = envelope(json!({
            "chart": {
                "result": [{ "timestamp": [1], "indicators": { "quote": [] } }],
                "error": null
            }
        }));
        assert!(matches!(decode_chart(body), Err(ProviderError::Decode(_))));
    }
}
