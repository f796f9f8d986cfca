use std::env;

/// Feed configuration derived from environment variables.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub bind: String,
    pub port: u16,
    /// How long a normalized history response stays servable from memory.
    pub cache_ttl_secs: u64,
    /// Base URL of the upstream chart API.
    pub upstream_url: String,
    /// Total per-request timeout for upstream calls.
    pub upstream_timeout_secs: u64,
}

fn env_str(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_u16(name: &str, default: u16) -> u16 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl FeedConfig {
    pub fn from_env() -> Self {
        Self {
            bind: env_str("CHARTFEED_BIND", "0.0.0.0"),
            port: env_u16("CHARTFEED_PORT", 8083),
            cache_ttl_secs: env_u64("CHARTFEED_CACHE_TTL_SECS", 300),
            upstream_url: env_str("CHARTFEED_UPSTREAM_URL", "https://query1.finance.yahoo.com"),
            upstream_timeout_secs: env_u64("CHARTFEED_UPSTREAM_TIMEOUT_SECS", 10),
        }
    }
}
