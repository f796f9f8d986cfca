use serde::Serialize;

/// One catalogued instrument. `kind` serializes as the UDF `type` field.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SymbolDescriptor {
    pub symbol: &'static str,
    pub full_name: &'static str,
    pub description: &'static str,
    pub exchange: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

const fn sym(
    symbol: &'static str,
    full_name: &'static str,
    exchange: &'static str,
    kind: &'static str,
) -> SymbolDescriptor {
    SymbolDescriptor {
        symbol,
        full_name,
        description: full_name,
        exchange,
        kind,
    }
}

/// Static catalog shared by the metadata and search handlers. Declaration
/// order is the order search results come back in.
const CATALOG: &[SymbolDescriptor] = &[
    sym("AAPL", "Apple Inc.", "NASDAQ", "stock"),
    sym("MSFT", "Microsoft Corporation", "NASDAQ", "stock"),
    sym("GOOGL", "Alphabet Inc.", "NASDAQ", "stock"),
    sym("AMZN", "Amazon.com Inc.", "NASDAQ", "stock"),
    sym("TSLA", "Tesla Inc.", "NASDAQ", "stock"),
    sym("NVDA", "NVIDIA Corporation", "NASDAQ", "stock"),
    sym("META", "Meta Platforms Inc.", "NASDAQ", "stock"),
    sym("JPM", "JPMorgan Chase & Co.", "NYSE", "stock"),
    sym("JNJ", "Johnson & Johnson", "NYSE", "stock"),
    sym("V", "Visa Inc.", "NYSE", "stock"),
    sym("SPY", "SPDR S&P 500 ETF", "NYSE", "index"),
    sym("QQQ", "Invesco QQQ Trust", "NASDAQ", "index"),
];

pub fn all() -> &'static [SymbolDescriptor] {
    CATALOG
}

pub fn find(symbol: &str) -> Option<&'static SymbolDescriptor> {
    CATALOG.iter().find(|s| s.symbol.eq_ignore_ascii_case(symbol))
}

/// Case-insensitive substring search over symbol code and full name. An empty
/// query matches everything; results always truncate to `limit`.
pub fn search(query: &str, limit: usize) -> Vec<&'static SymbolDescriptor> {
    let q = query.trim().to_uppercase();
    CATALOG
        .iter()
        .filter(|s| {
            q.is_empty()
                || s.symbol.to_uppercase().contains(&q)
                || s.full_name.to_uppercase().contains(&q)
        })
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_symbol_matches_once() {
        let hits = search("AAPL", 10);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].symbol, "AAPL");
    }

    #[test]
    fn empty_query_returns_catalog_order_truncated() {
        let hits = search("", 3);
        let symbols: Vec<&str> = hits.iter().map(|s| s.symbol).collect();
        assert_eq!(symbols, ["AAPL", "MSFT", "GOOGL"]);
    }

    #[test]
    fn no_match_is_empty() {
        assert!(search("ZZZZ", 10).is_empty());
    }

    #[test]
    fn match_is_case_insensitive_on_code_and_name() {
        assert_eq!(search("apple", 10)[0].symbol, "AAPL");
        assert_eq!(search("msft", 10)[0].symbol, "MSFT");
    }

    #[test]
    fn limit_truncates() {
        assert_eq!(search("", 100).len(), CATALOG.len());
        assert_eq!(search("", 5).len(), 5);
    }

    #[test]
    fn find_ignores_case() {
        assert_eq!(find("tsla").map(|s| s.symbol), Some("TSLA"));
        assert!(find("ZZZZ").is_none());
    }

    #[test]
    fn descriptor_serializes_with_type_field() {
        let v = serde_json::to_value(CATALOG[0]).unwrap();
        assert_eq!(v["symbol"], "AAPL");
        assert_eq!(v["type"], "stock");
        assert!(v.get("kind").is_none());
    }
}
