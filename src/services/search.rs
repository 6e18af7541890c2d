// src/services/search.rs
use log::error;

use crate::models::SearchResult;
use crate::services::fmp::{FmpClient, SearchHit};

/// Search the provider for ticker symbols matching `query`.
///
/// Any upstream failure degrades to an empty list. Rows without a
/// symbol or name are dropped; upstream order is preserved.
pub async fn search_symbols(fmp: &FmpClient, query: &str) -> Vec<SearchResult> {
    let hits = match fmp.search(query).await {
        Ok(hits) => hits,
        Err(e) => {
            error!("Symbol search failed for {:?}: {}", query, e);
            return Vec::new();
        }
    };

    hits.into_iter().filter_map(project_hit).collect()
}

fn project_hit(hit: SearchHit) -> Option<SearchResult> {
    let symbol = hit.symbol.filter(|s| !s.is_empty())?;
    let name = hit.name.filter(|n| !n.is_empty())?;
    Some(SearchResult {
        symbol,
        name,
        exchange: hit.exchange_short_name.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(symbol: Option<&str>, name: Option<&str>, exchange: Option<&str>) -> SearchHit {
        SearchHit {
            symbol: symbol.map(str::to_string),
            name: name.map(str::to_string),
            exchange_short_name: exchange.map(str::to_string),
        }
    }

    #[test]
    fn rows_missing_symbol_or_name_are_dropped() {
        assert!(project_hit(hit(None, Some("Apple Inc."), Some("NASDAQ"))).is_none());
        assert!(project_hit(hit(Some("AAPL"), None, Some("NASDAQ"))).is_none());
        assert!(project_hit(hit(Some(""), Some("Apple Inc."), Some("NASDAQ"))).is_none());
        assert!(project_hit(hit(Some("AAPL"), Some(""), Some("NASDAQ"))).is_none());
    }

    #[test]
    fn missing_exchange_defaults_to_empty_string() {
        let result = project_hit(hit(Some("AAPL"), Some("Apple Inc."), None)).unwrap();
        assert_eq!(result.symbol, "AAPL");
        assert_eq!(result.name, "Apple Inc.");
        assert_eq!(result.exchange, "");
    }
}
