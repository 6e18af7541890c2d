// src/services/fmp.rs
use log::{info, warn};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::env;

use crate::BoxError;

pub const DEFAULT_BASE_URL: &str = "https://financialmodelingprep.com/api/v3";

/// How many yearly periods of ratio / income data to request.
const PERIOD_LIMIT: u32 = 20;
/// Upstream cap on symbol search results.
const SEARCH_LIMIT: u32 = 10;

/// Company profile as returned by `/profile/{symbol}`.
///
/// The endpoint answers with a list; the first element is authoritative.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub symbol: String,
    pub company_name: String,
    pub exchange_short_name: String,
    pub industry: Option<String>,
    pub price: f64,
    pub mkt_cap: i64,
    pub currency: String,
    pub description: Option<String>,
}

/// One period of financial ratios from `/ratios/{symbol}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatioPeriod {
    pub date: String,
    pub return_on_equity: Option<f64>,
    pub return_on_assets: Option<f64>,
    pub gross_profit_margin: Option<f64>,
    pub operating_profit_margin: Option<f64>,
    pub net_profit_margin: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub payout_ratio: Option<f64>,
    pub price_earnings_ratio: Option<f64>,
    pub book_value_per_share: Option<f64>,
    pub return_on_capital_employed: Option<f64>,
    pub debt_equity_ratio: Option<f64>,
    pub interest_coverage: Option<f64>,
    pub current_ratio: Option<f64>,
    pub quick_ratio: Option<f64>,
}

/// The EPS-bearing slice of `/income-statement/{symbol}` records.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncomePeriod {
    pub date: String,
    #[serde(rename = "earningsPerShareBasic")]
    pub earnings_per_share_basic: Option<f64>,
    pub eps: Option<f64>,
}

/// Envelope of `/historical-price-full/{symbol}?serietype=line`.
/// A body without a `historical` field is an empty series.
#[derive(Debug, Default, Deserialize)]
pub struct PriceHistory {
    #[serde(default)]
    pub historical: Vec<PriceBar>,
}

/// One daily price observation. Bars without a date, or with neither
/// an adjusted nor a raw close, are skipped by the aggregation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceBar {
    pub date: Option<String>,
    #[serde(rename = "adjClose")]
    pub adj_close: Option<f64>,
    pub close: Option<f64>,
}

/// One row of the `/search` endpoint response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchHit {
    pub symbol: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "exchangeShortName")]
    pub exchange_short_name: Option<String>,
}

/// Immutable handle on the financial data provider.
///
/// Built once at startup and shared across requests behind an `Arc`.
pub struct FmpClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl FmpClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        FmpClient {
            http: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Build a client from `FMP_API_KEY` and an optional `FMP_BASE_URL` override.
    ///
    /// A missing key is not fatal here; the provider will reject the
    /// requests and the handlers degrade accordingly.
    pub fn from_env() -> Self {
        let api_key = env::var("FMP_API_KEY").unwrap_or_else(|_| {
            warn!("$FMP_API_KEY not set, upstream requests will be rejected by the provider");
            String::new()
        });
        let base_url = env::var("FMP_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        FmpClient::new(base_url, api_key)
    }

    pub async fn profile(&self, symbol: &str) -> Result<Vec<CompanyProfile>, BoxError> {
        info!("Fetching company profile for {}", symbol);
        let url = format!("{}/profile/{}?apikey={}", self.base_url, symbol, self.api_key);
        self.get_json(&url).await
    }

    pub async fn ratios(&self, symbol: &str) -> Result<Vec<RatioPeriod>, BoxError> {
        info!("Fetching financial ratios for {}", symbol);
        let url = format!(
            "{}/ratios/{}?limit={}&apikey={}",
            self.base_url, symbol, PERIOD_LIMIT, self.api_key
        );
        self.get_json(&url).await
    }

    pub async fn income_statements(&self, symbol: &str) -> Result<Vec<IncomePeriod>, BoxError> {
        info!("Fetching income statements for {}", symbol);
        let url = format!(
            "{}/income-statement/{}?limit={}&apikey={}",
            self.base_url, symbol, PERIOD_LIMIT, self.api_key
        );
        self.get_json(&url).await
    }

    pub async fn price_history(&self, symbol: &str) -> Result<PriceHistory, BoxError> {
        info!("Fetching historical prices for {}", symbol);
        let url = format!(
            "{}/historical-price-full/{}?serietype=line&apikey={}",
            self.base_url, symbol, self.api_key
        );
        self.get_json(&url).await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>, BoxError> {
        info!("Searching symbols for {:?}", query);
        let url = format!(
            "{}/search?query={}&limit={}&apikey={}",
            self.base_url, query, SEARCH_LIMIT, self.api_key
        );
        self.get_json(&url).await
    }

    // Only an exact 200 counts as success; anything else is left to the
    // caller to degrade or fail on.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, BoxError> {
        let resp = self.http.get(url).send().await?;
        if resp.status() != StatusCode::OK {
            return Err(format!("provider returned HTTP {}", resp.status()).into());
        }
        Ok(resp.json::<T>().await?)
    }
}
