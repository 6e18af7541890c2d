// src/models.rs
use serde::Serialize;

/// Composite record served by `GET /stock`.
///
/// Profile fields come straight from the provider's company profile;
/// `financial_ratios` keeps the upstream period order while
/// `historical_returns` is year-descending and capped at 20 entries.
#[derive(Debug, Serialize)]
pub struct StockInfo {
    pub symbol: String,
    pub name: String,
    pub exchange: String,
    pub industry: String,
    pub current_price: f64,
    pub market_cap: i64,
    pub currency: String,
    pub description: String,
    pub financial_ratios: Vec<RatioEntry>,
    pub historical_returns: Vec<HistoricalReturn>,
}

/// One fiscal year of ratios joined with basic EPS.
///
/// Ratios the provider did not report are omitted from the serialized
/// entry entirely, so consumers must treat a missing key as "unknown",
/// not zero. `eps_basic` keeps its snake_case spelling on the wire.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatioEntry {
    pub year: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roe: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roa: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gross_margin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_margin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_margin: Option<f64>,
    #[serde(rename = "eps_basic", skip_serializing_if = "Option::is_none")]
    pub eps_basic: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividend_yield: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book_value_per_share: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roce: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debt_to_equity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_coverage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quick_ratio: Option<f64>,
}

/// Yearly open/close price proxy with percent change.
///
/// `change_pct` is null when the opening price is zero.
#[derive(Debug, Serialize)]
pub struct HistoricalReturn {
    pub year: String,
    pub opening_price: f64,
    pub closing_price: f64,
    pub change_pct: Option<f64>,
}

/// One row of the `GET /search` response.
#[derive(Debug, Serialize)]
pub struct SearchResult {
    pub symbol: String,
    pub name: String,
    pub exchange: String,
}
