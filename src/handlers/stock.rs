// src/handlers/stock.rs
use log::{error, info};
use serde::Deserialize;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use crate::handlers::error::ApiError;
use crate::services::fmp::FmpClient;
use crate::services::stock::get_stock_info;

#[derive(Debug, Deserialize)]
pub struct StockQuery {
    pub symbol: String,
}

/// `GET /stock?symbol=...`
///
/// Always replies 200 once the query is well-formed: either the composite
/// record, or `{"error": "Failed to fetch stock profile"}` when the
/// profile fetch comes back empty or non-200.
pub async fn fetch_stock(query: StockQuery, fmp: Arc<FmpClient>) -> Result<Json, Rejection> {
    if query.symbol.is_empty() {
        return Err(warp::reject::custom(ApiError::bad_request(
            "symbol must not be empty",
        )));
    }

    info!("Handling stock info request for {}", query.symbol);
    match get_stock_info(&fmp, &query.symbol).await {
        Ok(data) => Ok(warp::reply::json(&data)),
        Err(e) => {
            error!("Failed to fetch stock profile for {}: {}", query.symbol, e);
            Ok(warp::reply::json(&serde_json::json!({
                "error": "Failed to fetch stock profile",
            })))
        }
    }
}
