// src/handlers/search.rs
use log::info;
use serde::Deserialize;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use crate::handlers::error::ApiError;
use crate::services::fmp::FmpClient;
use crate::services::search::search_symbols;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
}

/// `GET /search?query=...`
///
/// Returns up to 10 stock symbols matching the search query; upstream
/// failures surface as an empty array, not an error.
pub async fn search_stock_symbols(
    query: SearchQuery,
    fmp: Arc<FmpClient>,
) -> Result<Json, Rejection> {
    if query.query.is_empty() {
        return Err(warp::reject::custom(ApiError::bad_request(
            "query must not be empty",
        )));
    }

    info!("Handling symbol search for {:?}", query.query);
    let results = search_symbols(&fmp, &query.query).await;
    Ok(warp::reply::json(&results))
}
