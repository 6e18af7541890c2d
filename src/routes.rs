// src/routes.rs
use std::convert::Infallible;
use std::sync::Arc;

use log::info;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::handlers::error::ApiError;
use crate::handlers::search::{search_stock_symbols, SearchQuery};
use crate::handlers::stock::{fetch_stock, StockQuery};
use crate::services::fmp::FmpClient;

// Add recovery handling for our custom errors
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = api_error.status;
        message = api_error.message.clone();
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        code = warp::http::StatusCode::BAD_REQUEST;
        message = "Missing or invalid query parameter".to_string();
    } else {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes(fmp: Arc<FmpClient>) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let fmp_filter = warp::any().map(move || fmp.clone());

    let stock_route = warp::path!("stock")
        .and(warp::get())
        .and(warp::query::<StockQuery>())
        .and(fmp_filter.clone())
        .and_then(fetch_stock);

    let search_route = warp::path!("search")
        .and(warp::get())
        .and(warp::query::<SearchQuery>())
        .and(fmp_filter)
        .and_then(search_stock_symbols);

    info!("All routes configured successfully.");

    stock_route.or(search_route).recover(handle_rejection)
}
