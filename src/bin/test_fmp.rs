// src/bin/test_fmp.rs
//
// Manual end-to-end probe against the live provider:
//   FMP_API_KEY=... cargo run --bin test_fmp -- AAPL
use anyhow::Result;
use stock_info_api::services::fmp::FmpClient;
use stock_info_api::services::{search, stock};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let symbol = std::env::args().nth(1).unwrap_or_else(|| "AAPL".to_string());
    let fmp = FmpClient::from_env();

    let info = stock::get_stock_info(&fmp, &symbol)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;
    println!("{}", serde_json::to_string_pretty(&info)?);

    let results = search::search_symbols(&fmp, &symbol).await;
    println!("search {:?} -> {} results", symbol, results.len());
    for r in results {
        println!("  {} ({}) [{}]", r.symbol, r.name, r.exchange);
    }

    Ok(())
}
