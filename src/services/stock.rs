// src/services/stock.rs
use log::error;
use std::collections::HashMap;

use crate::models::{HistoricalReturn, RatioEntry, StockInfo};
use crate::services::fmp::{FmpClient, IncomePeriod, PriceBar, RatioPeriod};
use crate::BoxError;

/// At most this many years of price returns are reported, newest first.
const MAX_RETURN_YEARS: usize = 20;

/// Aggregate profile, ratios, EPS and yearly price returns for one symbol.
///
/// Only the profile fetch is fatal; ratios, income statements and the
/// price history each degrade to an empty dataset when their fetch fails.
pub async fn get_stock_info(fmp: &FmpClient, symbol: &str) -> Result<StockInfo, BoxError> {
    let profile = fmp
        .profile(symbol)
        .await?
        .into_iter()
        .next()
        .ok_or("empty profile response")?;

    let ratios = match fmp.ratios(symbol).await {
        Ok(ratios) => ratios,
        Err(e) => {
            error!("Failed to fetch ratios for {}: {}", symbol, e);
            Vec::new()
        }
    };

    let income = match fmp.income_statements(symbol).await {
        Ok(income) => income,
        Err(e) => {
            error!("Failed to fetch income statements for {}: {}", symbol, e);
            Vec::new()
        }
    };

    let history = match fmp.price_history(symbol).await {
        Ok(history) => history.historical,
        Err(e) => {
            error!("Failed to fetch price history for {}: {}", symbol, e);
            Vec::new()
        }
    };

    Ok(StockInfo {
        symbol: profile.symbol,
        name: profile.company_name,
        exchange: profile.exchange_short_name,
        industry: profile.industry.unwrap_or_else(|| "N/A".to_string()),
        current_price: profile.price,
        market_cap: profile.mkt_cap,
        currency: profile.currency,
        description: profile
            .description
            .unwrap_or_else(|| "No description available.".to_string()),
        financial_ratios: merge_ratios(&ratios, &income),
        historical_returns: yearly_returns(&history),
    })
}

/// Year bucket used to join the datasets: the first 4 characters of a date.
fn fiscal_year(date: &str) -> &str {
    date.get(..4).unwrap_or(date)
}

/// Join ratio periods with basic EPS by fiscal year, keeping the ratio
/// source order. The first income record matching a year wins, even when
/// it carries no EPS value at all.
fn merge_ratios(ratios: &[RatioPeriod], income: &[IncomePeriod]) -> Vec<RatioEntry> {
    ratios
        .iter()
        .map(|ratio| {
            let year = fiscal_year(&ratio.date);
            let eps_basic = income
                .iter()
                .find(|item| fiscal_year(&item.date) == year)
                .and_then(|item| item.earnings_per_share_basic.or(item.eps));
            RatioEntry {
                year: year.to_string(),
                roe: ratio.return_on_equity,
                roa: ratio.return_on_assets,
                gross_margin: ratio.gross_profit_margin,
                operating_margin: ratio.operating_profit_margin,
                net_margin: ratio.net_profit_margin,
                eps_basic,
                dividend_yield: ratio.dividend_yield,
                payout_ratio: ratio.payout_ratio,
                pe_ratio: ratio.price_earnings_ratio,
                book_value_per_share: ratio.book_value_per_share,
                roce: ratio.return_on_capital_employed,
                debt_to_equity: ratio.debt_equity_ratio,
                interest_coverage: ratio.interest_coverage,
                current_ratio: ratio.current_ratio,
                quick_ratio: ratio.quick_ratio,
            }
        })
        .collect()
}

struct PriceSpan {
    min_date: String,
    min_price: f64,
    max_date: String,
    max_price: f64,
}

/// Track the earliest- and latest-dated observation per year.
///
/// Dates are compared as raw strings, not chronologically; for the
/// provider's fixed-width ISO dates the two orders coincide.
fn annual_price_spans(bars: &[PriceBar]) -> HashMap<String, PriceSpan> {
    let mut spans: HashMap<String, PriceSpan> = HashMap::new();
    for bar in bars {
        let date = match &bar.date {
            Some(date) => date,
            None => continue,
        };
        let price = match bar.adj_close.or(bar.close) {
            Some(price) => price,
            None => continue,
        };
        match spans.get_mut(fiscal_year(date)) {
            Some(span) => {
                if *date < span.min_date {
                    span.min_date = date.clone();
                    span.min_price = price;
                }
                if *date > span.max_date {
                    span.max_date = date.clone();
                    span.max_price = price;
                }
            }
            None => {
                spans.insert(
                    fiscal_year(date).to_string(),
                    PriceSpan {
                        min_date: date.clone(),
                        min_price: price,
                        max_date: date.clone(),
                        max_price: price,
                    },
                );
            }
        }
    }
    spans
}

/// Yearly open/close proxies with percent change, newest year first,
/// capped at `MAX_RETURN_YEARS`. A zero opening price yields a null
/// percent change rather than an error.
fn yearly_returns(bars: &[PriceBar]) -> Vec<HistoricalReturn> {
    let spans = annual_price_spans(bars);
    let mut years: Vec<&String> = spans.keys().collect();
    years.sort_by(|a, b| b.cmp(a));
    years.truncate(MAX_RETURN_YEARS);

    years
        .into_iter()
        .map(|year| {
            let span = &spans[year];
            let change_pct = if span.min_price == 0.0 {
                None
            } else {
                Some(round2(
                    (span.max_price - span.min_price) / span.min_price * 100.0,
                ))
            };
            HistoricalReturn {
                year: year.clone(),
                opening_price: round2(span.min_price),
                closing_price: round2(span.max_price),
                change_pct,
            }
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratio(date: &str) -> RatioPeriod {
        RatioPeriod {
            date: date.to_string(),
            ..Default::default()
        }
    }

    fn income(date: &str, basic: Option<f64>, eps: Option<f64>) -> IncomePeriod {
        IncomePeriod {
            date: date.to_string(),
            earnings_per_share_basic: basic,
            eps,
        }
    }

    fn bar(date: &str, adj_close: Option<f64>, close: Option<f64>) -> PriceBar {
        PriceBar {
            date: Some(date.to_string()),
            adj_close,
            close,
        }
    }

    #[test]
    fn fiscal_year_truncates_to_four_chars() {
        assert_eq!(fiscal_year("2020-12-31"), "2020");
        assert_eq!(fiscal_year("2020"), "2020");
        assert_eq!(fiscal_year("20"), "20");
        assert_eq!(fiscal_year(""), "");
    }

    #[test]
    fn merge_prefers_basic_eps_over_generic() {
        let ratios = vec![ratio("2020-12-31")];
        let income = vec![income("2020-09-30", Some(3.31), Some(3.28))];
        let merged = merge_ratios(&ratios, &income);
        assert_eq!(merged[0].eps_basic, Some(3.31));
    }

    #[test]
    fn merge_falls_back_to_generic_eps() {
        let ratios = vec![ratio("2020-12-31")];
        let income = vec![income("2020-03-31", None, Some(5.0))];
        let merged = merge_ratios(&ratios, &income);
        assert_eq!(merged[0].year, "2020");
        assert_eq!(merged[0].eps_basic, Some(5.0));
    }

    #[test]
    fn merge_takes_first_income_record_per_year() {
        // The first matching record wins even when it has no EPS fields;
        // the search does not continue to the later restatement.
        let ratios = vec![ratio("2019-12-31")];
        let income = vec![
            income("2019-06-30", None, None),
            income("2019-12-31", Some(2.0), Some(2.0)),
        ];
        let merged = merge_ratios(&ratios, &income);
        assert_eq!(merged[0].eps_basic, None);
    }

    #[test]
    fn merge_keeps_ratio_source_order() {
        let ratios = vec![ratio("2019-12-31"), ratio("2021-12-31"), ratio("2020-12-31")];
        let merged = merge_ratios(&ratios, &[]);
        let years: Vec<&str> = merged.iter().map(|e| e.year.as_str()).collect();
        assert_eq!(years, vec!["2019", "2021", "2020"]);
    }

    #[test]
    fn all_null_ratios_serialize_to_year_only() {
        let ratios = vec![ratio("2022-12-31")];
        let merged = merge_ratios(&ratios, &[]);
        let value = serde_json::to_value(&merged[0]).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["year"]);
    }

    #[test]
    fn sparse_entry_serializes_only_present_fields() {
        let mut periods = vec![ratio("2022-12-31")];
        periods[0].return_on_equity = Some(0.27);
        periods[0].gross_profit_margin = Some(0.41);
        let income = vec![income("2022-12-31", Some(4.1), None)];
        let merged = merge_ratios(&periods, &income);
        let value = serde_json::to_value(&merged[0]).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["year", "roe", "grossMargin", "eps_basic"]);
    }

    #[test]
    fn yearly_return_from_first_and_last_trading_day() {
        let bars = vec![
            bar("2021-01-04", None, Some(100.0)),
            bar("2021-06-15", None, Some(225.0)),
            bar("2021-12-31", None, Some(150.0)),
        ];
        let returns = yearly_returns(&bars);
        assert_eq!(returns.len(), 1);
        assert_eq!(returns[0].year, "2021");
        assert_eq!(returns[0].opening_price, 100.0);
        assert_eq!(returns[0].closing_price, 150.0);
        assert_eq!(returns[0].change_pct, Some(50.0));
    }

    #[test]
    fn adjusted_close_wins_over_raw_close() {
        let bars = vec![
            bar("2020-01-02", Some(95.0), Some(100.0)),
            bar("2020-12-30", Some(190.0), Some(200.0)),
        ];
        let returns = yearly_returns(&bars);
        assert_eq!(returns[0].opening_price, 95.0);
        assert_eq!(returns[0].closing_price, 190.0);
        assert_eq!(returns[0].change_pct, Some(100.0));
    }

    #[test]
    fn bars_without_date_or_price_are_skipped() {
        let bars = vec![
            PriceBar {
                date: None,
                adj_close: Some(1.0),
                close: Some(1.0),
            },
            bar("2020-05-05", None, None),
            bar("2020-03-02", None, Some(80.0)),
        ];
        let returns = yearly_returns(&bars);
        assert_eq!(returns.len(), 1);
        assert_eq!(returns[0].opening_price, 80.0);
        assert_eq!(returns[0].closing_price, 80.0);
        assert_eq!(returns[0].change_pct, Some(0.0));
    }

    #[test]
    fn zero_opening_price_yields_null_change() {
        let bars = vec![
            bar("2018-01-02", None, Some(0.0)),
            bar("2018-12-28", None, Some(12.0)),
        ];
        let returns = yearly_returns(&bars);
        assert_eq!(returns[0].change_pct, None);
        assert_eq!(returns[0].opening_price, 0.0);
        assert_eq!(returns[0].closing_price, 12.0);
    }

    #[test]
    fn returns_sorted_year_descending_and_capped_at_twenty() {
        let mut bars = Vec::new();
        for year in 1995..2022 {
            bars.push(bar(&format!("{}-01-03", year), None, Some(10.0)));
            bars.push(bar(&format!("{}-12-29", year), None, Some(11.0)));
        }
        let returns = yearly_returns(&bars);
        assert_eq!(returns.len(), 20);
        assert_eq!(returns[0].year, "2021");
        assert_eq!(returns[19].year, "2002");
    }

    #[test]
    fn change_pct_rounds_to_two_decimals() {
        let bars = vec![
            bar("2019-01-02", None, Some(3.0)),
            bar("2019-12-31", None, Some(4.0)),
        ];
        let returns = yearly_returns(&bars);
        // (4 - 3) / 3 * 100 = 33.333...
        assert_eq!(returns[0].change_pct, Some(33.33));
    }
}
