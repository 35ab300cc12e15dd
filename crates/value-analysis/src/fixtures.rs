use chrono::NaiveDate;
use valuation_core::{
    FinancialSnapshot, HistoricalEps, HistoricalPrice, QualitativeAnalysis, YearOverYearMetric,
};

/// Company that passes every checklist rule and every quality signal.
///
/// Price 45 against EPS 5, 3y average EPS 4.5 and book value 37.5 gives
/// P/E(3y) 10, P/B 1.2, trailing P/E 9 and PEG 0.75 at 12% growth.
pub(crate) fn strong_snapshot() -> FinancialSnapshot {
    FinancialSnapshot {
        ticker: "ACME".to_string(),
        company_name: "Acme Industrial Corp".to_string(),
        logo_url: None,
        current_price: 45.0,
        market_cap: 5_000_000_000.0,
        eps: 5.0,
        book_value_per_share: 37.5,
        current_assets: 1_000_000_000.0,
        current_liabilities: 300_000_000.0,
        roe: Some(0.14),
        debt_to_equity: Some(0.3),
        long_term_debt: 200_000_000.0,
        has_positive_earnings_last_10_years: true,
        has_uninterrupted_dividends_last_20_years: true,
        eps_10_years_ago: 3.0,
        three_year_average_eps: 4.5,
        total_liabilities: 600_000_000.0,
        preferred_stock_value: 0.0,
        shares_outstanding: YearOverYearMetric::new(100_000_000.0, 100_000_000.0),
        roa: YearOverYearMetric::new(0.10, 0.08),
        operating_cash_flow: 600_000_000.0,
        net_income: 500_000_000.0,
        capital_expenditures: Some(150_000_000.0),
        long_term_debt_history: YearOverYearMetric::new(0.20, 0.25),
        current_ratio_history: YearOverYearMetric::new(2.5, 2.2),
        gross_margin: YearOverYearMetric::new(0.41, 0.40),
        asset_turnover: YearOverYearMetric::new(0.9, 0.8),
        estimated_eps_growth_rate: 0.12,
        qualitative_analysis: QualitativeAnalysis {
            economic_moat: "Entrenched distribution network.".to_string(),
            management_quality: "Conservative capital allocation.".to_string(),
        },
        historical_prices: vec![HistoricalPrice {
            date: NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(),
            price: 45.0,
        }],
        historical_eps: vec![
            HistoricalEps { year: 2022, eps: 4.2 },
            HistoricalEps { year: 2023, eps: 4.6 },
            HistoricalEps { year: 2024, eps: 5.0 },
        ],
        historical_debt_to_equity: Vec::new(),
        historical_pe: Vec::new(),
        grounding_chunks: Vec::new(),
    }
}
