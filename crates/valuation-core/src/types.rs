use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{FetchError, Ratio};

/// Metric reported for the current and the previous fiscal year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearOverYearMetric {
    pub current_year: f64,
    pub previous_year: f64,
}

impl YearOverYearMetric {
    pub fn new(current_year: f64, previous_year: f64) -> Self {
        Self { current_year, previous_year }
    }

    /// Strictly higher than last year
    pub fn improved(&self) -> bool {
        self.current_year > self.previous_year
    }

    /// Strictly lower than last year
    pub fn declined(&self) -> bool {
        self.current_year < self.previous_year
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPrice {
    pub date: NaiveDate,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalEps {
    pub year: i32,
    pub eps: f64,
}

/// Year-indexed ratio series (P/E, debt-to-equity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRatio {
    pub year: i32,
    pub ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualitativeAnalysis {
    pub economic_moat: String,
    pub management_quality: String,
}

/// Web source the provider cited for the figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebSource {
    pub uri: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundingChunk {
    #[serde(default)]
    pub web: Option<WebSource>,
}

/// Point-in-time fundamentals for one company, as delivered by a snapshot provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSnapshot {
    pub ticker: String,
    pub company_name: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    pub current_price: f64,
    pub market_cap: f64,

    // Core financials
    /// Trailing twelve months
    pub eps: f64,
    pub book_value_per_share: f64,
    pub current_assets: f64,
    pub current_liabilities: f64,
    #[serde(default)]
    pub roe: Option<f64>,
    #[serde(default)]
    pub debt_to_equity: Option<f64>,

    // Defensive criteria inputs
    pub long_term_debt: f64,
    pub has_positive_earnings_last_10_years: bool,
    pub has_uninterrupted_dividends_last_20_years: bool,
    pub eps_10_years_ago: f64,
    #[serde(rename = "threeYearAverageEPS")]
    pub three_year_average_eps: f64,

    // Liquidation value inputs
    pub total_liabilities: f64,
    pub preferred_stock_value: f64,

    // Quality score inputs
    pub shares_outstanding: YearOverYearMetric,
    pub roa: YearOverYearMetric,
    pub operating_cash_flow: f64,
    pub net_income: f64,
    #[serde(default)]
    pub capital_expenditures: Option<f64>,
    pub long_term_debt_history: YearOverYearMetric,
    pub current_ratio_history: YearOverYearMetric,
    pub gross_margin: YearOverYearMetric,
    pub asset_turnover: YearOverYearMetric,

    /// Five-year forward estimate as a decimal (0.12 = 12%)
    #[serde(rename = "estimatedEPSGrowthRate")]
    pub estimated_eps_growth_rate: f64,

    pub qualitative_analysis: QualitativeAnalysis,

    pub historical_prices: Vec<HistoricalPrice>,
    #[serde(rename = "historicalEPS")]
    pub historical_eps: Vec<HistoricalEps>,
    #[serde(default)]
    pub historical_debt_to_equity: Vec<HistoricalRatio>,
    #[serde(rename = "historicalPE", default)]
    pub historical_pe: Vec<HistoricalRatio>,

    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

impl FinancialSnapshot {
    /// Put every historical series in chronological order.
    pub fn sort_history(&mut self) {
        self.historical_prices.sort_by_key(|p| p.date);
        self.historical_eps.sort_by_key(|e| e.year);
        self.historical_debt_to_equity.sort_by_key(|r| r.year);
        self.historical_pe.sort_by_key(|r| r.year);
    }

    /// Check the invariants the analysis engine relies on.
    pub fn validate(&self) -> Result<(), FetchError> {
        if self.ticker.trim().is_empty() {
            return Err(FetchError::MalformedData("empty ticker".to_string()));
        }
        if self.company_name.trim().is_empty() {
            return Err(FetchError::MalformedData(format!(
                "empty company name for {}",
                self.ticker
            )));
        }

        let scalars = [
            ("currentPrice", self.current_price),
            ("marketCap", self.market_cap),
            ("eps", self.eps),
            ("bookValuePerShare", self.book_value_per_share),
            ("currentAssets", self.current_assets),
            ("currentLiabilities", self.current_liabilities),
            ("longTermDebt", self.long_term_debt),
            ("eps10YearsAgo", self.eps_10_years_ago),
            ("threeYearAverageEPS", self.three_year_average_eps),
            ("totalLiabilities", self.total_liabilities),
            ("preferredStockValue", self.preferred_stock_value),
            ("operatingCashFlow", self.operating_cash_flow),
            ("netIncome", self.net_income),
            ("estimatedEPSGrowthRate", self.estimated_eps_growth_rate),
        ];
        let pairs = [
            ("sharesOutstanding", self.shares_outstanding),
            ("roa", self.roa),
            ("longTermDebtHistory", self.long_term_debt_history),
            ("currentRatioHistory", self.current_ratio_history),
            ("grossMargin", self.gross_margin),
            ("assetTurnover", self.asset_turnover),
        ];

        for (field, value) in scalars {
            if !value.is_finite() {
                return Err(FetchError::MalformedData(format!(
                    "field \"{}\" is not a finite number",
                    field
                )));
            }
        }
        for (field, pair) in pairs {
            if !pair.current_year.is_finite() || !pair.previous_year.is_finite() {
                return Err(FetchError::MalformedData(format!(
                    "field \"{}\" is not a finite number",
                    field
                )));
            }
        }
        Ok(())
    }
}

/// One evaluated rule of a checklist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub name: String,
    pub pass: bool,
    pub value: String,
    pub description: String,
}

/// Defensive-investor checklist outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrahamAnalysis {
    pub checklist: Vec<ChecklistItem>,
    pub passed_count: u32,
    pub total_count: u32,
}

/// Nine-signal financial quality outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiotroskiAnalysis {
    pub score: u32,
    pub checks: Vec<ChecklistItem>,
}

/// Intrinsic value estimates.
///
/// `graham_number` and `ncav_per_share` use 0 as the "model inapplicable"
/// sentinel; margins and PEG carry their non-finite cases in [`Ratio`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationAnalysis {
    pub graham_number: f64,
    pub graham_margin_of_safety: Ratio,
    pub ncav_per_share: f64,
    pub ncav_margin_of_safety: Ratio,
    pub peg_ratio: Ratio,
    pub lynch_fair_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Strong Buy")]
    StrongBuy,
    Buy,
    Hold,
    Sell,
    Speculative,
}

impl Recommendation {
    pub fn to_label(&self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "Strong Buy",
            Recommendation::Buy => "Buy",
            Recommendation::Hold => "Hold",
            Recommendation::Sell => "Sell",
            Recommendation::Speculative => "Speculative",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorecardRow {
    pub name: String,
    pub value: String,
    pub score: u32,
    pub max_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub recommendation: Recommendation,
    pub explanation: String,
    /// Weighted 0-100 blend behind the recommendation
    pub composite_score: f64,
    pub scorecard: Vec<ScorecardRow>,
}

/// Everything the engine derives from one snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub snapshot: FinancialSnapshot,
    pub summary: AnalysisSummary,
    pub graham: GrahamAnalysis,
    pub piotroski: PiotroskiAnalysis,
    pub valuation: ValuationAnalysis,
}

/// Compact record of a past valuation kept by the history log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub ticker: String,
    pub company_name: String,
    pub valuation_date: DateTime<Utc>,
    pub recommendation: Recommendation,
    /// Graham Number at the time of valuation
    pub intrinsic_value: f64,
}

impl HistoryEntry {
    pub fn from_result(result: &ValuationResult, valuation_date: DateTime<Utc>) -> Self {
        Self {
            ticker: result.snapshot.ticker.clone(),
            company_name: result.snapshot.company_name.clone(),
            valuation_date,
            recommendation: result.summary.recommendation,
            intrinsic_value: result.valuation.graham_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "ticker": "ACME",
        "companyName": "Acme Corp",
        "currentPrice": 50.0,
        "marketCap": 5000000000,
        "eps": 5.0,
        "bookValuePerShare": 40.0,
        "currentAssets": 800000000,
        "currentLiabilities": 300000000,
        "longTermDebt": 200000000,
        "hasPositiveEarningsLast10Years": true,
        "hasUninterruptedDividendsLast20Years": false,
        "eps10YearsAgo": 3.0,
        "threeYearAverageEPS": 4.5,
        "totalLiabilities": 500000000,
        "preferredStockValue": 0,
        "operatingCashFlow": 600000000,
        "netIncome": 500000000,
        "estimatedEPSGrowthRate": 0.08,
        "sharesOutstanding": {"currentYear": 100000000, "previousYear": 101000000},
        "roa": {"currentYear": 0.09, "previousYear": 0.08},
        "longTermDebtHistory": {"currentYear": 0.2, "previousYear": 0.25},
        "currentRatioHistory": {"currentYear": 2.6, "previousYear": 2.4},
        "grossMargin": {"currentYear": 0.41, "previousYear": 0.40},
        "assetTurnover": {"currentYear": 0.8, "previousYear": 0.9},
        "qualitativeAnalysis": {"economicMoat": "Brand.", "managementQuality": "Steady."},
        "historicalPrices": [{"date": "2024-02-01", "price": 48.0}, {"date": "2024-01-01", "price": 45.0}],
        "historicalEPS": [{"year": 2023, "eps": 4.8}, {"year": 2022, "eps": 4.1}]
    }"#;

    #[test]
    fn test_deserialize_provider_payload() {
        let snapshot: FinancialSnapshot = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(snapshot.ticker, "ACME");
        assert_eq!(snapshot.eps_10_years_ago, 3.0);
        assert_eq!(snapshot.three_year_average_eps, 4.5);
        assert_eq!(snapshot.estimated_eps_growth_rate, 0.08);
        assert_eq!(snapshot.shares_outstanding.previous_year, 101_000_000.0);
        assert!(snapshot.historical_pe.is_empty());
        assert!(snapshot.roe.is_none());
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_missing_mandatory_field_is_rejected() {
        let mut value: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
        value.as_object_mut().unwrap().remove("netIncome");
        let err = serde_json::from_value::<FinancialSnapshot>(value).unwrap_err();
        assert!(err.to_string().contains("netIncome"));
    }

    #[test]
    fn test_sort_history() {
        let mut snapshot: FinancialSnapshot = serde_json::from_str(SAMPLE).unwrap();
        snapshot.sort_history();
        assert_eq!(snapshot.historical_prices[0].price, 45.0);
        assert_eq!(snapshot.historical_eps[0].year, 2022);
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        let mut snapshot: FinancialSnapshot = serde_json::from_str(SAMPLE).unwrap();
        snapshot.market_cap = f64::NAN;
        match snapshot.validate() {
            Err(FetchError::MalformedData(msg)) => assert!(msg.contains("marketCap")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_year_over_year_helpers() {
        let m = YearOverYearMetric::new(2.0, 2.0);
        assert!(!m.improved());
        assert!(!m.declined());
        assert!(YearOverYearMetric::new(2.1, 2.0).improved());
        assert!(YearOverYearMetric::new(1.9, 2.0).declined());
    }

    #[test]
    fn test_recommendation_serializes_as_label() {
        let json = serde_json::to_string(&Recommendation::StrongBuy).unwrap();
        assert_eq!(json, "\"Strong Buy\"");
        let back: Recommendation = serde_json::from_str("\"Speculative\"").unwrap();
        assert_eq!(back, Recommendation::Speculative);
    }
}
