//! Defensive investor checklist (Graham's seven criteria).

use valuation_core::{FinancialSnapshot, GrahamAnalysis, Ratio};

use crate::checklist::{count_passed, evaluate_all, Rule};

pub const MIN_MARKET_CAP: f64 = 2_000_000_000.0;
pub const MIN_CURRENT_RATIO: f64 = 2.0;
pub const MIN_TEN_YEAR_EPS_GROWTH: f64 = 0.33;
pub const MAX_PE: f64 = 15.0;
pub const MAX_PB: f64 = 1.5;
pub const MAX_PE_TIMES_PB: f64 = 22.5;

/// Figures the seven rules are evaluated against
#[derive(Debug, Clone)]
pub struct GrahamInputs {
    pub market_cap: f64,
    pub current_ratio: f64,
    pub long_term_debt: f64,
    pub net_current_assets: f64,
    pub stable_earnings: bool,
    pub dividend_record: bool,
    /// (EPS - EPS 10y ago) / |EPS 10y ago|; undefined when the base is zero
    pub earnings_growth: Ratio,
    /// Price over 3-year average EPS
    pub pe_3y: Ratio,
    pub pb: Ratio,
}

impl GrahamInputs {
    pub fn from_snapshot(s: &FinancialSnapshot) -> Self {
        let pe_3y = if s.three_year_average_eps > 0.0 {
            Ratio::divide(s.current_price, s.three_year_average_eps)
        } else {
            Ratio::PositiveInfinite
        };
        let pb = if s.book_value_per_share > 0.0 {
            Ratio::divide(s.current_price, s.book_value_per_share)
        } else {
            Ratio::PositiveInfinite
        };

        Self {
            market_cap: s.market_cap,
            current_ratio: s.current_ratio_history.current_year,
            long_term_debt: s.long_term_debt,
            net_current_assets: s.current_assets - s.current_liabilities,
            stable_earnings: s.has_positive_earnings_last_10_years,
            dividend_record: s.has_uninterrupted_dividends_last_20_years,
            earnings_growth: Ratio::divide(s.eps - s.eps_10_years_ago, s.eps_10_years_ago.abs()),
            pe_3y,
            pb,
        }
    }

    fn moderate_valuation(&self) -> bool {
        (self.pe_3y.le(MAX_PE) && self.pb.le(MAX_PB)) || (self.pe_3y * self.pb).le(MAX_PE_TIMES_PB)
    }
}

fn rules() -> [Rule<GrahamInputs>; 7] {
    [
        Rule {
            name: "1. Adequate Size",
            description: "Market capitalization should be at least $2 billion.",
            passes: |m| m.market_cap >= MIN_MARKET_CAP,
            value: |m| format!("Market Cap: ${:.2}B", m.market_cap / 1e9),
        },
        Rule {
            name: "2. Strong Financials (Current Ratio)",
            description: "Current assets should be at least twice current liabilities.",
            passes: |m| m.current_ratio >= MIN_CURRENT_RATIO,
            value: |m| format!("Ratio: {:.2}", m.current_ratio),
        },
        Rule {
            name: "3. Strong Financials (Debt Load)",
            description: "Long-term debt should not exceed net current assets (working capital).",
            passes: |m| m.long_term_debt <= m.net_current_assets,
            value: |_| "LT Debt ≤ Net Current Assets".to_string(),
        },
        Rule {
            name: "4. Earnings Stability",
            description: "Positive earnings in each of the past 10 years.",
            passes: |m| m.stable_earnings,
            value: |m| (if m.stable_earnings { "10/10 Years" } else { "Inconsistent" }).to_string(),
        },
        Rule {
            name: "5. Dividend Record",
            description: "Uninterrupted dividend payments for at least 20 years.",
            passes: |m| m.dividend_record,
            value: |m| (if m.dividend_record { "20/20 Years" } else { "Inconsistent" }).to_string(),
        },
        Rule {
            name: "6. Earnings Growth",
            description: "Minimum 33% EPS growth over the last 10 years.",
            passes: |m| m.earnings_growth.ge(MIN_TEN_YEAR_EPS_GROWTH),
            value: |m| match m.earnings_growth.finite() {
                Some(growth) => format!("10Y Growth: {:.1}%", growth * 100.0),
                None => format!("10Y Growth: {}", m.earnings_growth),
            },
        },
        Rule {
            name: "7. Moderate Valuation",
            description: "P/E (3y avg) ≤ 15, P/B ≤ 1.5, and P/E x P/B ≤ 22.5.",
            passes: |m| m.moderate_valuation(),
            value: |m| format!("P/E: {:.2}, P/B: {:.2}", m.pe_3y, m.pb),
        },
    ]
}

/// Run the seven defensive criteria in their fixed order.
pub fn evaluate(snapshot: &FinancialSnapshot) -> GrahamAnalysis {
    let inputs = GrahamInputs::from_snapshot(snapshot);
    let rules = rules();
    let checklist = evaluate_all(&rules, &inputs);

    GrahamAnalysis {
        passed_count: count_passed(&checklist),
        total_count: rules.len() as u32,
        checklist,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::strong_snapshot;

    #[test]
    fn test_all_criteria_pass() {
        let analysis = evaluate(&strong_snapshot());
        assert_eq!(analysis.total_count, 7);
        assert_eq!(analysis.checklist.len(), 7);
        assert_eq!(analysis.passed_count, 7);
        assert!(analysis.checklist.iter().all(|c| c.pass));
        assert_eq!(analysis.checklist[0].value, "Market Cap: $5.00B");
        assert_eq!(analysis.checklist[6].value, "P/E: 10.00, P/B: 1.20");
    }

    #[test]
    fn test_passed_count_matches_items() {
        let mut s = strong_snapshot();
        s.market_cap = 1_999_999_999.0;
        s.has_uninterrupted_dividends_last_20_years = false;
        s.current_ratio_history.current_year = 1.99;

        let analysis = evaluate(&s);
        let passing = analysis.checklist.iter().filter(|c| c.pass).count() as u32;
        assert_eq!(analysis.passed_count, passing);
        assert_eq!(analysis.passed_count, 4);
        assert_eq!(analysis.checklist[4].value, "Inconsistent");
    }

    #[test]
    fn test_size_threshold_is_inclusive() {
        let mut s = strong_snapshot();
        s.market_cap = MIN_MARKET_CAP;
        assert!(evaluate(&s).checklist[0].pass);
    }

    #[test]
    fn test_current_ratio_threshold_is_inclusive() {
        let mut s = strong_snapshot();
        s.current_ratio_history.current_year = MIN_CURRENT_RATIO;
        let analysis = evaluate(&s);
        assert!(analysis.checklist[1].pass);
        assert_eq!(analysis.checklist[1].value, "Ratio: 2.00");
    }

    #[test]
    fn test_debt_equal_to_working_capital_passes() {
        let mut s = strong_snapshot();
        s.long_term_debt = s.current_assets - s.current_liabilities;
        assert!(evaluate(&s).checklist[2].pass);
    }

    #[test]
    fn test_debt_above_working_capital_fails() {
        let mut s = strong_snapshot();
        s.long_term_debt = s.current_assets - s.current_liabilities + 1.0;
        assert!(!evaluate(&s).checklist[2].pass);
    }

    #[test]
    fn test_zero_base_eps_growth_fails_closed() {
        let mut s = strong_snapshot();
        s.eps_10_years_ago = 0.0;
        let analysis = evaluate(&s);
        let item = &analysis.checklist[5];
        assert!(!item.pass);
        assert_eq!(item.value, "10Y Growth: n/a");
    }

    #[test]
    fn test_growth_from_negative_base_uses_absolute_value() {
        let mut s = strong_snapshot();
        s.eps = 2.0;
        s.eps_10_years_ago = -1.0;
        let analysis = evaluate(&s);
        let item = &analysis.checklist[5];
        assert!(item.pass);
        assert_eq!(item.value, "10Y Growth: 300.0%");
    }

    #[test]
    fn test_growth_just_below_threshold() {
        let mut s = strong_snapshot();
        s.eps_10_years_ago = 4.0;
        s.eps = 5.3; // 32.5%
        assert!(!evaluate(&s).checklist[5].pass);
    }

    #[test]
    fn test_valuation_caps_are_inclusive() {
        // 45 / 3 = 15 and 45 / 30 = 1.5
        let mut s = strong_snapshot();
        s.three_year_average_eps = 3.0;
        s.book_value_per_share = 30.0;
        let analysis = evaluate(&s);
        assert!(analysis.checklist[6].pass);
        assert_eq!(analysis.checklist[6].value, "P/E: 15.00, P/B: 1.50");
    }

    #[test]
    fn test_valuation_product_cap_is_inclusive() {
        // P/E 18 breaks its own cap; 18 x 1.25 = 22.5 exactly
        let mut s = strong_snapshot();
        s.three_year_average_eps = 2.5;
        s.book_value_per_share = 36.0;
        let analysis = evaluate(&s);
        assert!(analysis.checklist[6].pass);
        assert_eq!(analysis.checklist[6].value, "P/E: 18.00, P/B: 1.25");
    }

    #[test]
    fn test_valuation_passes_on_product_alone() {
        // P/E 18 fails the individual cap, but 18 x 1.2 = 21.6 <= 22.5
        let mut s = strong_snapshot();
        s.three_year_average_eps = 2.5;
        assert!(evaluate(&s).checklist[6].pass);
    }

    #[test]
    fn test_non_positive_averages_are_infinitely_expensive() {
        let mut s = strong_snapshot();
        s.three_year_average_eps = 0.0;
        let analysis = evaluate(&s);
        let item = &analysis.checklist[6];
        assert!(!item.pass);
        assert_eq!(item.value, "P/E: ∞, P/B: 1.20");

        let mut s = strong_snapshot();
        s.book_value_per_share = -3.0;
        assert!(!evaluate(&s).checklist[6].pass);
    }
}
