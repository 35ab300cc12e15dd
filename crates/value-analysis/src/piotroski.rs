//! Piotroski-style F-score: nine binary quality signals, one point each.

use valuation_core::{FinancialSnapshot, PiotroskiAnalysis};

use crate::checklist::{count_passed, evaluate_all, Rule};

pub const MAX_SCORE: u32 = 9;

fn rules() -> [Rule<FinancialSnapshot>; 9] {
    [
        // Profitability
        Rule {
            name: "1. Positive ROA",
            description: "Return on Assets is positive.",
            passes: |s| s.roa.current_year > 0.0,
            value: |s| format!("ROA: {:.2}%", s.roa.current_year * 100.0),
        },
        Rule {
            name: "2. Positive Operating Cash Flow",
            description: "Operating Cash Flow is positive.",
            passes: |s| s.operating_cash_flow > 0.0,
            value: |s| format!("OCF: ${:.2}M", s.operating_cash_flow / 1e6),
        },
        Rule {
            name: "3. Increasing ROA",
            description: "ROA is higher than the previous year.",
            passes: |s| s.roa.improved(),
            value: |_| "ROA improved".to_string(),
        },
        Rule {
            name: "4. Quality of Earnings",
            description: "Operating Cash Flow exceeds Net Income.",
            passes: |s| s.operating_cash_flow > s.net_income,
            value: |_| "OCF > Net Income".to_string(),
        },
        // Leverage and liquidity
        Rule {
            name: "5. Decreasing Debt Ratio",
            description: "Long-term debt ratio is lower than previous year.",
            passes: |s| s.long_term_debt_history.declined(),
            value: |_| "Debt ratio lower".to_string(),
        },
        Rule {
            name: "6. Increasing Current Ratio",
            description: "Current Ratio is higher than previous year.",
            passes: |s| s.current_ratio_history.improved(),
            value: |_| "Current Ratio improved".to_string(),
        },
        Rule {
            name: "7. No New Share Issuance",
            description: "No significant new shares were issued.",
            // flat share count still counts as no dilution
            passes: |s| s.shares_outstanding.current_year <= s.shares_outstanding.previous_year,
            value: |_| "No dilution".to_string(),
        },
        // Operating efficiency
        Rule {
            name: "8. Increasing Gross Margin",
            description: "Gross Margin is higher than previous year.",
            passes: |s| s.gross_margin.improved(),
            value: |_| "Margin expanded".to_string(),
        },
        Rule {
            name: "9. Increasing Asset Turnover",
            description: "Asset Turnover ratio is higher than previous year.",
            passes: |s| s.asset_turnover.improved(),
            value: |_| "Efficiency improved".to_string(),
        },
    ]
}

pub fn evaluate(snapshot: &FinancialSnapshot) -> PiotroskiAnalysis {
    let checks = evaluate_all(&rules(), snapshot);
    PiotroskiAnalysis {
        score: count_passed(&checks),
        checks,
    }
}
