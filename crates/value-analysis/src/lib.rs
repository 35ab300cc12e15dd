//! Value investing analysis engine.
//!
//! Turns a [`FinancialSnapshot`] into a [`ValuationResult`]: Graham's
//! defensive checklist, a Piotroski-style quality score, three intrinsic
//! value models and a weighted recommendation. Pure and synchronous; the
//! same snapshot always yields the same result.

use valuation_core::{FinancialSnapshot, ValuationResult, ValueAnalyzer};

mod checklist;
pub mod graham;
pub mod piotroski;
pub mod summary;
pub mod valuation;

#[cfg(test)]
pub(crate) mod fixtures;

pub struct ValueAnalysisEngine;

impl ValueAnalysisEngine {
    pub fn new() -> Self {
        Self
    }

    fn analyze_sync(&self, snapshot: FinancialSnapshot) -> ValuationResult {
        let graham = graham::evaluate(&snapshot);
        let piotroski = piotroski::evaluate(&snapshot);
        let valuation = valuation::estimate(&snapshot);
        let summary = summary::synthesize(snapshot.eps, &graham, &piotroski, &valuation);

        tracing::debug!(
            "Analyzed {}: graham {}/{}, f-score {}/{}, composite {:.1} -> {}",
            snapshot.ticker,
            graham.passed_count,
            graham.total_count,
            piotroski.score,
            piotroski::MAX_SCORE,
            summary.composite_score,
            summary.recommendation
        );

        ValuationResult {
            snapshot,
            summary,
            graham,
            piotroski,
            valuation,
        }
    }
}

impl ValueAnalyzer for ValueAnalysisEngine {
    fn analyze(&self, snapshot: FinancialSnapshot) -> ValuationResult {
        self.analyze_sync(snapshot)
    }
}

impl Default for ValueAnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}
