//! Weighted composite score, categorical recommendation and scorecard.

use valuation_core::{
    AnalysisSummary, GrahamAnalysis, PiotroskiAnalysis, Ratio, Recommendation, ScorecardRow,
    ValuationAnalysis,
};

use crate::piotroski::MAX_SCORE;

const CHECKLIST_WEIGHT: f64 = 40.0;
const QUALITY_WEIGHT: f64 = 40.0;
const MARGIN_BONUS: f64 = 10.0;
const PEG_BONUS: f64 = 10.0;
const MARGIN_BONUS_THRESHOLD: f64 = 0.25;
const PEG_BONUS_THRESHOLD: f64 = 1.0;

/// 0-100 blend of the checklist, the quality score and two valuation bonuses.
pub fn composite_score(
    passed_count: u32,
    total_count: u32,
    quality_score: u32,
    graham_margin_of_safety: Ratio,
    peg_ratio: Ratio,
) -> f64 {
    let mut score = 0.0;
    if total_count > 0 {
        score += passed_count as f64 / total_count as f64 * CHECKLIST_WEIGHT;
    }
    score += quality_score as f64 / MAX_SCORE as f64 * QUALITY_WEIGHT;
    if graham_margin_of_safety.gt(MARGIN_BONUS_THRESHOLD) {
        score += MARGIN_BONUS;
    }
    if peg_ratio.is_finite() && peg_ratio.lt(PEG_BONUS_THRESHOLD) {
        score += PEG_BONUS;
    }
    score
}

/// First matching rule wins; losses override any score.
pub fn recommend(eps: f64, score: f64) -> Recommendation {
    let chain = [
        (eps <= 0.0, Recommendation::Speculative),
        (score >= 80.0, Recommendation::StrongBuy),
        (score >= 60.0, Recommendation::Buy),
        (score >= 40.0, Recommendation::Hold),
    ];
    chain
        .into_iter()
        .find(|(matched, _)| *matched)
        .map(|(_, recommendation)| recommendation)
        .unwrap_or(Recommendation::Sell)
}

pub fn explain(recommendation: Recommendation, score: f64) -> String {
    // round half away from zero so 34.5 reads as 35
    let shown = score.round() as i64;
    match recommendation {
        Recommendation::Speculative => "The company has negative earnings, making it unsuitable for \
             most value investing criteria. Investment is speculative."
            .to_string(),
        Recommendation::StrongBuy => format!(
            "An outstanding candidate, scoring {}/100. It excels in financial strength, meets \
             Graham's defensive criteria, and appears significantly undervalued.",
            shown
        ),
        Recommendation::Buy => format!(
            "A strong candidate, scoring {}/100. The company shows solid fundamentals and appears \
             attractively valued.",
            shown
        ),
        Recommendation::Hold => format!(
            "A mixed picture, scoring {}/100. The company has some strengths but also weaknesses \
             or a less compelling valuation. A neutral stance is advised.",
            shown
        ),
        Recommendation::Sell => format!(
            "A weak candidate, scoring {}/100. The company fails to meet key criteria for financial \
             health, stability, or value. Avoid or Sell.",
            shown
        ),
    }
}

pub fn scorecard(
    graham: &GrahamAnalysis,
    piotroski: &PiotroskiAnalysis,
    valuation: &ValuationAnalysis,
) -> Vec<ScorecardRow> {
    let undervalued = valuation.graham_margin_of_safety.gt(0.0);
    vec![
        ScorecardRow {
            name: "Graham Score".to_string(),
            value: format!("{}/{}", graham.passed_count, graham.total_count),
            score: graham.passed_count,
            max_score: graham.total_count,
        },
        ScorecardRow {
            name: "Piotroski F-Score".to_string(),
            value: format!("{}/{}", piotroski.score, MAX_SCORE),
            score: piotroski.score,
            max_score: MAX_SCORE,
        },
        ScorecardRow {
            name: "Valuation".to_string(),
            value: (if undervalued { "Undervalued" } else { "Overvalued" }).to_string(),
            score: u32::from(undervalued),
            max_score: 1,
        },
    ]
}

pub fn synthesize(
    eps: f64,
    graham: &GrahamAnalysis,
    piotroski: &PiotroskiAnalysis,
    valuation: &ValuationAnalysis,
) -> AnalysisSummary {
    let score = composite_score(
        graham.passed_count,
        graham.total_count,
        piotroski.score,
        valuation.graham_margin_of_safety,
        valuation.peg_ratio,
    );
    let recommendation = recommend(eps, score);

    AnalysisSummary {
        recommendation,
        explanation: explain(recommendation, score),
        composite_score: score,
        scorecard: scorecard(graham, piotroski, valuation),
    }
}
