//! Plain-text rendering of valuation results and history.

use std::fmt;

use valuation_core::{ChecklistItem, HistoryEntry, Ratio, ValuationResult};

const NOT_APPLICABLE: &str = "N/A";

fn currency(value: f64) -> String {
    format!("${:.2}", value)
}

/// Large dollar amounts in B/M
fn compact_currency(value: f64) -> String {
    if value.abs() >= 1e9 {
        format!("${:.2}B", value / 1e9)
    } else if value.abs() >= 1e6 {
        format!("${:.2}M", value / 1e6)
    } else {
        currency(value)
    }
}

/// Positive per-share value, or N/A when the model does not apply
fn per_share(value: f64) -> String {
    if value > 0.0 {
        currency(value)
    } else {
        NOT_APPLICABLE.to_string()
    }
}

fn percent(ratio: Ratio) -> String {
    match ratio.finite() {
        Some(v) => format!("{:.1}%", v * 100.0),
        None => NOT_APPLICABLE.to_string(),
    }
}

fn fixed(ratio: Ratio) -> String {
    match ratio.finite() {
        Some(v) => format!("{:.2}", v),
        None => NOT_APPLICABLE.to_string(),
    }
}

fn write_checklist(f: &mut fmt::Formatter<'_>, items: &[ChecklistItem]) -> fmt::Result {
    for item in items {
        let mark = if item.pass { "PASS" } else { "FAIL" };
        writeln!(f, "  [{}] {:<36} {}", mark, item.name, item.value)?;
        writeln!(f, "         {}", item.description)?;
    }
    Ok(())
}

/// Full text report for one valuation
pub struct ResultReport<'a>(pub &'a ValuationResult);

impl fmt::Display for ResultReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        let s = &result.snapshot;
        let summary = &result.summary;
        let v = &result.valuation;

        writeln!(f, "{} - {}", s.ticker, s.company_name)?;
        writeln!(
            f,
            "Price {}  |  Market cap {}",
            currency(s.current_price),
            compact_currency(s.market_cap)
        )?;
        writeln!(f)?;

        writeln!(
            f,
            "Recommendation: {} ({:.0}/100)",
            summary.recommendation,
            summary.composite_score.round()
        )?;
        writeln!(f, "{}", summary.explanation)?;
        writeln!(f)?;

        writeln!(f, "Scorecard")?;
        for row in &summary.scorecard {
            writeln!(f, "  {:<20} {}", row.name, row.value)?;
        }
        writeln!(f)?;

        writeln!(
            f,
            "Graham defensive checklist ({}/{})",
            result.graham.passed_count, result.graham.total_count
        )?;
        write_checklist(f, &result.graham.checklist)?;
        writeln!(f)?;

        writeln!(f, "Piotroski F-Score ({}/9)", result.piotroski.score)?;
        write_checklist(f, &result.piotroski.checks)?;
        writeln!(f)?;

        let price_to_ncav = if v.ncav_per_share > 0.0 {
            format!("{:.2}x", s.current_price / v.ncav_per_share)
        } else {
            NOT_APPLICABLE.to_string()
        };

        writeln!(f, "Valuation models")?;
        writeln!(
            f,
            "  {:<20} {:<12} margin of safety {}",
            "Graham Number",
            per_share(v.graham_number),
            percent(v.graham_margin_of_safety)
        )?;
        writeln!(
            f,
            "  {:<20} {:<12} price/NCAV {} (target < 0.67x)",
            "NCAV per share",
            per_share(v.ncav_per_share),
            price_to_ncav
        )?;
        writeln!(f, "  {:<20} {:<12} (target < 1.0)", "PEG ratio", fixed(v.peg_ratio))?;
        writeln!(f, "  {:<20} {}", "Lynch fair value", currency(v.lynch_fair_value))?;

        let q = &s.qualitative_analysis;
        writeln!(f)?;
        writeln!(f, "Qualitative")?;
        writeln!(f, "  Economic moat: {}", q.economic_moat)?;
        writeln!(f, "  Management:    {}", q.management_quality)?;

        let sources: Vec<_> = s.grounding_chunks.iter().filter_map(|c| c.web.as_ref()).collect();
        if !sources.is_empty() {
            writeln!(f)?;
            writeln!(f, "Sources")?;
            for web in sources {
                writeln!(f, "  - {} <{}>", web.title, web.uri)?;
            }
        }

        Ok(())
    }
}

/// Tabular listing of past valuations
pub struct HistoryReport<'a>(pub &'a [HistoryEntry]);

impl fmt::Display for HistoryReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No history yet.");
        }

        writeln!(
            f,
            "{:<17} {:<8} {:<28} {:<12} {}",
            "Date", "Ticker", "Company", "Call", "Intrinsic value"
        )?;
        for entry in self.0 {
            writeln!(
                f,
                "{:<17} {:<8} {:<28} {:<12} {}",
                entry.valuation_date.format("%Y-%m-%d %H:%M").to_string(),
                entry.ticker,
                truncate(&entry.company_name, 28),
                entry.recommendation.to_label(),
                per_share(entry.intrinsic_value)
            )?;
        }
        Ok(())
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}
