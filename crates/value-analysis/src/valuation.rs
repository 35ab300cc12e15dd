//! Intrinsic value models: Graham Number, net current asset value and PEG/Lynch.
//!
//! None of the models can fail. A model that does not apply to the company
//! reports 0 (for per-share values) or a non-finite [`Ratio`].

use valuation_core::{FinancialSnapshot, Ratio, ValuationAnalysis};

/// Graham's P/E x P/B ceiling used inside the Graham Number
pub const GRAHAM_MULTIPLIER: f64 = 22.5;

/// sqrt(22.5 x EPS x BVPS), or 0 when either factor is not strictly positive
pub fn graham_number(eps: f64, book_value_per_share: f64) -> f64 {
    if eps > 0.0 && book_value_per_share > 0.0 {
        (GRAHAM_MULTIPLIER * eps * book_value_per_share).sqrt()
    } else {
        0.0
    }
}

/// Discount of `price` below `intrinsic`; `-∞` when there is no positive estimate.
pub fn margin_of_safety(intrinsic: f64, price: f64) -> Ratio {
    if intrinsic > 0.0 {
        Ratio::divide(intrinsic - price, intrinsic)
    } else {
        Ratio::NegativeInfinite
    }
}

/// (current assets - total liabilities - preferred stock) / shares outstanding
pub fn ncav_per_share(snapshot: &FinancialSnapshot) -> f64 {
    let shares = snapshot.shares_outstanding.current_year;
    if shares > 0.0 {
        let ncav =
            snapshot.current_assets - snapshot.total_liabilities - snapshot.preferred_stock_value;
        ncav / shares
    } else {
        0.0
    }
}

/// Trailing P/E; infinite for loss-making companies
pub fn trailing_pe(price: f64, eps: f64) -> Ratio {
    if eps > 0.0 {
        Ratio::divide(price, eps)
    } else {
        Ratio::PositiveInfinite
    }
}

/// P/E over growth expressed in percent
pub fn peg_ratio(trailing_pe: Ratio, growth_rate: f64) -> Ratio {
    match trailing_pe.finite() {
        Some(pe) if growth_rate > 0.0 => Ratio::divide(pe, growth_rate * 100.0),
        _ => Ratio::PositiveInfinite,
    }
}

/// Peter Lynch's fair value: EPS x growth (in percent)
pub fn lynch_fair_value(eps: f64, growth_rate: f64) -> f64 {
    eps * (growth_rate * 100.0)
}

pub fn estimate(snapshot: &FinancialSnapshot) -> ValuationAnalysis {
    let price = snapshot.current_price;
    let growth = snapshot.estimated_eps_growth_rate;

    let graham = graham_number(snapshot.eps, snapshot.book_value_per_share);
    let ncav = ncav_per_share(snapshot);
    let pe = trailing_pe(price, snapshot.eps);

    ValuationAnalysis {
        graham_number: graham,
        graham_margin_of_safety: margin_of_safety(graham, price),
        ncav_per_share: ncav,
        ncav_margin_of_safety: margin_of_safety(ncav, price),
        peg_ratio: peg_ratio(pe, growth),
        lynch_fair_value: lynch_fair_value(snapshot.eps, growth),
    }
}
