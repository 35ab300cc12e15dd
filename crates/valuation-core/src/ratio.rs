//! Sentinel-aware ratio type.
//!
//! Valuation models routinely divide by quantities that can be zero or
//! negative. Instead of letting IEEE infinities and NaN leak into
//! comparisons, every such quotient is carried as a [`Ratio`] so callers
//! have to acknowledge the non-finite cases.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Mul;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Ratio {
    Finite(f64),
    PositiveInfinite,
    NegativeInfinite,
    /// No meaningful value (0/0, or a division the model refuses to perform).
    /// Every comparison against it is false.
    Undefined,
}

impl Ratio {
    /// Map a raw float onto the tagged variants.
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            Ratio::Undefined
        } else if value == f64::INFINITY {
            Ratio::PositiveInfinite
        } else if value == f64::NEG_INFINITY {
            Ratio::NegativeInfinite
        } else {
            Ratio::Finite(value)
        }
    }

    /// `numerator / denominator`, or `Undefined` when the denominator is zero.
    pub fn divide(numerator: f64, denominator: f64) -> Self {
        if denominator == 0.0 {
            Ratio::Undefined
        } else {
            Ratio::from_f64(numerator / denominator)
        }
    }

    pub fn is_finite(&self) -> bool {
        matches!(self, Ratio::Finite(_))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Ratio::Undefined)
    }

    pub fn finite(&self) -> Option<f64> {
        match self {
            Ratio::Finite(v) => Some(*v),
            _ => None,
        }
    }

    /// IEEE view of the ratio (`NaN` for `Undefined`).
    pub fn to_f64(&self) -> f64 {
        match self {
            Ratio::Finite(v) => *v,
            Ratio::PositiveInfinite => f64::INFINITY,
            Ratio::NegativeInfinite => f64::NEG_INFINITY,
            Ratio::Undefined => f64::NAN,
        }
    }

    pub fn gt(&self, threshold: f64) -> bool {
        !self.is_undefined() && self.to_f64() > threshold
    }

    pub fn ge(&self, threshold: f64) -> bool {
        !self.is_undefined() && self.to_f64() >= threshold
    }

    pub fn lt(&self, threshold: f64) -> bool {
        !self.is_undefined() && self.to_f64() < threshold
    }

    pub fn le(&self, threshold: f64) -> bool {
        !self.is_undefined() && self.to_f64() <= threshold
    }
}

impl From<f64> for Ratio {
    fn from(value: f64) -> Self {
        Ratio::from_f64(value)
    }
}

impl Mul for Ratio {
    type Output = Ratio;

    fn mul(self, rhs: Ratio) -> Ratio {
        if self.is_undefined() || rhs.is_undefined() {
            return Ratio::Undefined;
        }
        // inf * 0 comes out as NaN and lands on Undefined
        Ratio::from_f64(self.to_f64() * rhs.to_f64())
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ratio::Finite(v) => match f.precision() {
                Some(p) => write!(f, "{:.*}", p, v),
                None => write!(f, "{}", v),
            },
            Ratio::PositiveInfinite => write!(f, "∞"),
            Ratio::NegativeInfinite => write!(f, "-∞"),
            Ratio::Undefined => write!(f, "n/a"),
        }
    }
}
