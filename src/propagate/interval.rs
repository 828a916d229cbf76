//! Closed-interval arithmetic for range propagation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An inclusive numeric interval `[lo, hi]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lo: f64,
    pub hi: f64,
}

impl Interval {
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// The degenerate interval holding a single value.
    pub fn point(value: f64) -> Self {
        Self { lo: value, hi: value }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lo <= value && value <= self.hi
    }

    /// `[lo, hi] + delta`. Subtraction of a constant is a negative shift.
    pub fn shift(&self, delta: f64) -> Self {
        Self { lo: self.lo + delta, hi: self.hi + delta }
    }

    /// `pivot - [lo, hi]`: subtraction with the interval as the second
    /// operand reflects the bounds around the pivot.
    pub fn reflect(&self, pivot: f64) -> Self {
        Self { lo: pivot - self.hi, hi: pivot - self.lo }
    }

    /// `[lo, hi] * factor`. A negative factor flips the bounds.
    pub fn scale(&self, factor: f64) -> Self {
        let (a, b) = (self.lo * factor, self.hi * factor);
        if factor < 0.0 {
            Self { lo: b, hi: a }
        } else {
            Self { lo: a, hi: b }
        }
    }

    /// `[lo, hi] / divisor`. `None` for a zero divisor; a negative divisor
    /// flips the bounds.
    pub fn scale_inverse(&self, divisor: f64) -> Option<Self> {
        (divisor != 0.0).then(|| self.scale(1.0 / divisor))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}
