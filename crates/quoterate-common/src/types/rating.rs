//! Rating result and cent arithmetic
//!
//! The three output figures are produced with deliberately different rules:
//! - `subtotal` is the accumulator rounded to cents (ties to even)
//! - `taxes` is the raw tax truncated to cents
//! - `total` is the rounded subtotal plus the *raw* tax, truncated to cents
//!
//! `total` can therefore differ from `subtotal + taxes` by a cent.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Priced quote: subtotal, taxes and total
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingResult {
    pub subtotal: f64,
    pub taxes: f64,
    pub total: f64,
}

impl RatingResult {
    /// Settle a final accumulator against a tax rate percentage
    pub fn settle(accumulator: f64, tax_rate_percent: f64) -> Self {
        let raw_tax = accumulator * normalized_percent(tax_rate_percent);
        let subtotal = round_to_cents(accumulator);

        Self {
            subtotal,
            taxes: truncate_to_cents(raw_tax),
            total: truncate_to_cents(subtotal + raw_tax),
        }
    }
}

/// Convert a percentage to a fraction (`9.75` -> `0.0975`)
pub fn normalized_percent(n: f64) -> f64 {
    n / 100.0
}

/// Round down to two decimal places (toward negative infinity)
pub fn truncate_to_cents(n: f64) -> f64 {
    (n * 100.0).floor() / 100.0
}

/// Round to two decimal places, ties to even, on the exact binary value of `n`
pub fn round_to_cents(n: f64) -> f64 {
    let Some(exact) = Decimal::from_f64_retain(n) else {
        // NaN, infinities and magnitudes beyond Decimal's range
        return n;
    };

    exact
        .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
        .to_f64()
        .unwrap_or(n)
}
