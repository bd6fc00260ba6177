//! # Landed-Cost Calculation
//!
//! Pure, synchronous arithmetic: no I/O, no shared state. Every function takes the
//! numbers and configuration it needs and returns a value or a [`CalcError`].
//!
//! - [`weight`] - volumetric and billing weight
//! - [`fees`] - handling, insurance and payment gateway fees
//! - [`tax`] - customs on the CIF value, sales tax, destination VAT/GST
//! - [`shipping`] - choosing among offered shipping options
//! - [`totals`] - aggregation into [`QuoteTotals`](crate::model::QuoteTotals)
//!
//! Amounts are rounded to cents component by component before they are summed, so
//! the displayed components always add up to the displayed total.

pub mod fees;
pub mod shipping;
pub mod tax;
pub mod totals;
pub mod weight;

pub use totals::{calculate, discount_amount, CalculationRequest, TotalsComponents};

use crate::input::InputError;
use crate::model::LineItemId;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CalcError {
    #[error("volumetric divisor must be greater than zero, got {0}")]
    InvalidDivisor(f64),

    #[error("{field} must be a finite amount of zero or more, got {value}")]
    InvalidAmount { field: &'static str, value: f64 },

    #[error("{field} must be between 0 and 100, got {value}")]
    InvalidRate { field: &'static str, value: f64 },

    #[error("{field}: minimum {min} exceeds maximum {max}")]
    InvertedBounds {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("transit days: minimum {min} exceeds maximum {max}")]
    InvertedTransit { min: u32, max: u32 },

    #[error("unknown shipping option '{0}'")]
    UnknownShippingOption(String),

    #[error("no shipping options offered")]
    NoShippingOptions,

    #[error("exchange rate must be greater than zero, got {0}")]
    InvalidExchangeRate(f64),

    #[error("line item {item}: {source}")]
    InvalidItem {
        item: LineItemId,
        #[source]
        source: InputError,
    },
}

/// Rounds half away from zero to two decimals.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

pub fn check_amount(field: &'static str, value: f64) -> Result<f64, CalcError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(CalcError::InvalidAmount { field, value })
    }
}

pub fn check_rate(field: &'static str, value: f64) -> Result<f64, CalcError> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(CalcError::InvalidRate { field, value })
    }
}

pub fn check_bounds(field: &'static str, min: f64, max: f64) -> Result<(), CalcError> {
    if min <= max {
        Ok(())
    } else {
        Err(CalcError::InvertedBounds { field, min, max })
    }
}

/// `value` limited to `[min, max]`. Never panics; bounds are validated upstream.
pub(crate) fn clamp_between(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_cents() {
        assert_eq!(round_cents(16.9898), 16.99);
        assert_eq!(round_cents(10.125), 10.13);
        assert_eq!(round_cents(0.004), 0.0);
        assert_eq!(round_cents(-10.125), -10.13);
    }
}
