//! Handling, insurance and payment gateway fees.

use super::clamp_between;
use crate::config::GatewayConfig;
use crate::model::{HandlingCharge, HandlingMode, InsuranceTerms, ShippingOption};

/// `clamp(base_fee + items_value × percentage_of_value / 100, min_fee, max_fee)`.
pub fn handling_fee(items_value: f64, schedule: &HandlingCharge) -> f64 {
    let raw = schedule.base_fee + items_value * schedule.percentage_of_value / 100.0;
    clamp_between(raw, schedule.min_fee, schedule.max_fee)
}

/// Handling fee under the quote's mode. Auto mode without a selected option or
/// without a schedule charges nothing.
pub fn handling_for(mode: HandlingMode, items_value: f64, option: Option<&ShippingOption>) -> f64 {
    match mode {
        HandlingMode::Manual { amount } => amount,
        HandlingMode::Auto => option
            .and_then(|o| o.handling.as_ref())
            .map(|schedule| handling_fee(items_value, schedule))
            .unwrap_or(0.0),
    }
}

/// `clamp(items_value × coverage_percentage / 100, min_fee, max_coverage)`.
pub fn insurance_fee(items_value: f64, terms: &InsuranceTerms) -> f64 {
    let raw = items_value * terms.coverage_percentage / 100.0;
    clamp_between(raw, terms.min_fee, terms.max_coverage)
}

/// Insurance is charged only when the customer opted in and the option offers it.
pub fn insurance_for(opted_in: bool, items_value: f64, option: Option<&ShippingOption>) -> f64 {
    if !opted_in {
        return 0.0;
    }
    option
        .and_then(|o| o.insurance.as_ref())
        .map(|terms| insurance_fee(items_value, terms))
        .unwrap_or(0.0)
}

/// `final_total × percentage / 100 + fixed_fee`; nothing to pay, nothing charged.
pub fn gateway_fee(final_total: f64, gateway: &GatewayConfig) -> f64 {
    if final_total <= 0.0 {
        return 0.0;
    }
    final_total * gateway.percentage / 100.0 + gateway.fixed_fee
}
