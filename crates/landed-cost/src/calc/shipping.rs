//! Choosing a shipping option.

use super::CalcError;
use crate::model::{ShippingOption, ShippingPreference};
use std::cmp::Ordering;

fn by_price(weight: f64) -> impl Fn(&&ShippingOption, &&ShippingOption) -> Ordering {
    move |a: &&ShippingOption, b: &&ShippingOption| {
        a.price_for(weight).total_cmp(&b.price_for(weight))
    }
}

fn by_transit(a: &&ShippingOption, b: &&ShippingOption) -> Ordering {
    a.transit_days
        .max
        .cmp(&b.transit_days.max)
        .then(a.transit_days.min.cmp(&b.transit_days.min))
}

/// Picks the option matching `preference` for a consignment of `billing_weight_kg`.
///
/// Ties that remain after the secondary key go to the option listed first.
pub fn select_option<'a>(
    options: &'a [ShippingOption],
    preference: &ShippingPreference,
    billing_weight_kg: f64,
) -> Result<&'a ShippingOption, CalcError> {
    let price = by_price(billing_weight_kg);
    let chosen = match preference {
        ShippingPreference::Id(id) => {
            return options
                .iter()
                .find(|option| &option.id == id)
                .ok_or_else(|| CalcError::UnknownShippingOption(id.clone()));
        }
        ShippingPreference::Cheapest => options
            .iter()
            .min_by(|a, b| price(a, b).then_with(|| by_transit(a, b))),
        ShippingPreference::Fastest => options
            .iter()
            .min_by(|a, b| by_transit(a, b).then_with(|| price(a, b))),
    };
    chosen.ok_or(CalcError::NoShippingOptions)
}
