//! Aggregation of every cost component into [`QuoteTotals`].

use super::fees::{gateway_fee, handling_for, insurance_for};
use super::tax::{assess_customs, destination_tax, sales_tax};
use super::weight::quote_billing_weight;
use super::{check_amount, check_rate, round_cents, CalcError};
use crate::config::CostConfig;
use crate::model::{Discount, HandlingMode, LineItem, QuoteTotals, ShippingOption};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Everything the calculation depends on, detached from the quote it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub currency: String,
    pub origin_country: String,
    pub destination_country: String,
    pub items: Vec<LineItem>,
    /// The selected option, if any.
    pub shipping: Option<ShippingOption>,
    pub domestic_shipping: f64,
    pub handling_mode: HandlingMode,
    pub insurance_opted_in: bool,
    pub discount: Discount,
}

/// The additive components of a total, before rounding.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TotalsComponents {
    pub items_value: f64,
    pub international_shipping: f64,
    pub domestic_shipping: f64,
    pub handling: f64,
    pub insurance: f64,
    pub customs: f64,
    pub sales_tax: f64,
    pub destination_tax: f64,
    pub discount: f64,
}

impl TotalsComponents {
    pub fn rounded(self) -> Self {
        Self {
            items_value: round_cents(self.items_value),
            international_shipping: round_cents(self.international_shipping),
            domestic_shipping: round_cents(self.domestic_shipping),
            handling: round_cents(self.handling),
            insurance: round_cents(self.insurance),
            customs: round_cents(self.customs),
            sales_tax: round_cents(self.sales_tax),
            destination_tax: round_cents(self.destination_tax),
            discount: round_cents(self.discount),
        }
    }

    /// Sum of the cent-rounded components minus the cent-rounded discount.
    pub fn final_total(&self) -> f64 {
        let c = self.rounded();
        round_cents(
            c.items_value
                + c.international_shipping
                + c.domestic_shipping
                + c.handling
                + c.insurance
                + c.customs
                + c.sales_tax
                + c.destination_tax
                - c.discount,
        )
    }
}

/// Discount as an amount, capped at the subtotal.
pub fn discount_amount(discount: Discount, subtotal: f64) -> f64 {
    let amount = match discount {
        Discount::Amount(amount) => amount,
        Discount::Percentage(pct) => subtotal * pct / 100.0,
    };
    amount.min(subtotal).max(0.0)
}

fn validate(request: &CalculationRequest) -> Result<(), CalcError> {
    check_amount("domestic_shipping", request.domestic_shipping)?;
    if let HandlingMode::Manual { amount } = request.handling_mode {
        check_amount("handling", amount)?;
    }
    match request.discount {
        Discount::Amount(amount) => check_amount("discount", amount)?,
        Discount::Percentage(pct) => check_rate("discount", pct)?,
    };
    if let Some(option) = &request.shipping {
        option.validate()?;
    }
    for item in &request.items {
        check_amount("unit_price", item.unit_price)?;
        check_amount("weight_kg", item.weight_kg)?;
        item.validate().map_err(|source| CalcError::InvalidItem {
            item: item.id,
            source,
        })?;
    }
    Ok(())
}

/// Computes the full set of totals for a quote.
pub fn calculate(request: &CalculationRequest, config: &CostConfig) -> Result<QuoteTotals, CalcError> {
    validate(request)?;

    let billing_weight_kg =
        quote_billing_weight(&request.items, config.weight.volumetric_divisor)?;
    let shipping = request.shipping.as_ref();

    let items_value = round_cents(request.items.iter().map(LineItem::items_value).sum());
    let customs_items_value = round_cents(request.items.iter().map(LineItem::customs_value).sum());
    let international_shipping =
        round_cents(shipping.map_or(0.0, |option| option.price_for(billing_weight_kg)));
    let domestic_shipping = round_cents(request.domestic_shipping);
    let handling = round_cents(handling_for(request.handling_mode, items_value, shipping));
    let insurance = round_cents(insurance_for(
        request.insurance_opted_in,
        items_value,
        shipping,
    ));

    let assessment = assess_customs(
        &request.items,
        international_shipping,
        insurance,
        &request.destination_country,
        config,
    );
    let customs = round_cents(assessment.customs);
    let sales_tax = round_cents(sales_tax(
        items_value,
        &request.origin_country,
        &request.destination_country,
        config,
    ));
    let destination_tax_base = items_value + international_shipping + insurance + customs + handling;
    let destination_tax = round_cents(destination_tax(
        destination_tax_base,
        &request.destination_country,
        config,
    ));
    let discount = round_cents(discount_amount(request.discount, items_value));

    let components = TotalsComponents {
        items_value,
        international_shipping,
        domestic_shipping,
        handling,
        insurance,
        customs,
        sales_tax,
        destination_tax,
        discount,
    };
    let final_total = components.final_total();
    let gateway_fee = round_cents(gateway_fee(final_total, &config.gateway));

    debug!(
        items = request.items.len(),
        billing_weight_kg,
        items_value,
        international_shipping,
        handling,
        insurance,
        customs,
        sales_tax,
        destination_tax,
        discount,
        final_total,
        gateway_fee,
        blended = assessment.breakdown.is_blended(),
        "Totals computed"
    );

    Ok(QuoteTotals {
        currency: request.currency.clone(),
        items_value,
        customs_items_value,
        international_shipping,
        domestic_shipping,
        handling,
        insurance,
        customs,
        sales_tax,
        destination_tax,
        discount,
        final_total,
        gateway_fee,
        total_payable: round_cents(final_total + gateway_fee),
        billing_weight_kg,
        customs_breakdown: assessment.breakdown,
    })
}
