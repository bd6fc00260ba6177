//! Derived cost figures of a quote. Produced by the calculation engine, never edited.

use super::line_item::LineItemId;
use serde::{Deserialize, Serialize};

/// Where an item's customs rate came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "source", content = "detail")]
pub enum RateSource {
    /// Configured rate of this HSN prefix.
    Hsn(String),
    Manual,
    Country,
    Ai,
    /// The item's own method had no rate; the destination default was used.
    CountryFallback,
}

/// Rate assigned to one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRate {
    pub item_id: LineItemId,
    /// Percent.
    pub rate: f64,
    pub source: RateSource,
}

/// Customs assessed on one item, with its share of freight and insurance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemCustoms {
    pub item_id: LineItemId,
    pub customs_value: f64,
    pub freight_share: f64,
    pub insurance_share: f64,
    pub cif_value: f64,
    pub rate: f64,
    pub source: RateSource,
    pub customs: f64,
}

/// Customs detail at the granularity the quote calls for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum CustomsBreakdown {
    /// One customs-value-weighted rate over the whole CIF value.
    Blended {
        rate: f64,
        cif_value: f64,
        customs: f64,
        items: Vec<ItemRate>,
    },
    PerItem { items: Vec<ItemCustoms> },
}

impl CustomsBreakdown {
    pub fn is_blended(&self) -> bool {
        matches!(self, CustomsBreakdown::Blended { .. })
    }

    fn scaled(&self, rate: f64, round: fn(f64) -> f64) -> Self {
        match self {
            CustomsBreakdown::Blended {
                rate: customs_rate,
                cif_value,
                customs,
                items,
            } => CustomsBreakdown::Blended {
                rate: *customs_rate,
                cif_value: round(cif_value * rate),
                customs: round(customs * rate),
                items: items.clone(),
            },
            CustomsBreakdown::PerItem { items } => CustomsBreakdown::PerItem {
                items: items
                    .iter()
                    .map(|item| ItemCustoms {
                        customs_value: round(item.customs_value * rate),
                        freight_share: round(item.freight_share * rate),
                        insurance_share: round(item.insurance_share * rate),
                        cif_value: round(item.cif_value * rate),
                        customs: round(item.customs * rate),
                        ..item.clone()
                    })
                    .collect(),
            },
        }
    }
}

/// Every monetary figure is rounded to cents; `final_total` is exactly the sum of the
/// rounded components minus the discount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteTotals {
    pub currency: String,
    pub items_value: f64,
    pub customs_items_value: f64,
    pub international_shipping: f64,
    pub domestic_shipping: f64,
    pub handling: f64,
    pub insurance: f64,
    pub customs: f64,
    pub sales_tax: f64,
    pub destination_tax: f64,
    pub discount: f64,
    pub final_total: f64,
    pub gateway_fee: f64,
    /// `final_total + gateway_fee`.
    pub total_payable: f64,
    pub billing_weight_kg: f64,
    pub customs_breakdown: CustomsBreakdown,
}

impl QuoteTotals {
    /// The same totals expressed in `currency`, every amount multiplied by `rate` and
    /// re-rounded. `final_total` is rebuilt from the converted components so that it
    /// still reconstructs exactly.
    pub fn converted(&self, currency: impl Into<String>, rate: f64) -> Self {
        use crate::calc::round_cents;

        let scale = |amount: f64| round_cents(amount * rate);
        let mut converted = Self {
            currency: currency.into(),
            items_value: scale(self.items_value),
            customs_items_value: scale(self.customs_items_value),
            international_shipping: scale(self.international_shipping),
            domestic_shipping: scale(self.domestic_shipping),
            handling: scale(self.handling),
            insurance: scale(self.insurance),
            customs: scale(self.customs),
            sales_tax: scale(self.sales_tax),
            destination_tax: scale(self.destination_tax),
            discount: scale(self.discount),
            final_total: 0.0,
            gateway_fee: scale(self.gateway_fee),
            total_payable: 0.0,
            billing_weight_kg: self.billing_weight_kg,
            customs_breakdown: self.customs_breakdown.scaled(rate, round_cents),
        };
        converted.final_total = converted.component_sum();
        converted.total_payable = round_cents(converted.final_total + converted.gateway_fee);
        converted
    }

    /// Sum of the displayed components minus the displayed discount.
    pub fn component_sum(&self) -> f64 {
        crate::calc::round_cents(
            self.items_value
                + self.international_shipping
                + self.domestic_shipping
                + self.handling
                + self.insurance
                + self.customs
                + self.sales_tax
                + self.destination_tax
                - self.discount,
        )
    }
}
