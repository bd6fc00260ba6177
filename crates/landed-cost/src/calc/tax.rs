//! Customs, sales tax and destination VAT/GST.
//!
//! Customs is assessed on the CIF value: the customs value of the goods plus
//! international freight plus insurance. Freight and insurance are shared among items
//! in proportion to their customs value (evenly when every item is valued at zero).
//!
//! When every item uses the same tax method and valuation method the breakdown is
//! blended into one customs-value-weighted rate; otherwise it is itemized. Both give
//! the same customs amount.

use super::round_cents;
use crate::config::CostConfig;
use crate::model::{CustomsBreakdown, ItemCustoms, ItemRate, LineItem, RateSource, TaxMethod};
use std::collections::HashSet;

/// Customs total with the breakdown that produced it. `customs` is unrounded.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomsAssessment {
    pub customs: f64,
    pub breakdown: CustomsBreakdown,
}

/// Customs rate (percent) for one item and where it came from.
pub fn item_rate(item: &LineItem, destination: &str, config: &CostConfig) -> (f64, RateSource) {
    let specific = match item.tax_method {
        TaxMethod::Hsn => item
            .hsn_code
            .as_deref()
            .and_then(|code| config.hsn_rate(code))
            .map(|(prefix, rate)| (rate, RateSource::Hsn(prefix.to_string()))),
        TaxMethod::Manual => item.manual_customs_rate.map(|rate| (rate, RateSource::Manual)),
        TaxMethod::Ai => item.suggested_customs_rate.map(|rate| (rate, RateSource::Ai)),
        TaxMethod::Country => {
            return (config.country_customs_rate(destination), RateSource::Country);
        }
    };
    specific.unwrap_or_else(|| {
        (
            config.country_customs_rate(destination),
            RateSource::CountryFallback,
        )
    })
}

/// True when the items mix more than one (tax method, valuation method) pair.
pub fn needs_itemized_breakdown(items: &[LineItem]) -> bool {
    let pairs: HashSet<_> = items
        .iter()
        .map(|item| (item.tax_method, item.valuation_method))
        .collect();
    pairs.len() > 1
}

/// Share of freight and insurance carried by each item; sums to 1 for a non-empty list.
fn allocation_shares(items: &[LineItem]) -> Vec<f64> {
    let total: f64 = items.iter().map(LineItem::customs_value).sum();
    if total > 0.0 {
        items
            .iter()
            .map(|item| item.customs_value() / total)
            .collect()
    } else {
        let even = 1.0 / items.len().max(1) as f64;
        vec![even; items.len()]
    }
}

/// Customs on `items` shipped with `freight` and `insurance` into `destination`.
pub fn assess_customs(
    items: &[LineItem],
    freight: f64,
    insurance: f64,
    destination: &str,
    config: &CostConfig,
) -> CustomsAssessment {
    let shares = allocation_shares(items);
    let rated: Vec<(&LineItem, f64, f64, RateSource)> = items
        .iter()
        .zip(shares)
        .map(|(item, share)| {
            let (rate, source) = item_rate(item, destination, config);
            (item, share, rate, source)
        })
        .collect();

    if needs_itemized_breakdown(items) {
        let mut customs = 0.0;
        let lines = rated
            .into_iter()
            .map(|(item, share, rate, source)| {
                let customs_value = item.customs_value();
                let freight_share = freight * share;
                let insurance_share = insurance * share;
                let cif_value = customs_value + freight_share + insurance_share;
                let item_customs = cif_value * rate / 100.0;
                customs += item_customs;
                ItemCustoms {
                    item_id: item.id,
                    customs_value: round_cents(customs_value),
                    freight_share: round_cents(freight_share),
                    insurance_share: round_cents(insurance_share),
                    cif_value: round_cents(cif_value),
                    rate,
                    source,
                    customs: round_cents(item_customs),
                }
            })
            .collect();
        return CustomsAssessment {
            customs,
            breakdown: CustomsBreakdown::PerItem { items: lines },
        };
    }

    let blended_rate: f64 = rated.iter().map(|(_, share, rate, _)| share * rate).sum();
    let customs_value: f64 = items.iter().map(LineItem::customs_value).sum();
    let cif_value = if items.is_empty() {
        0.0
    } else {
        customs_value + freight + insurance
    };
    let customs = cif_value * blended_rate / 100.0;
    CustomsAssessment {
        customs,
        breakdown: CustomsBreakdown::Blended {
            rate: blended_rate,
            cif_value: round_cents(cif_value),
            customs: round_cents(customs),
            items: rated
                .into_iter()
                .map(|(item, _, rate, source)| ItemRate {
                    item_id: item.id,
                    rate,
                    source,
                })
                .collect(),
        },
    }
}

/// Sales tax on the items value for the route; nothing when the route is not taxed.
pub fn sales_tax(items_value: f64, origin: &str, destination: &str, config: &CostConfig) -> f64 {
    items_value * config.sales_tax_rate(origin, destination) / 100.0
}

/// VAT/GST on `base` (items + international shipping + insurance + customs + handling).
pub fn destination_tax(base: f64, destination: &str, config: &CostConfig) -> f64 {
    base * config.destination_tax_rate(destination) / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LineItemId, NewLineItem, ValuationMethod};

    fn config() -> CostConfig {
        CostConfig::embedded().unwrap()
    }

    fn item(id: u32, new: NewLineItem) -> LineItem {
        new.into_item(LineItemId(id)).unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn rate_sources_by_method() {
        let config = config();
        let laptop = item(1, NewLineItem::new("Laptop", 999.0, 1, 2.0).with_hsn("8471.30"));
        assert_eq!(
            item_rate(&laptop, "IN", &config),
            (10.0, RateSource::Hsn("8471".into()))
        );

        let unknown = item(2, NewLineItem::new("Gadget", 10.0, 1, 0.1).with_hsn("9999"));
        assert_eq!(
            item_rate(&unknown, "GB", &config),
            (4.0, RateSource::CountryFallback)
        );

        let manual = item(
            3,
            NewLineItem {
                tax_method: TaxMethod::Manual,
                manual_customs_rate: Some(12.5),
                ..NewLineItem::new("Watch", 250.0, 1, 0.2)
            },
        );
        assert_eq!(item_rate(&manual, "IN", &config), (12.5, RateSource::Manual));

        let ai_without_rate = item(
            4,
            NewLineItem {
                tax_method: TaxMethod::Ai,
                ..NewLineItem::new("Lamp", 40.0, 1, 1.0)
            },
        );
        assert_eq!(
            item_rate(&ai_without_rate, "ZZ", &config),
            (config.customs.default_rate, RateSource::CountryFallback)
        );

        let country = item(5, NewLineItem::new("Mug", 8.0, 2, 0.3));
        assert_eq!(item_rate(&country, "AE", &config), (5.0, RateSource::Country));
    }

    #[test]
    fn uniform_items_blend_into_one_rate() {
        let config = config();
        let items = vec![
            item(1, NewLineItem::new("Laptop", 1000.0, 1, 2.0).with_hsn("8471")),
            item(2, NewLineItem::new("Phone", 500.0, 2, 0.4).with_hsn("8517")),
        ];
        let assessment = assess_customs(&items, 100.0, 20.0, "IN", &config);

        // Weighted: (1000 × 10 + 1000 × 20) / 2000 = 15%
        match &assessment.breakdown {
            CustomsBreakdown::Blended {
                rate,
                cif_value,
                items,
                ..
            } => {
                assert!(close(*rate, 15.0));
                assert_eq!(*cif_value, 2120.0);
                assert_eq!(items.len(), 2);
            }
            other => panic!("expected blended breakdown, got {other:?}"),
        }
        assert!(close(assessment.customs, 318.0));
    }

    #[test]
    fn mixed_methods_itemize_with_the_same_total() {
        let config = config();
        let items = vec![
            item(1, NewLineItem::new("Laptop", 1000.0, 1, 2.0).with_hsn("8471")),
            item(
                2,
                NewLineItem {
                    valuation_method: ValuationMethod::Minimum,
                    minimum_valuation: Some(500.0),
                    ..NewLineItem::new("Phone", 300.0, 2, 0.4).with_hsn("8517")
                },
            ),
        ];
        assert!(needs_itemized_breakdown(&items));

        let assessment = assess_customs(&items, 100.0, 20.0, "IN", &config);
        let CustomsBreakdown::PerItem { items: lines } = &assessment.breakdown else {
            panic!("expected itemized breakdown");
        };
        assert_eq!(lines.len(), 2);
        // Phone is declared at 1000, so freight and insurance split evenly.
        assert_eq!(lines[1].customs_value, 1000.0);
        assert_eq!(lines[1].freight_share, 50.0);
        assert_eq!(lines[1].insurance_share, 10.0);
        assert_eq!(lines[1].cif_value, 1060.0);
        assert_eq!(lines[1].customs, 212.0);

        let blended_equivalent = 2120.0 * 15.0 / 100.0;
        assert!(close(assessment.customs, blended_equivalent));
    }

    #[test]
    fn zero_valued_items_share_freight_evenly() {
        let config = config();
        let items = vec![
            item(1, NewLineItem::new("Sample A", 0.0, 1, 0.1)),
            item(2, NewLineItem::new("Sample B", 0.0, 1, 0.1)),
        ];
        let assessment = assess_customs(&items, 50.0, 0.0, "IN", &config);
        assert!(close(assessment.customs, 5.0));
    }

    #[test]
    fn no_items_no_customs() {
        let assessment = assess_customs(&[], 89.5, 0.0, "IN", &config());
        assert_eq!(assessment.customs, 0.0);
    }

    #[test]
    fn route_and_destination_taxes() {
        let config = config();
        assert!(close(sales_tax(1000.0, "US", "IN", &config), 88.8));
        assert_eq!(sales_tax(1000.0, "GB", "IN", &config), 0.0);
        assert!(close(destination_tax(1000.0, "IN", &config), 180.0));
        assert_eq!(destination_tax(1000.0, "ZZ", &config), 0.0);
    }
}
