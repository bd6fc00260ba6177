//! # Operator Input
//!
//! Raw text typed into the quote desk is parsed here, once, and either becomes a
//! validated number or an [`InputError`] naming the offending field. Nothing past this
//! module ever sees an unparsed string or a silently defaulted zero.
//!
//! [`LineItemForm`] is the row-level entry point: one struct of raw strings in, one
//! [`NewLineItem`] out.

use crate::model::{DimensionUnit, Dimensions, NewLineItem, TaxMethod, ValuationMethod};
use thiserror::Error;

/// Rejected operator input.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InputError {
    #[error("{field} is required")]
    Empty { field: &'static str },

    #[error("{field}: '{value}' is not a number")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} must be {expected}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("{field} is required when {requirement}")]
    MissingFor {
        field: &'static str,
        requirement: &'static str,
    },

    #[error("{field}: unknown option '{value}'")]
    UnknownOption { field: &'static str, value: String },
}

const CURRENCY_SYMBOLS: [char; 5] = ['$', '€', '£', '₹', '¥'];

/// Checks that an amount already held as a number is finite and not negative.
pub fn ensure_amount(field: &'static str, value: f64) -> Result<f64, InputError> {
    if !value.is_finite() {
        return Err(InputError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(InputError::OutOfRange {
            field,
            value,
            expected: "zero or more",
        });
    }
    Ok(value)
}

/// Checks that a percentage already held as a number lies in `0..=100`.
pub fn ensure_percentage(field: &'static str, value: f64) -> Result<f64, InputError> {
    if !value.is_finite() {
        return Err(InputError::NotFinite { field });
    }
    if !(0.0..=100.0).contains(&value) {
        return Err(InputError::OutOfRange {
            field,
            value,
            expected: "between 0 and 100",
        });
    }
    Ok(value)
}

fn non_empty<'a>(field: &'static str, raw: &'a str) -> Result<&'a str, InputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputError::Empty { field });
    }
    Ok(trimmed)
}

fn parse_number(field: &'static str, text: &str, original: &str) -> Result<f64, InputError> {
    let value: f64 = text.trim().parse().map_err(|_| InputError::NotANumber {
        field,
        value: original.trim().to_string(),
    })?;
    if !value.is_finite() {
        return Err(InputError::NotFinite { field });
    }
    Ok(value)
}

/// Thousands separators are only accepted in groups of three: `1,234.50` but not `1,23`.
fn strip_thousands(field: &'static str, text: &str, original: &str) -> Result<String, InputError> {
    if !text.contains(',') {
        return Ok(text.to_string());
    }
    let integer_part = text.split('.').next().unwrap_or_default();
    let mut groups = integer_part.split(',');
    let head = groups.next().unwrap_or_default();
    let well_formed = !head.is_empty()
        && head.len() <= 3
        && groups.all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit()))
        && !text.split('.').skip(1).any(|fraction| fraction.contains(','));
    if !well_formed {
        return Err(InputError::NotANumber {
            field,
            value: original.trim().to_string(),
        });
    }
    Ok(text.replace(',', ""))
}

/// Parses a money amount such as `1,199.00`, `$89.50` or `₹ 2,500`.
pub fn parse_money(field: &'static str, raw: &str) -> Result<f64, InputError> {
    let text = non_empty(field, raw)?;
    let text = text.trim_start_matches(&CURRENCY_SYMBOLS[..]).trim_start();
    let text = strip_thousands(field, text, raw)?;
    let value = parse_number(field, &text, raw)?;
    ensure_amount(field, value)
}

/// Parses a percentage in `0..=100`, with or without a trailing `%`.
pub fn parse_percentage(field: &'static str, raw: &str) -> Result<f64, InputError> {
    let text = non_empty(field, raw)?;
    let text = text.strip_suffix('%').unwrap_or(text);
    let value = parse_number(field, text, raw)?;
    ensure_percentage(field, value)
}

/// Parses a whole quantity of at least one.
pub fn parse_quantity(field: &'static str, raw: &str) -> Result<u32, InputError> {
    let text = non_empty(field, raw)?;
    let value: u32 = text.parse().map_err(|_| InputError::NotANumber {
        field,
        value: text.to_string(),
    })?;
    if value < 1 {
        return Err(InputError::OutOfRange {
            field,
            value: value as f64,
            expected: "at least 1",
        });
    }
    Ok(value)
}

/// Parses a weight in kilograms; a trailing `kg` is accepted.
pub fn parse_weight(field: &'static str, raw: &str) -> Result<f64, InputError> {
    let text = non_empty(field, raw)?;
    let text = text.strip_suffix("kg").unwrap_or(text);
    let value = parse_number(field, text, raw)?;
    ensure_amount(field, value)
}

/// Parses one package dimension.
pub fn parse_dimension(field: &'static str, raw: &str) -> Result<f64, InputError> {
    let text = non_empty(field, raw)?;
    let value = parse_number(field, text, raw)?;
    ensure_amount(field, value)
}

/// Parses a country or currency code such as `in` or `USD` into upper case.
pub fn parse_code(field: &'static str, raw: &str) -> Result<String, InputError> {
    let text = non_empty(field, raw)?;
    if !(2..=3).contains(&text.len()) || !text.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(InputError::UnknownOption {
            field,
            value: text.to_string(),
        });
    }
    Ok(text.to_ascii_uppercase())
}

fn optional<T>(
    raw: &str,
    parse: impl FnOnce(&str) -> Result<T, InputError>,
) -> Result<Option<T>, InputError> {
    if raw.trim().is_empty() {
        Ok(None)
    } else {
        parse(raw).map(Some)
    }
}

/// One product row exactly as typed by the operator.
///
/// Optional fields are left empty rather than filled with placeholders; an empty
/// `tax_method` means `country` and an empty `valuation_method` means `actual`.
#[derive(Debug, Clone, Default)]
pub struct LineItemForm {
    pub product_name: String,
    pub source_url: String,
    pub unit_price: String,
    pub quantity: String,
    pub weight_kg: String,
    pub length: String,
    pub width: String,
    pub height: String,
    pub dimension_unit: String,
    pub hsn_code: String,
    pub tax_method: String,
    pub valuation_method: String,
    pub minimum_valuation: String,
    pub manual_customs_rate: String,
}

impl LineItemForm {
    /// Parses every field and checks the cross-field rules of a line item.
    pub fn parse(&self) -> Result<NewLineItem, InputError> {
        let product_name = non_empty("product_name", &self.product_name)?.to_string();
        let unit_price = parse_money("unit_price", &self.unit_price)?;
        let quantity = parse_quantity("quantity", &self.quantity)?;
        let weight_kg = parse_weight("weight_kg", &self.weight_kg)?;

        let tax_method = if self.tax_method.trim().is_empty() {
            TaxMethod::Country
        } else {
            self.tax_method.parse()?
        };
        let valuation_method = if self.valuation_method.trim().is_empty() {
            ValuationMethod::Actual
        } else {
            self.valuation_method.parse()?
        };

        let item = NewLineItem {
            product_name,
            source_url: optional(&self.source_url, |s| Ok(s.trim().to_string()))?,
            unit_price,
            quantity,
            weight_kg,
            dimensions: self.dimensions()?,
            hsn_code: optional(&self.hsn_code, |s| Ok(s.trim().to_string()))?,
            tax_method,
            valuation_method,
            minimum_valuation: optional(&self.minimum_valuation, |s| {
                parse_money("minimum_valuation", s)
            })?,
            manual_customs_rate: optional(&self.manual_customs_rate, |s| {
                parse_percentage("manual_customs_rate", s)
            })?,
            suggested_customs_rate: None,
        };
        item.validate()?;
        Ok(item)
    }

    /// All three axes or none.
    fn dimensions(&self) -> Result<Option<Dimensions>, InputError> {
        let axes = [&self.length, &self.width, &self.height];
        if axes.iter().all(|axis| axis.trim().is_empty()) {
            return Ok(None);
        }
        let unit = if self.dimension_unit.trim().is_empty() {
            DimensionUnit::Centimeters
        } else {
            self.dimension_unit.parse()?
        };
        Ok(Some(Dimensions {
            length: parse_dimension("length", &self.length)?,
            width: parse_dimension("width", &self.width)?,
            height: parse_dimension("height", &self.height)?,
            unit,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_accepts_symbols_and_separators() {
        assert_eq!(parse_money("price", "1,199.00").unwrap(), 1199.0);
        assert_eq!(parse_money("price", "$89.50").unwrap(), 89.5);
        assert_eq!(parse_money("price", " ₹ 2,500 ").unwrap(), 2500.0);
        assert_eq!(parse_money("price", "1,234,567.5").unwrap(), 1_234_567.5);
        assert_eq!(parse_money("price", "0").unwrap(), 0.0);
    }

    #[test]
    fn money_rejects_garbage_instead_of_defaulting() {
        assert_eq!(
            parse_money("price", "   "),
            Err(InputError::Empty { field: "price" })
        );
        assert!(matches!(
            parse_money("price", "abc"),
            Err(InputError::NotANumber { field: "price", .. })
        ));
        assert!(matches!(
            parse_money("price", "1,23"),
            Err(InputError::NotANumber { .. })
        ));
        assert!(matches!(
            parse_money("price", "-5"),
            Err(InputError::OutOfRange { field: "price", .. })
        ));
        assert_eq!(
            parse_money("price", "inf"),
            Err(InputError::NotFinite { field: "price" })
        );
        assert_eq!(
            parse_money("price", "NaN"),
            Err(InputError::NotFinite { field: "price" })
        );
    }

    #[test]
    fn percentage_bounds() {
        assert_eq!(parse_percentage("rate", "18%").unwrap(), 18.0);
        assert_eq!(parse_percentage("rate", "100").unwrap(), 100.0);
        assert!(matches!(
            parse_percentage("rate", "100.5"),
            Err(InputError::OutOfRange { .. })
        ));
        assert!(matches!(
            parse_percentage("rate", "-1"),
            Err(InputError::OutOfRange { .. })
        ));
    }

    #[test]
    fn quantity_must_be_a_positive_integer() {
        assert_eq!(parse_quantity("quantity", "3").unwrap(), 3);
        assert!(matches!(
            parse_quantity("quantity", "0"),
            Err(InputError::OutOfRange { .. })
        ));
        assert!(matches!(
            parse_quantity("quantity", "1.5"),
            Err(InputError::NotANumber { .. })
        ));
        assert!(matches!(
            parse_quantity("quantity", "-2"),
            Err(InputError::NotANumber { .. })
        ));
    }

    #[test]
    fn codes_are_upper_cased() {
        assert_eq!(parse_code("destination_country", " in ").unwrap(), "IN");
        assert_eq!(parse_code("currency", "usd").unwrap(), "USD");
        assert!(matches!(
            parse_code("currency", "US Dollar"),
            Err(InputError::UnknownOption { .. })
        ));
        assert_eq!(
            parse_code("currency", ""),
            Err(InputError::Empty { field: "currency" })
        );
    }

    #[test]
    fn weight_accepts_kg_suffix() {
        assert_eq!(parse_weight("weight_kg", "1.24kg").unwrap(), 1.24);
        assert_eq!(parse_weight("weight_kg", "0").unwrap(), 0.0);
    }

    fn laptop_row() -> LineItemForm {
        LineItemForm {
            product_name: "Apple MacBook Air M2".into(),
            unit_price: "$1,199.00".into(),
            quantity: "1".into(),
            weight_kg: "1.24".into(),
            length: "30.4".into(),
            width: "21.5".into(),
            height: "1.13".into(),
            hsn_code: "8471".into(),
            tax_method: "hsn".into(),
            ..Default::default()
        }
    }

    #[test]
    fn form_parses_into_line_item() {
        let item = laptop_row().parse().unwrap();
        assert_eq!(item.product_name, "Apple MacBook Air M2");
        assert_eq!(item.unit_price, 1199.0);
        assert_eq!(item.tax_method, TaxMethod::Hsn);
        assert_eq!(item.valuation_method, ValuationMethod::Actual);
        let dims = item.dimensions.unwrap();
        assert_eq!(dims.unit, DimensionUnit::Centimeters);
        assert_eq!(dims.height, 1.13);
        assert!(item.source_url.is_none());
    }

    #[test]
    fn form_rejects_partial_dimensions() {
        let row = LineItemForm {
            height: String::new(),
            ..laptop_row()
        };
        assert_eq!(row.parse(), Err(InputError::Empty { field: "height" }));
    }

    #[test]
    fn form_enforces_cross_field_rules() {
        let row = LineItemForm {
            hsn_code: String::new(),
            ..laptop_row()
        };
        assert!(matches!(
            row.parse(),
            Err(InputError::MissingFor { field: "hsn_code", .. })
        ));

        let row = LineItemForm {
            valuation_method: "minimum".into(),
            ..laptop_row()
        };
        assert!(matches!(
            row.parse(),
            Err(InputError::MissingFor {
                field: "minimum_valuation",
                ..
            })
        ));

        let row = LineItemForm {
            tax_method: "customs-magic".into(),
            ..laptop_row()
        };
        assert!(matches!(
            row.parse(),
            Err(InputError::UnknownOption {
                field: "tax_method",
                ..
            })
        ));
    }
}
