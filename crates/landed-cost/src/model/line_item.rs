//! Product rows on a quote.

use crate::input::{ensure_amount, ensure_percentage, InputError};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Identifier of a row within its quote. Sequential, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LineItemId(pub u32);

impl Display for LineItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "item_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DimensionUnit {
    #[serde(rename = "cm")]
    Centimeters,
    #[serde(rename = "in")]
    Inches,
}

impl FromStr for DimensionUnit {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cm" => Ok(Self::Centimeters),
            "in" | "inch" | "inches" => Ok(Self::Inches),
            other => Err(InputError::UnknownOption {
                field: "dimension_unit",
                value: other.to_string(),
            }),
        }
    }
}

/// Package dimensions of a single unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub unit: DimensionUnit,
}

impl Dimensions {
    pub fn cm(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
            unit: DimensionUnit::Centimeters,
        }
    }

    pub fn inches(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
            unit: DimensionUnit::Inches,
        }
    }

    /// `(length, width, height)` in centimeters.
    pub fn to_cm(&self) -> (f64, f64, f64) {
        let factor = match self.unit {
            DimensionUnit::Centimeters => 1.0,
            DimensionUnit::Inches => 2.54,
        };
        (
            self.length * factor,
            self.width * factor,
            self.height * factor,
        )
    }

    pub fn validate(&self) -> Result<(), InputError> {
        ensure_amount("length", self.length)?;
        ensure_amount("width", self.width)?;
        ensure_amount("height", self.height)?;
        Ok(())
    }
}

/// How the customs rate of a row is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxMethod {
    /// Configured rate of the longest matching HSN prefix.
    Hsn,
    /// Rate typed in by the operator.
    Manual,
    /// Destination country default.
    Country,
    /// Rate suggested by an external classifier.
    Ai,
}

impl FromStr for TaxMethod {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hsn" => Ok(Self::Hsn),
            "manual" => Ok(Self::Manual),
            "country" => Ok(Self::Country),
            "ai" => Ok(Self::Ai),
            other => Err(InputError::UnknownOption {
                field: "tax_method",
                value: other.to_string(),
            }),
        }
    }
}

/// Which per-unit value customs is assessed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuationMethod {
    Actual,
    Minimum,
    HigherOfBoth,
}

impl FromStr for ValuationMethod {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "actual" => Ok(Self::Actual),
            "minimum" => Ok(Self::Minimum),
            "higher_of_both" | "higher-of-both" => Ok(Self::HigherOfBoth),
            other => Err(InputError::UnknownOption {
                field: "valuation_method",
                value: other.to_string(),
            }),
        }
    }
}

/// A validated product row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: LineItemId,
    pub product_name: String,
    pub source_url: Option<String>,
    pub unit_price: f64,
    pub quantity: u32,
    /// Actual weight of one unit.
    pub weight_kg: f64,
    pub dimensions: Option<Dimensions>,
    pub hsn_code: Option<String>,
    pub tax_method: TaxMethod,
    pub valuation_method: ValuationMethod,
    /// Per-unit floor used by the `minimum` and `higher_of_both` valuations.
    pub minimum_valuation: Option<f64>,
    pub manual_customs_rate: Option<f64>,
    pub suggested_customs_rate: Option<f64>,
}

impl LineItem {
    /// `unit_price × quantity`.
    pub fn items_value(&self) -> f64 {
        self.unit_price * self.quantity as f64
    }

    /// Value declared to customs after the valuation method.
    pub fn customs_value(&self) -> f64 {
        let quantity = self.quantity as f64;
        let actual = self.items_value();
        match (self.valuation_method, self.minimum_valuation) {
            (ValuationMethod::Actual, _) => actual,
            (ValuationMethod::Minimum, Some(floor)) => floor * quantity,
            (ValuationMethod::HigherOfBoth, Some(floor)) => actual.max(floor * quantity),
            (_, None) => actual,
        }
    }

    /// Applies an edit, returning the edited row only if it is still valid.
    pub fn edited(&self, edit: LineItemEdit) -> Result<LineItem, InputError> {
        let mut item = self.clone();
        if let Some(v) = edit.product_name {
            item.product_name = v;
        }
        if let Some(v) = edit.source_url {
            item.source_url = v;
        }
        if let Some(v) = edit.unit_price {
            item.unit_price = v;
        }
        if let Some(v) = edit.quantity {
            item.quantity = v;
        }
        if let Some(v) = edit.weight_kg {
            item.weight_kg = v;
        }
        if let Some(v) = edit.dimensions {
            item.dimensions = v;
        }
        if let Some(v) = edit.hsn_code {
            item.hsn_code = v;
        }
        if let Some(v) = edit.tax_method {
            item.tax_method = v;
        }
        if let Some(v) = edit.valuation_method {
            item.valuation_method = v;
        }
        if let Some(v) = edit.minimum_valuation {
            item.minimum_valuation = v;
        }
        if let Some(v) = edit.manual_customs_rate {
            item.manual_customs_rate = v;
        }
        if let Some(v) = edit.suggested_customs_rate {
            item.suggested_customs_rate = v;
        }
        item.validate()?;
        Ok(item)
    }

    pub fn validate(&self) -> Result<(), InputError> {
        validate_fields(&Fields {
            product_name: &self.product_name,
            unit_price: self.unit_price,
            quantity: self.quantity,
            weight_kg: self.weight_kg,
            dimensions: self.dimensions.as_ref(),
            hsn_code: self.hsn_code.as_deref(),
            tax_method: self.tax_method,
            valuation_method: self.valuation_method,
            minimum_valuation: self.minimum_valuation,
            manual_customs_rate: self.manual_customs_rate,
            suggested_customs_rate: self.suggested_customs_rate,
        })
    }
}

/// A row to be added to a quote; the quote assigns its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLineItem {
    pub product_name: String,
    pub source_url: Option<String>,
    pub unit_price: f64,
    pub quantity: u32,
    pub weight_kg: f64,
    pub dimensions: Option<Dimensions>,
    pub hsn_code: Option<String>,
    pub tax_method: TaxMethod,
    pub valuation_method: ValuationMethod,
    pub minimum_valuation: Option<f64>,
    pub manual_customs_rate: Option<f64>,
    pub suggested_customs_rate: Option<f64>,
}

impl NewLineItem {
    /// A row taxed at the destination default and valued at its price.
    pub fn new(
        product_name: impl Into<String>,
        unit_price: f64,
        quantity: u32,
        weight_kg: f64,
    ) -> Self {
        Self {
            product_name: product_name.into(),
            source_url: None,
            unit_price,
            quantity,
            weight_kg,
            dimensions: None,
            hsn_code: None,
            tax_method: TaxMethod::Country,
            valuation_method: ValuationMethod::Actual,
            minimum_valuation: None,
            manual_customs_rate: None,
            suggested_customs_rate: None,
        }
    }

    pub fn with_dimensions(mut self, dimensions: Dimensions) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    pub fn with_hsn(mut self, code: impl Into<String>) -> Self {
        self.hsn_code = Some(code.into());
        self.tax_method = TaxMethod::Hsn;
        self
    }

    pub fn validate(&self) -> Result<(), InputError> {
        validate_fields(&Fields {
            product_name: &self.product_name,
            unit_price: self.unit_price,
            quantity: self.quantity,
            weight_kg: self.weight_kg,
            dimensions: self.dimensions.as_ref(),
            hsn_code: self.hsn_code.as_deref(),
            tax_method: self.tax_method,
            valuation_method: self.valuation_method,
            minimum_valuation: self.minimum_valuation,
            manual_customs_rate: self.manual_customs_rate,
            suggested_customs_rate: self.suggested_customs_rate,
        })
    }

    /// Validates the row and gives it an id.
    pub fn into_item(self, id: LineItemId) -> Result<LineItem, InputError> {
        self.validate()?;
        Ok(LineItem {
            id,
            product_name: self.product_name,
            source_url: self.source_url,
            unit_price: self.unit_price,
            quantity: self.quantity,
            weight_kg: self.weight_kg,
            dimensions: self.dimensions,
            hsn_code: self.hsn_code,
            tax_method: self.tax_method,
            valuation_method: self.valuation_method,
            minimum_valuation: self.minimum_valuation,
            manual_customs_rate: self.manual_customs_rate,
            suggested_customs_rate: self.suggested_customs_rate,
        })
    }
}

/// Partial edit of a row. `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineItemEdit {
    pub product_name: Option<String>,
    pub source_url: Option<Option<String>>,
    pub unit_price: Option<f64>,
    pub quantity: Option<u32>,
    pub weight_kg: Option<f64>,
    pub dimensions: Option<Option<Dimensions>>,
    pub hsn_code: Option<Option<String>>,
    pub tax_method: Option<TaxMethod>,
    pub valuation_method: Option<ValuationMethod>,
    pub minimum_valuation: Option<Option<f64>>,
    pub manual_customs_rate: Option<Option<f64>>,
    pub suggested_customs_rate: Option<Option<f64>>,
}

struct Fields<'a> {
    product_name: &'a str,
    unit_price: f64,
    quantity: u32,
    weight_kg: f64,
    dimensions: Option<&'a Dimensions>,
    hsn_code: Option<&'a str>,
    tax_method: TaxMethod,
    valuation_method: ValuationMethod,
    minimum_valuation: Option<f64>,
    manual_customs_rate: Option<f64>,
    suggested_customs_rate: Option<f64>,
}

fn validate_fields(fields: &Fields<'_>) -> Result<(), InputError> {
    if fields.product_name.trim().is_empty() {
        return Err(InputError::Empty {
            field: "product_name",
        });
    }
    ensure_amount("unit_price", fields.unit_price)?;
    if fields.quantity < 1 {
        return Err(InputError::OutOfRange {
            field: "quantity",
            value: fields.quantity as f64,
            expected: "at least 1",
        });
    }
    ensure_amount("weight_kg", fields.weight_kg)?;
    if let Some(dimensions) = fields.dimensions {
        dimensions.validate()?;
    }
    if let Some(floor) = fields.minimum_valuation {
        ensure_amount("minimum_valuation", floor)?;
    }
    if let Some(rate) = fields.manual_customs_rate {
        ensure_percentage("manual_customs_rate", rate)?;
    }
    if let Some(rate) = fields.suggested_customs_rate {
        ensure_percentage("suggested_customs_rate", rate)?;
    }

    if fields.valuation_method == ValuationMethod::Minimum && fields.minimum_valuation.is_none() {
        return Err(InputError::MissingFor {
            field: "minimum_valuation",
            requirement: "valuation method is minimum",
        });
    }
    match fields.tax_method {
        TaxMethod::Hsn if !matches!(fields.hsn_code, Some(code) if !code.trim().is_empty()) => {
            Err(InputError::MissingFor {
                field: "hsn_code",
                requirement: "tax method is hsn",
            })
        }
        TaxMethod::Manual if fields.manual_customs_rate.is_none() => Err(InputError::MissingFor {
            field: "manual_customs_rate",
            requirement: "tax method is manual",
        }),
        _ => Ok(()),
    }
}
