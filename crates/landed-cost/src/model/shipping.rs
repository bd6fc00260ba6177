//! International shipping options offered on a quote.

use crate::calc::{check_amount, check_bounds, check_rate, CalcError};
use serde::{Deserialize, Serialize};

/// Inclusive delivery window in days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitDays {
    pub min: u32,
    pub max: u32,
}

impl TransitDays {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

/// Handling schedule: `clamp(base_fee + value × percentage_of_value / 100, min_fee, max_fee)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandlingCharge {
    pub base_fee: f64,
    pub percentage_of_value: f64,
    pub min_fee: f64,
    pub max_fee: f64,
}

impl HandlingCharge {
    pub fn validate(&self) -> Result<(), CalcError> {
        check_amount("handling.base_fee", self.base_fee)?;
        check_rate("handling.percentage_of_value", self.percentage_of_value)?;
        check_amount("handling.min_fee", self.min_fee)?;
        check_amount("handling.max_fee", self.max_fee)?;
        check_bounds("handling", self.min_fee, self.max_fee)
    }
}

/// Insurance terms: `clamp(value × coverage_percentage / 100, min_fee, max_coverage)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InsuranceTerms {
    pub coverage_percentage: f64,
    pub min_fee: f64,
    pub max_coverage: f64,
}

impl InsuranceTerms {
    pub fn validate(&self) -> Result<(), CalcError> {
        check_rate("insurance.coverage_percentage", self.coverage_percentage)?;
        check_amount("insurance.min_fee", self.min_fee)?;
        check_amount("insurance.max_coverage", self.max_coverage)?;
        check_bounds("insurance", self.min_fee, self.max_coverage)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingOption {
    pub id: String,
    pub carrier: String,
    pub service_name: String,
    /// Flat part of the price.
    pub cost: f64,
    /// Added per kilogram of billing weight.
    #[serde(default)]
    pub cost_per_kg: Option<f64>,
    pub transit_days: TransitDays,
    #[serde(default)]
    pub handling: Option<HandlingCharge>,
    #[serde(default)]
    pub insurance: Option<InsuranceTerms>,
}

impl ShippingOption {
    pub fn new(
        id: impl Into<String>,
        carrier: impl Into<String>,
        service_name: impl Into<String>,
        cost: f64,
        transit_days: TransitDays,
    ) -> Self {
        Self {
            id: id.into(),
            carrier: carrier.into(),
            service_name: service_name.into(),
            cost,
            cost_per_kg: None,
            transit_days,
            handling: None,
            insurance: None,
        }
    }

    pub fn with_cost_per_kg(mut self, rate: f64) -> Self {
        self.cost_per_kg = Some(rate);
        self
    }

    pub fn with_handling(mut self, handling: HandlingCharge) -> Self {
        self.handling = Some(handling);
        self
    }

    pub fn with_insurance(mut self, insurance: InsuranceTerms) -> Self {
        self.insurance = Some(insurance);
        self
    }

    /// International shipping charged for a consignment of `billing_weight_kg`.
    pub fn price_for(&self, billing_weight_kg: f64) -> f64 {
        self.cost + self.cost_per_kg.unwrap_or(0.0) * billing_weight_kg
    }

    pub fn validate(&self) -> Result<(), CalcError> {
        check_amount("shipping.cost", self.cost)?;
        if let Some(rate) = self.cost_per_kg {
            check_amount("shipping.cost_per_kg", rate)?;
        }
        if self.transit_days.min > self.transit_days.max {
            return Err(CalcError::InvertedTransit {
                min: self.transit_days.min,
                max: self.transit_days.max,
            });
        }
        if let Some(handling) = &self.handling {
            handling.validate()?;
        }
        if let Some(insurance) = &self.insurance {
            insurance.validate()?;
        }
        Ok(())
    }
}

/// How the quote picks among its offered options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingPreference {
    Id(String),
    /// Lowest price; ties go to the shorter worst-case transit.
    Cheapest,
    /// Shortest worst-case transit; ties go to the lower price.
    Fastest,
}
