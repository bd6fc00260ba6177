//! Offline implementations driven entirely by [`CostConfig`].

use super::{CalculationEngine, CurrencyService, ServiceError, WeightEstimate, WeightEstimator};
use crate::calc::{self, CalculationRequest};
use crate::config::CostConfig;
use crate::model::{LineItem, QuoteTotals};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Runs [`calc::calculate`] in-process.
pub struct LocalCalculationEngine {
    config: Arc<CostConfig>,
}

impl LocalCalculationEngine {
    pub fn new(config: Arc<CostConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl CalculationEngine for LocalCalculationEngine {
    async fn calculate(&self, request: &CalculationRequest) -> Result<QuoteTotals, ServiceError> {
        Ok(calc::calculate(request, &self.config)?)
    }

    async fn billing_weight(&self, items: &[LineItem]) -> Result<f64, ServiceError> {
        Ok(calc::weight::quote_billing_weight(
            items,
            self.config.weight.volumetric_divisor,
        )?)
    }
}

/// Exchange rates from `[currency.rates]`.
pub struct FixedRateCurrencyService {
    config: Arc<CostConfig>,
}

impl FixedRateCurrencyService {
    pub fn new(config: Arc<CostConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl CurrencyService for FixedRateCurrencyService {
    async fn exchange_rate(&self, from: &str, to: &str) -> Result<f64, ServiceError> {
        let rate = self
            .config
            .exchange_rate(from, to)
            .ok_or_else(|| ServiceError::UnsupportedCurrency {
                from: from.to_string(),
                to: to.to_string(),
            })?;
        debug!(from, to, rate, "Exchange rate");
        Ok(rate)
    }
}

/// Matches configured keywords against the product name; the first match wins.
pub struct KeywordWeightEstimator {
    config: Arc<CostConfig>,
}

impl KeywordWeightEstimator {
    pub fn new(config: Arc<CostConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl WeightEstimator for KeywordWeightEstimator {
    async fn estimate_weight(&self, item: &LineItem) -> Result<WeightEstimate, ServiceError> {
        let name = item.product_name.to_lowercase();
        self.config
            .weight_estimates
            .iter()
            .find(|estimate| name.contains(&estimate.keyword))
            .map(|estimate| WeightEstimate {
                weight_kg: estimate.weight_kg,
                confidence: estimate.confidence,
            })
            .ok_or_else(|| ServiceError::NoEstimate(item.product_name.clone()))
    }
}
