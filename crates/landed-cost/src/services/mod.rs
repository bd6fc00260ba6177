//! # External Collaborators
//!
//! The quote actor reaches everything outside itself through these traits. They are
//! bundled into [`QuoteServices`] and injected as the actor's runtime context, so tests
//! swap in failing or scripted implementations without touching the actor.
//!
//! | Trait | Shipped implementation |
//! |---|---|
//! | [`CalculationEngine`] | [`LocalCalculationEngine`] (the pure [`calc`](crate::calc) module) |
//! | [`CurrencyService`] | [`FixedRateCurrencyService`] (configured rates) |
//! | [`WeightEstimator`] | [`KeywordWeightEstimator`] (product-name keywords) |
//! | [`QuoteCache`] | [`InMemoryQuoteCache`] |
//!
//! Failures surface as [`ServiceError`]. The actor never retries: it logs, tells the
//! operator through a notification and keeps the previous totals, marked stale.

pub mod cache;
pub mod local;

pub use cache::InMemoryQuoteCache;
pub use local::{FixedRateCurrencyService, KeywordWeightEstimator, LocalCalculationEngine};

use crate::calc::{CalcError, CalculationRequest};
use crate::config::CostConfig;
use crate::model::{LineItem, QuoteId, QuoteTotals};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ServiceError {
    #[error("{service} unavailable: {reason}")]
    Unavailable {
        service: &'static str,
        reason: String,
    },

    #[error("no exchange rate from {from} to {to}")]
    UnsupportedCurrency { from: String, to: String },

    #[error("no weight estimate for '{0}'")]
    NoEstimate(String),

    #[error("calculation failed: {0}")]
    Calculation(#[from] CalcError),
}

/// Estimated per-unit weight with the estimator's confidence (0.0 to 1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightEstimate {
    pub weight_kg: f64,
    pub confidence: f64,
}

#[async_trait]
pub trait CalculationEngine: Send + Sync {
    async fn calculate(&self, request: &CalculationRequest) -> Result<QuoteTotals, ServiceError>;

    /// Billing weight of a consignment, used to price per-kg shipping options.
    async fn billing_weight(&self, items: &[LineItem]) -> Result<f64, ServiceError>;
}

#[async_trait]
pub trait CurrencyService: Send + Sync {
    /// Units of `to` per unit of `from`.
    async fn exchange_rate(&self, from: &str, to: &str) -> Result<f64, ServiceError>;
}

#[async_trait]
pub trait WeightEstimator: Send + Sync {
    async fn estimate_weight(&self, item: &LineItem) -> Result<WeightEstimate, ServiceError>;
}

#[async_trait]
pub trait QuoteCache: Send + Sync {
    async fn store(&self, id: QuoteId, totals: &QuoteTotals) -> Result<(), ServiceError>;
    async fn invalidate(&self, id: QuoteId) -> Result<(), ServiceError>;
}

/// Runtime context of the quote actor.
#[derive(Clone)]
pub struct QuoteServices {
    pub engine: Arc<dyn CalculationEngine>,
    pub currency: Arc<dyn CurrencyService>,
    pub weights: Arc<dyn WeightEstimator>,
    pub cache: Arc<dyn QuoteCache>,
}

impl QuoteServices {
    /// Offline services backed by `config`, with a fresh in-memory cache.
    pub fn local(config: Arc<CostConfig>) -> Self {
        Self {
            engine: Arc::new(LocalCalculationEngine::new(config.clone())),
            currency: Arc::new(FixedRateCurrencyService::new(config.clone())),
            weights: Arc::new(KeywordWeightEstimator::new(config)),
            cache: Arc::new(InMemoryQuoteCache::new()),
        }
    }

    pub fn with_engine(mut self, engine: Arc<dyn CalculationEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_currency(mut self, currency: Arc<dyn CurrencyService>) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_weights(mut self, weights: Arc<dyn WeightEstimator>) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn QuoteCache>) -> Self {
        self.cache = cache;
        self
    }
}
