//! Process-local totals cache.

use super::{QuoteCache, ServiceError};
use crate::model::{QuoteId, QuoteTotals};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Default)]
struct CacheState {
    entries: HashMap<QuoteId, QuoteTotals>,
    invalidations: usize,
}

/// Keeps the latest totals of each quote and counts invalidations.
#[derive(Default)]
pub struct InMemoryQuoteCache {
    state: Mutex<CacheState>,
}

impl InMemoryQuoteCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn cached(&self, id: QuoteId) -> Option<QuoteTotals> {
        self.state.lock().await.entries.get(&id).cloned()
    }

    pub async fn invalidation_count(&self) -> usize {
        self.state.lock().await.invalidations
    }
}

#[async_trait]
impl QuoteCache for InMemoryQuoteCache {
    async fn store(&self, id: QuoteId, totals: &QuoteTotals) -> Result<(), ServiceError> {
        self.state.lock().await.entries.insert(id, totals.clone());
        debug!(%id, "Cached totals");
        Ok(())
    }

    async fn invalidate(&self, id: QuoteId) -> Result<(), ServiceError> {
        let mut state = self.state.lock().await;
        state.entries.remove(&id);
        state.invalidations += 1;
        debug!(%id, "Invalidated cached totals");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::{self, CalculationRequest};
    use crate::config::CostConfig;
    use crate::model::{Discount, HandlingMode};

    fn totals() -> QuoteTotals {
        let request = CalculationRequest {
            currency: "USD".into(),
            origin_country: "US".into(),
            destination_country: "IN".into(),
            items: Vec::new(),
            shipping: None,
            domestic_shipping: 12.0,
            handling_mode: HandlingMode::Auto,
            insurance_opted_in: false,
            discount: Discount::default(),
        };
        calc::calculate(&request, &CostConfig::embedded().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn store_then_invalidate() {
        let cache = InMemoryQuoteCache::new();
        cache.store(QuoteId(1), &totals()).await.unwrap();
        assert_eq!(cache.cached(QuoteId(1)).await.unwrap().domestic_shipping, 12.0);

        cache.invalidate(QuoteId(1)).await.unwrap();
        assert!(cache.cached(QuoteId(1)).await.is_none());
        assert_eq!(cache.invalidation_count().await, 1);
    }
}
