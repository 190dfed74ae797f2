use crate::errors::AttributionError;
use crate::model::Attribution;
use crate::store::AttributionStore;
use affilbase_types::prelude::*;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default, Clone)]
pub struct InMemoryAttributionStore {
    inner: Arc<RwLock<HashMap<ConversionId, Attribution>>>,
}

#[async_trait]
impl AttributionStore for InMemoryAttributionStore {
    async fn get(
        &self,
        conversion: &ConversionId,
    ) -> Result<Option<Attribution>, AttributionError> {
        Ok(self.inner.read().get(conversion).cloned())
    }

    async fn put_once(&self, attribution: Attribution) -> Result<Attribution, AttributionError> {
        let mut guard = self.inner.write();
        let stored = guard
            .entry(attribution.conversion_id.clone())
            .or_insert(attribution);
        Ok(stored.clone())
    }

    async fn list_for_affiliate(
        &self,
        affiliate: &AffiliateId,
    ) -> Result<Vec<Attribution>, AttributionError> {
        Ok(self
            .inner
            .read()
            .values()
            .filter(|a| a.affiliate_id.as_ref() == Some(affiliate))
            .cloned()
            .collect())
    }
}
