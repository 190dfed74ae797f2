use crate::errors::AttributionError;
use crate::model::ConversionEvent;
use crate::store::{ConversionStore, IngestOutcome};
use affilbase_types::prelude::*;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
struct Inner {
    by_id: HashMap<ConversionId, ConversionEvent>,
    by_order: HashMap<OrderId, ConversionId>,
}

#[derive(Default, Clone)]
pub struct InMemoryConversionStore {
    inner: Arc<RwLock<Inner>>,
}

#[async_trait]
impl ConversionStore for InMemoryConversionStore {
    async fn ingest(
        &self,
        conversion: ConversionEvent,
    ) -> Result<IngestOutcome, AttributionError> {
        let mut guard = self.inner.write();
        if let Some(existing_id) = guard.by_order.get(&conversion.order_id) {
            let existing = guard
                .by_id
                .get(existing_id)
                .cloned()
                .ok_or_else(|| AttributionError::internal("order index points at missing conversion"))?;
            return Ok(IngestOutcome::Duplicate(existing));
        }
        guard
            .by_order
            .insert(conversion.order_id.clone(), conversion.id.clone());
        guard.by_id.insert(conversion.id.clone(), conversion.clone());
        Ok(IngestOutcome::Accepted(conversion))
    }

    async fn get(&self, id: &ConversionId) -> Result<Option<ConversionEvent>, AttributionError> {
        Ok(self.inner.read().by_id.get(id).cloned())
    }
}
