use crate::errors::AttributionError;
use crate::model::ClickEvent;
use crate::store::{ClickStore, RecordOutcome};
use affilbase_types::prelude::*;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
struct Inner {
    by_id: HashMap<ClickId, ClickEvent>,
    // latest click per (link, fingerprint), for the debounce check
    latest: HashMap<(LinkId, VisitorFingerprint), ClickId>,
}

#[derive(Default, Clone)]
pub struct InMemoryClickStore {
    inner: Arc<RwLock<Inner>>,
}

#[async_trait]
impl ClickStore for InMemoryClickStore {
    async fn record_deduped(
        &self,
        click: ClickEvent,
        debounce_ms: i64,
    ) -> Result<RecordOutcome, AttributionError> {
        let mut guard = self.inner.write();
        let key = (click.link_id.clone(), click.visitor_fingerprint.clone());

        if let Some(existing_id) = guard.latest.get(&key) {
            if let Some(existing) = guard.by_id.get(existing_id) {
                if click.at.0 < existing.at.0.saturating_add(debounce_ms) {
                    tracing::debug!(
                        target = "affilbase::clicks",
                        link = %click.link_id,
                        "click debounced"
                    );
                    return Ok(RecordOutcome::Debounced(existing.clone()));
                }
            }
        }

        guard.latest.insert(key, click.id.clone());
        guard.by_id.insert(click.id.clone(), click.clone());
        Ok(RecordOutcome::Recorded(click))
    }

    async fn eligible(
        &self,
        product_id: &ProductId,
        fingerprint: &VisitorFingerprint,
        from: Timestamp,
        until: Timestamp,
    ) -> Result<Vec<ClickEvent>, AttributionError> {
        let guard = self.inner.read();
        Ok(guard
            .by_id
            .values()
            .filter(|c| {
                c.product_id == *product_id
                    && c.visitor_fingerprint == *fingerprint
                    && c.at >= from
                    && c.at < until
            })
            .cloned()
            .collect())
    }

    async fn count_for_link(&self, link_id: &LinkId) -> Result<u64, AttributionError> {
        let guard = self.inner.read();
        Ok(guard.by_id.values().filter(|c| c.link_id == *link_id).count() as u64)
    }

    async fn compact(&self, now: Timestamp, retain_ms: i64) -> Result<usize, AttributionError> {
        let mut guard = self.inner.write();
        let cutoff = now.saturating_sub_ms(retain_ms);
        let before = guard.by_id.len();
        guard.by_id.retain(|_, click| click.at >= cutoff);
        let removed = before - guard.by_id.len();
        if removed > 0 {
            let live: std::collections::HashSet<ClickId> = guard.by_id.keys().cloned().collect();
            guard.latest.retain(|_, id| live.contains(id));
            tracing::debug!(target = "affilbase::clicks", removed, "compacted expired clicks");
        }
        Ok(removed)
    }
}
