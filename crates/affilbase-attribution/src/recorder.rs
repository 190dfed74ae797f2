use crate::catalog::{bounded, Catalog};
use crate::errors::AttributionError;
use crate::model::ClickEvent;
use crate::store::{ClickStore, RecordOutcome};
use affilbase_types::prelude::*;

/// Durably records referral-link visits, rejecting unknown/inactive links
/// and debouncing page-reload spam per `(link, fingerprint)`.
pub struct ClickRecorder<S, C> {
    clicks: S,
    catalog: C,
    pub debounce_ms: i64,
    pub catalog_timeout_ms: u64,
}

impl<S, C> ClickRecorder<S, C>
where
    S: ClickStore,
    C: Catalog,
{
    pub fn new(clicks: S, catalog: C, debounce_ms: i64, catalog_timeout_ms: u64) -> Self {
        Self {
            clicks,
            catalog,
            debounce_ms,
            catalog_timeout_ms,
        }
    }

    pub async fn record(
        &self,
        link_id: &LinkId,
        fingerprint: VisitorFingerprint,
        at: Timestamp,
    ) -> Result<ClickEvent, AttributionError> {
        let link = bounded(
            self.catalog_timeout_ms,
            "catalog.link",
            self.catalog.link(link_id),
        )
        .await?
        .filter(|l| l.active)
        .ok_or_else(|| AttributionError::link_inactive(link_id.as_str()))?;

        // Rate snapshot at click time keeps later policy edits out of the
        // audit trail.
        let policy = bounded(
            self.catalog_timeout_ms,
            "catalog.commission_policy",
            self.catalog.commission_policy(&link.product_id),
        )
        .await?;

        let click = ClickEvent {
            id: ClickId::new_random(),
            affiliate_id: link.affiliate_id,
            link_id: link.id,
            product_id: link.product_id,
            commission_rate_bp: policy.rate_bp,
            visitor_fingerprint: fingerprint,
            at,
        };

        match self.clicks.record_deduped(click, self.debounce_ms).await? {
            RecordOutcome::Recorded(event) | RecordOutcome::Debounced(event) => Ok(event),
        }
    }

    /// Time-based compaction: clicks older than the attribution window plus
    /// grace can no longer attribute anything.
    pub async fn compact(&self, now: Timestamp, retain_ms: i64) -> Result<usize, AttributionError> {
        self.clicks.compact(now, retain_ms).await
    }
}
