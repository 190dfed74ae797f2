use crate::errors::AttributionError;
use crate::model::{Attribution, ClickEvent, ConversionEvent};
use affilbase_types::prelude::*;
use async_trait::async_trait;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordOutcome {
    Recorded(ClickEvent),
    /// An identical `(link, fingerprint)` click landed inside the debounce
    /// interval; the original event is returned instead of a duplicate.
    Debounced(ClickEvent),
}

impl RecordOutcome {
    pub fn into_event(self) -> ClickEvent {
        match self {
            RecordOutcome::Recorded(event) | RecordOutcome::Debounced(event) => event,
        }
    }
}

#[async_trait]
pub trait ClickStore: Send + Sync {
    /// Conditional insert: dedups against the latest click for the same
    /// `(link_id, visitor_fingerprint)` within `debounce_ms`.
    async fn record_deduped(
        &self,
        click: ClickEvent,
        debounce_ms: i64,
    ) -> Result<RecordOutcome, AttributionError>;

    /// Clicks for `product_id` + `fingerprint` with `at` in `[from, until)`.
    async fn eligible(
        &self,
        product_id: &ProductId,
        fingerprint: &VisitorFingerprint,
        from: Timestamp,
        until: Timestamp,
    ) -> Result<Vec<ClickEvent>, AttributionError>;

    async fn count_for_link(&self, link_id: &LinkId) -> Result<u64, AttributionError>;

    /// Drops clicks older than `retain_ms` before `now`. Returns how many
    /// were compacted away.
    async fn compact(&self, now: Timestamp, retain_ms: i64) -> Result<usize, AttributionError>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IngestOutcome {
    Accepted(ConversionEvent),
    /// The order was already ingested; webhook retries land here and are
    /// success-with-no-op, never an error.
    Duplicate(ConversionEvent),
}

impl IngestOutcome {
    pub fn into_event(self) -> ConversionEvent {
        match self {
            IngestOutcome::Accepted(event) | IngestOutcome::Duplicate(event) => event,
        }
    }
}

#[async_trait]
pub trait ConversionStore: Send + Sync {
    /// Conditional insert keyed by `order_id`.
    async fn ingest(&self, conversion: ConversionEvent)
        -> Result<IngestOutcome, AttributionError>;

    async fn get(&self, id: &ConversionId) -> Result<Option<ConversionEvent>, AttributionError>;
}

#[async_trait]
pub trait AttributionStore: Send + Sync {
    async fn get(&self, conversion: &ConversionId)
        -> Result<Option<Attribution>, AttributionError>;

    /// First writer wins: stores the attribution unless one already exists
    /// for the conversion, and returns whichever is durable. Keeps replayed
    /// resolutions from recomputing history.
    async fn put_once(&self, attribution: Attribution) -> Result<Attribution, AttributionError>;

    async fn list_for_affiliate(
        &self,
        affiliate: &AffiliateId,
    ) -> Result<Vec<Attribution>, AttributionError>;
}
