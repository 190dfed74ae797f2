use crate::catalog::{bounded, Catalog};
use crate::errors::AttributionError;
use crate::model::{Attribution, ClickEvent, ConversionEvent};
use crate::store::{AttributionStore, ClickStore, ConversionStore, IngestOutcome};
use affilbase_types::prelude::*;

/// Matches conversions to the most recent eligible click. Resolution is a
/// pure read over immutable click data, made idempotent by the attribution
/// store, so concurrent or replayed webhook deliveries are harmless.
pub struct Resolver<CS, VS, AS, C> {
    clicks: CS,
    conversions: VS,
    attributions: AS,
    catalog: C,
    pub catalog_timeout_ms: u64,
}

impl<CS, VS, AS, C> Resolver<CS, VS, AS, C>
where
    CS: ClickStore,
    VS: ConversionStore,
    AS: AttributionStore,
    C: Catalog,
{
    pub fn new(clicks: CS, conversions: VS, attributions: AS, catalog: C, catalog_timeout_ms: u64) -> Self {
        Self {
            clicks,
            conversions,
            attributions,
            catalog,
            catalog_timeout_ms,
        }
    }

    /// Accepts a checkout conversion, deduplicated by `order_id`. A retried
    /// webhook gets back the originally stored event.
    pub async fn ingest(
        &self,
        conversion: ConversionEvent,
    ) -> Result<ConversionEvent, AttributionError> {
        if conversion.gross_amount.is_negative() {
            return Err(AttributionError::invalid(&format!(
                "gross amount must be non-negative, got {}",
                conversion.gross_amount
            )));
        }
        if conversion.order_id.as_str().is_empty() {
            return Err(AttributionError::invalid("order id required"));
        }
        match self.conversions.ingest(conversion).await? {
            IngestOutcome::Accepted(event) => Ok(event),
            IngestOutcome::Duplicate(event) => {
                tracing::debug!(
                    target = "affilbase::attribution",
                    order = %event.order_id,
                    "duplicate conversion ingest treated as no-op"
                );
                Ok(event)
            }
        }
    }

    /// Resolves a conversion to an attribution, computing it at most once.
    pub async fn resolve(
        &self,
        conversion_id: &ConversionId,
        now: Timestamp,
    ) -> Result<Attribution, AttributionError> {
        if let Some(existing) = self.attributions.get(conversion_id).await? {
            return Ok(existing);
        }

        let conversion = self
            .conversions
            .get(conversion_id)
            .await?
            .ok_or_else(|| {
                AttributionError::not_found(&format!("conversion {conversion_id} not ingested"))
            })?;

        let policy = bounded(
            self.catalog_timeout_ms,
            "catalog.commission_policy",
            self.catalog.commission_policy(&conversion.product_id),
        )
        .await?;

        let from = conversion.at.saturating_sub_ms(policy.attribution_window_ms);
        let candidates = self
            .clicks
            .eligible(
                &conversion.product_id,
                &conversion.visitor_fingerprint,
                from,
                conversion.at,
            )
            .await?;

        let attribution = match last_click(candidates) {
            Some(click) => Attribution::attributed(conversion.id.clone(), &click, now),
            None => Attribution::unattributed(conversion.id.clone(), now),
        };

        // put_once keeps the first computed attribution under a resolve race.
        self.attributions.put_once(attribution).await
    }
}

/// Last-click-wins: maximum timestamp, ties broken by the lexicographically
/// greatest click id so replays pick the same winner.
fn last_click(candidates: Vec<ClickEvent>) -> Option<ClickEvent> {
    candidates
        .into_iter()
        .max_by(|a, b| a.at.cmp(&b.at).then_with(|| a.id.cmp(&b.id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn click(id: &str, at: i64) -> ClickEvent {
        ClickEvent {
            id: ClickId::from(id),
            affiliate_id: AffiliateId::from("aff-1"),
            link_id: LinkId::from("lnk-1"),
            product_id: ProductId::from("prod-1"),
            commission_rate_bp: 3_000,
            visitor_fingerprint: VisitorFingerprint::from("fp-1"),
            at: Timestamp(at),
        }
    }

    #[test]
    fn later_timestamp_wins() {
        let winner = last_click(vec![click("clk-a", 10), click("clk-b", 15)]).unwrap();
        assert_eq!(winner.id, ClickId::from("clk-b"));
    }

    #[test]
    fn timestamp_tie_breaks_on_greatest_id() {
        let winner = last_click(vec![click("clk-a", 10), click("clk-b", 10)]).unwrap();
        assert_eq!(winner.id, ClickId::from("clk-b"));
    }

    #[test]
    fn empty_candidates_yield_none() {
        assert!(last_click(Vec::new()).is_none());
    }
}
