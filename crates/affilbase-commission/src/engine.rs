use crate::errors::CommissionError;
use affilbase_attribution::catalog::{bounded, Catalog};
use affilbase_attribution::model::{Attribution, ConversionEvent};
use affilbase_ledger::model::{EntryKind, LedgerEntry, ReferenceId};
use affilbase_ledger::store::{AppendOutcome, LedgerStore};
use affilbase_types::prelude::*;

/// What a commission post produced. `Skipped` covers unattributed
/// conversions and commissions that floor to zero; neither writes anything.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Posting {
    Credited(LedgerEntry),
    Skipped,
}

/// Posts commission credits, exactly once per conversion. Safe to call
/// under at-least-once webhook delivery without extra locking: the ledger's
/// conditional append is the whole concurrency story.
pub struct CommissionEngine<L, C> {
    ledger: L,
    catalog: C,
    pub catalog_timeout_ms: u64,
}

impl<L, C> CommissionEngine<L, C>
where
    L: LedgerStore,
    C: Catalog,
{
    pub fn new(ledger: L, catalog: C, catalog_timeout_ms: u64) -> Self {
        Self {
            ledger,
            catalog,
            catalog_timeout_ms,
        }
    }

    pub async fn post(
        &self,
        attribution: &Attribution,
        conversion: &ConversionEvent,
        now: Timestamp,
    ) -> Result<Posting, CommissionError> {
        if attribution.conversion_id != conversion.id {
            return Err(CommissionError::invalid(&format!(
                "attribution {} does not match conversion {}",
                attribution.conversion_id, conversion.id
            )));
        }
        if conversion.gross_amount.is_negative() {
            return Err(CommissionError::invalid("gross amount must be non-negative"));
        }

        let Some(affiliate_id) = attribution.affiliate_id.clone() else {
            return Ok(Posting::Skipped);
        };

        let policy = bounded(
            self.catalog_timeout_ms,
            "catalog.commission_policy",
            self.catalog.commission_policy(&conversion.product_id),
        )
        .await?;

        // Integer floor in minor units; 129.99 at 3000bp credits 38.99.
        let amount = conversion.gross_amount.basis_points(policy.rate_bp);
        if amount.is_zero() {
            return Ok(Posting::Skipped);
        }

        let entry = LedgerEntry::new(
            affiliate_id,
            EntryKind::Credit,
            amount,
            ReferenceId::Conversion(conversion.id.clone()),
            now,
        );

        match self.ledger.append_once(entry).await? {
            AppendOutcome::Appended(entry) => {
                tracing::debug!(
                    target = "affilbase::commission",
                    conversion = %conversion.id,
                    amount = %entry.amount,
                    "commission credited"
                );
                Ok(Posting::Credited(entry))
            }
            AppendOutcome::Existing(entry) => Ok(Posting::Credited(entry)),
        }
    }
}
