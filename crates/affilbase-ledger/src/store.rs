use crate::errors::LedgerError;
use crate::model::{Balance, EntryKind, LedgerEntry, ReferenceId};
use affilbase_types::prelude::*;
use async_trait::async_trait;

/// Result of a conditional append: either this call recorded the entry, or
/// an entry with the same `(kind, reference)` was already on the ledger and
/// is returned unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppendOutcome {
    Appended(LedgerEntry),
    Existing(LedgerEntry),
}

impl AppendOutcome {
    pub fn entry(&self) -> &LedgerEntry {
        match self {
            AppendOutcome::Appended(entry) | AppendOutcome::Existing(entry) => entry,
        }
    }

    pub fn into_entry(self) -> LedgerEntry {
        match self {
            AppendOutcome::Appended(entry) | AppendOutcome::Existing(entry) => entry,
        }
    }
}

/// The ledger's only mutation primitive is append. Implementations must make
/// each append atomic: the entry is durably recorded exactly once or the
/// call fails with no partial visibility.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Unconditional append. Fails with a conflict if the entry id is
    /// already recorded.
    async fn append(&self, entry: LedgerEntry) -> Result<(), LedgerError>;

    /// Conditional insert-or-fetch keyed by `(entry.kind, entry.reference)`.
    /// The existence check and the insert are one atomic step, which is what
    /// makes retrying commission posts and reservation writes safe.
    async fn append_once(&self, entry: LedgerEntry) -> Result<AppendOutcome, LedgerError>;

    /// All entries for an affiliate, ordered by `created_at` then entry id.
    async fn entries(&self, affiliate: &AffiliateId) -> Result<Vec<LedgerEntry>, LedgerError>;

    async fn find_reference(
        &self,
        kind: EntryKind,
        reference: &ReferenceId,
    ) -> Result<Option<LedgerEntry>, LedgerError>;

    async fn balance(&self, affiliate: &AffiliateId) -> Result<Balance, LedgerError> {
        let entries = self.entries(affiliate).await?;
        Ok(Balance::fold(entries.iter()))
    }
}

pub(crate) fn validate(entry: &LedgerEntry) -> Result<(), LedgerError> {
    if entry.amount.is_negative() || entry.amount.is_zero() {
        return Err(LedgerError::invalid(&format!(
            "entry amount must be positive, got {}",
            entry.amount
        )));
    }
    if entry.id.as_str().is_empty() || entry.affiliate_id.as_str().is_empty() {
        return Err(LedgerError::invalid("entry id and affiliate id required"));
    }
    Ok(())
}
