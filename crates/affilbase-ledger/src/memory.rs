use crate::errors::LedgerError;
use crate::model::{EntryKind, LedgerEntry, ReferenceId};
use crate::store::{validate, AppendOutcome, LedgerStore};
use affilbase_types::prelude::*;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
struct Inner {
    by_id: HashMap<EntryId, LedgerEntry>,
    by_reference: HashMap<(EntryKind, ReferenceId), EntryId>,
}

/// In-memory ledger tier. A persistent tier implements the same trait with
/// a unique index on `(kind, reference)` doing the conditional-insert work.
#[derive(Default, Clone)]
pub struct InMemoryLedgerStore {
    inner: Arc<RwLock<Inner>>,
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn append(&self, entry: LedgerEntry) -> Result<(), LedgerError> {
        validate(&entry)?;
        let mut guard = self.inner.write();
        if guard.by_id.contains_key(&entry.id) {
            return Err(LedgerError::conflict(&format!(
                "entry {} already recorded",
                entry.id
            )));
        }
        guard
            .by_reference
            .insert((entry.kind, entry.reference.clone()), entry.id.clone());
        guard.by_id.insert(entry.id.clone(), entry);
        Ok(())
    }

    async fn append_once(&self, entry: LedgerEntry) -> Result<AppendOutcome, LedgerError> {
        validate(&entry)?;
        let mut guard = self.inner.write();
        let key = (entry.kind, entry.reference.clone());
        if let Some(existing_id) = guard.by_reference.get(&key) {
            let existing = guard
                .by_id
                .get(existing_id)
                .cloned()
                .ok_or_else(|| LedgerError::internal("reference index points at missing entry"))?;
            tracing::debug!(
                target = "affilbase::ledger",
                reference = %entry.reference,
                kind = entry.kind.as_str(),
                "append_once hit existing entry"
            );
            return Ok(AppendOutcome::Existing(existing));
        }
        guard.by_reference.insert(key, entry.id.clone());
        guard.by_id.insert(entry.id.clone(), entry.clone());
        Ok(AppendOutcome::Appended(entry))
    }

    async fn entries(&self, affiliate: &AffiliateId) -> Result<Vec<LedgerEntry>, LedgerError> {
        let guard = self.inner.read();
        let mut entries: Vec<LedgerEntry> = guard
            .by_id
            .values()
            .filter(|e| e.affiliate_id == *affiliate)
            .cloned()
            .collect();
        entries.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(entries)
    }

    async fn find_reference(
        &self,
        kind: EntryKind,
        reference: &ReferenceId,
    ) -> Result<Option<LedgerEntry>, LedgerError> {
        let guard = self.inner.read();
        Ok(guard
            .by_reference
            .get(&(kind, reference.clone()))
            .and_then(|id| guard.by_id.get(id))
            .cloned())
    }
}
