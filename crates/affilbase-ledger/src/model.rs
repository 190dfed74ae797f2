use affilbase_types::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Commission earned from an attributed conversion.
    Credit,
    /// Provisional hold for a withdrawal awaiting settlement.
    Reserve,
    /// Reservation returned after a failed payout.
    Release,
    /// Final balance reduction: a settled withdrawal, or a compensating
    /// correction against an earlier Credit.
    Debit,
}

impl EntryKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            EntryKind::Credit => "credit",
            EntryKind::Reserve => "reserve",
            EntryKind::Release => "release",
            EntryKind::Debit => "debit",
        }
    }
}

/// What an entry settles against. Also the idempotence key for
/// [`append_once`](crate::store::LedgerStore::append_once), combined with
/// the entry kind.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum ReferenceId {
    Conversion(ConversionId),
    Withdrawal(WithdrawalId),
}

impl std::fmt::Display for ReferenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceId::Conversion(id) => write!(f, "conversion:{id}"),
            ReferenceId::Withdrawal(id) => write!(f, "withdrawal:{id}"),
        }
    }
}

/// One immutable ledger line. `amount` is a positive magnitude; `kind`
/// carries the direction. Entries are never updated or deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: EntryId,
    pub affiliate_id: AffiliateId,
    pub kind: EntryKind,
    pub amount: Money,
    pub reference: ReferenceId,
    pub created_at: Timestamp,
}

impl LedgerEntry {
    pub fn new(
        affiliate_id: AffiliateId,
        kind: EntryKind,
        amount: Money,
        reference: ReferenceId,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: EntryId::new_random(),
            affiliate_id,
            kind,
            amount,
            reference,
            created_at,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub available: Money,
    pub reserved: Money,
    pub lifetime_earned: Money,
    pub withdrawn: Money,
}

impl Balance {
    /// Folds entries into a balance. Callers pass entries ordered by
    /// `(created_at, id)`; the fold itself is the only definition of
    /// balance anywhere in the system.
    ///
    /// A Reserve stays "open" (counted against available) until a Release
    /// or Debit arrives for the same reference. A Debit with no open
    /// Reserve is a compensating correction and reduces available
    /// directly.
    pub fn fold<'a>(entries: impl IntoIterator<Item = &'a LedgerEntry>) -> Balance {
        let mut lifetime: i64 = 0;
        let mut withdrawn: i64 = 0;
        let mut open: HashMap<&'a ReferenceId, i64> = HashMap::new();

        for entry in entries {
            let amount = entry.amount.minor();
            match entry.kind {
                EntryKind::Credit => lifetime += amount,
                EntryKind::Reserve => {
                    *open.entry(&entry.reference).or_insert(0) += amount;
                }
                EntryKind::Release => {
                    close_reserve(&mut open, &entry.reference, amount);
                }
                EntryKind::Debit => {
                    withdrawn += amount;
                    close_reserve(&mut open, &entry.reference, amount);
                }
            }
        }

        let reserved: i64 = open.values().sum();
        Balance {
            available: Money(lifetime - withdrawn - reserved),
            reserved: Money(reserved),
            lifetime_earned: Money(lifetime),
            withdrawn: Money(withdrawn),
        }
    }
}

fn close_reserve<'a>(
    open: &mut HashMap<&'a ReferenceId, i64>,
    reference: &ReferenceId,
    amount: i64,
) {
    let drained = match open.get_mut(reference) {
        Some(held) => {
            *held -= amount;
            *held <= 0
        }
        None => false,
    };
    if drained {
        open.remove(reference);
    }
}
