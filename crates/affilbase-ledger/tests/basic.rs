use affilbase_ledger::prelude::*;
use affilbase_types::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

fn affiliate() -> AffiliateId {
    AffiliateId::from("aff-1")
}

fn credit(minor: i64, conversion: &str, at: i64) -> LedgerEntry {
    LedgerEntry::new(
        affiliate(),
        EntryKind::Credit,
        Money::from_minor(minor),
        ReferenceId::Conversion(ConversionId::from(conversion)),
        Timestamp(at),
    )
}

fn withdrawal_entry(kind: EntryKind, minor: i64, withdrawal: &str, at: i64) -> LedgerEntry {
    LedgerEntry::new(
        affiliate(),
        kind,
        Money::from_minor(minor),
        ReferenceId::Withdrawal(WithdrawalId::from(withdrawal)),
        Timestamp(at),
    )
}

#[tokio::test]
async fn balance_is_a_fold_over_entries() {
    let store = InMemoryLedgerStore::default();
    store.append(credit(50_000, "conv-1", 1)).await.unwrap();
    store.append(credit(9_988, "conv-2", 2)).await.unwrap();
    store
        .append(withdrawal_entry(EntryKind::Reserve, 30_000, "wd-1", 3))
        .await
        .unwrap();

    let balance = store.balance(&affiliate()).await.unwrap();
    assert_eq!(balance.lifetime_earned, Money::from_minor(59_988));
    assert_eq!(balance.reserved, Money::from_minor(30_000));
    assert_eq!(balance.available, Money::from_minor(29_988));
    assert_eq!(balance.withdrawn, Money::ZERO);
}

#[tokio::test]
async fn debit_closes_its_reservation() {
    let store = InMemoryLedgerStore::default();
    store.append(credit(50_000, "conv-1", 1)).await.unwrap();
    store
        .append(withdrawal_entry(EntryKind::Reserve, 50_000, "wd-1", 2))
        .await
        .unwrap();
    store
        .append(withdrawal_entry(EntryKind::Debit, 50_000, "wd-1", 3))
        .await
        .unwrap();

    let balance = store.balance(&affiliate()).await.unwrap();
    assert_eq!(balance.available, Money::ZERO);
    assert_eq!(balance.reserved, Money::ZERO);
    assert_eq!(balance.withdrawn, Money::from_minor(50_000));
}

#[tokio::test]
async fn release_restores_available() {
    let store = InMemoryLedgerStore::default();
    store.append(credit(10_000, "conv-1", 1)).await.unwrap();
    store
        .append(withdrawal_entry(EntryKind::Reserve, 8_000, "wd-1", 2))
        .await
        .unwrap();
    store
        .append(withdrawal_entry(EntryKind::Release, 8_000, "wd-1", 3))
        .await
        .unwrap();

    let balance = store.balance(&affiliate()).await.unwrap();
    assert_eq!(balance.available, Money::from_minor(10_000));
    assert_eq!(balance.reserved, Money::ZERO);
}

#[tokio::test]
async fn compensating_debit_without_reserve_reduces_available() {
    let store = InMemoryLedgerStore::default();
    store.append(credit(10_000, "conv-bad", 1)).await.unwrap();
    // Fraud reversal: debit against the conversion, not a withdrawal.
    store
        .append(LedgerEntry::new(
            affiliate(),
            EntryKind::Debit,
            Money::from_minor(10_000),
            ReferenceId::Conversion(ConversionId::from("conv-bad")),
            Timestamp(2),
        ))
        .await
        .unwrap();

    let balance = store.balance(&affiliate()).await.unwrap();
    assert_eq!(balance.available, Money::ZERO);
    assert_eq!(balance.reserved, Money::ZERO);
}

#[tokio::test]
async fn append_once_returns_existing_entry_on_replay() {
    let store = InMemoryLedgerStore::default();

    let first = store.append_once(credit(3_899, "conv-1", 5)).await.unwrap();
    let AppendOutcome::Appended(posted) = first else {
        panic!("first append must post");
    };

    let replay = store.append_once(credit(3_899, "conv-1", 9)).await.unwrap();
    assert_eq!(replay, AppendOutcome::Existing(posted));

    let entries = store.entries(&affiliate()).await.unwrap();
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn duplicate_entry_id_conflicts() {
    let store = InMemoryLedgerStore::default();
    let entry = credit(100, "conv-1", 1);
    store.append(entry.clone()).await.unwrap();
    let err = store.append(entry).await.expect_err("conflict");
    assert_eq!(err.code(), affilbase_errors::codes::STORAGE_CONFLICT);
}

#[tokio::test]
async fn non_positive_amounts_are_rejected() {
    let store = InMemoryLedgerStore::default();
    let err = store
        .append(credit(0, "conv-z", 1))
        .await
        .expect_err("zero amount");
    assert_eq!(err.code(), affilbase_errors::codes::SCHEMA_VALIDATION);
    let err = store
        .append(credit(-5, "conv-n", 1))
        .await
        .expect_err("negative amount");
    assert_eq!(err.code(), affilbase_errors::codes::SCHEMA_VALIDATION);
}

#[tokio::test]
async fn entries_order_by_created_at_then_id() {
    let store = InMemoryLedgerStore::default();
    let mut tied_a = credit(100, "conv-a", 7);
    tied_a.id = EntryId::from("entry-b");
    let mut tied_b = credit(100, "conv-b", 7);
    tied_b.id = EntryId::from("entry-a");
    let mut early = credit(100, "conv-c", 3);
    early.id = EntryId::from("entry-z");

    store.append(tied_a).await.unwrap();
    store.append(tied_b).await.unwrap();
    store.append(early).await.unwrap();

    let ids: Vec<String> = store
        .entries(&affiliate())
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.id.0)
        .collect();
    assert_eq!(ids, vec!["entry-z", "entry-a", "entry-b"]);
}

/// Fold-equivalence property: for a random append sequence, the store's
/// balance matches an independent recomputation of the same identity.
#[tokio::test]
async fn fold_matches_independent_recomputation() {
    let mut rng = rand::thread_rng();
    for round in 0..50 {
        let store = InMemoryLedgerStore::default();
        let mut entries: Vec<LedgerEntry> = Vec::new();
        let credits: u32 = rng.gen_range(1..6);
        for i in 0..credits {
            entries.push(credit(
                rng.gen_range(1_000..100_000),
                &format!("conv-{round}-{i}"),
                i as i64,
            ));
        }
        let reservations: u32 = rng.gen_range(0..3);
        for i in 0..reservations {
            let amount = rng.gen_range(100..2_000);
            let wd = format!("wd-{round}-{i}");
            entries.push(withdrawal_entry(EntryKind::Reserve, amount, &wd, 100 + i as i64));
            match rng.gen_range(0..3) {
                0 => entries.push(withdrawal_entry(EntryKind::Debit, amount, &wd, 200 + i as i64)),
                1 => entries.push(withdrawal_entry(EntryKind::Release, amount, &wd, 200 + i as i64)),
                _ => {} // still open
            }
        }
        entries.shuffle(&mut rng);
        for entry in &entries {
            store.append(entry.clone()).await.unwrap();
        }

        // Independent recomputation of the balance identity.
        let mut expected_credit = 0i64;
        let mut expected_debit = 0i64;
        let mut reserve_by_ref: std::collections::HashMap<ReferenceId, i64> = Default::default();
        let mut closed: std::collections::HashSet<ReferenceId> = Default::default();
        for entry in &entries {
            match entry.kind {
                EntryKind::Credit => expected_credit += entry.amount.minor(),
                EntryKind::Debit => {
                    expected_debit += entry.amount.minor();
                    closed.insert(entry.reference.clone());
                }
                EntryKind::Release => {
                    closed.insert(entry.reference.clone());
                }
                EntryKind::Reserve => {
                    *reserve_by_ref.entry(entry.reference.clone()).or_insert(0) +=
                        entry.amount.minor();
                }
            }
        }
        let open_reserved: i64 = reserve_by_ref
            .iter()
            .filter(|(reference, _)| !closed.contains(reference))
            .map(|(_, amount)| amount)
            .sum();

        let balance = store.balance(&affiliate()).await.unwrap();
        assert_eq!(
            balance.available.minor(),
            expected_credit - expected_debit - open_reserved,
            "round {round} diverged"
        );
        assert_eq!(balance.reserved.minor(), open_reserved);
    }
}
