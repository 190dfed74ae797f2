use affilbase_attribution::prelude::*;
use affilbase_errors::codes;
use affilbase_gateway::prelude::*;
use affilbase_types::prelude::*;
use affilbase_withdraw::prelude::*;

fn catalog() -> StaticCatalog {
    let catalog = StaticCatalog::default();
    for (link, product) in [("lnk-course", "prod-course"), ("lnk-ebook", "prod-ebook")] {
        catalog.upsert_link(AffiliateLink {
            id: LinkId::from(link),
            affiliate_id: AffiliateId::from("aff-1"),
            product_id: ProductId::from(product),
            created_at: Timestamp(0),
            active: true,
        });
        catalog.set_policy(
            ProductId::from(product),
            CommissionPolicy {
                rate_bp: 3_000,
                attribution_window_ms: 60_000,
            },
        );
    }
    catalog
}

fn hub() -> AffiliateHub<StaticCatalog> {
    AffiliateHub::new(catalog(), GatewayConfig::default())
}

fn conversion(order: &str, product: &str, fp: &str, gross: i64, at: i64) -> ConversionEvent {
    ConversionEvent {
        id: ConversionId::new_random(),
        order_id: OrderId::from(order),
        product_id: ProductId::from(product),
        visitor_fingerprint: VisitorFingerprint::from(fp),
        gross_amount: Money::from_minor(gross),
        at: Timestamp(at),
    }
}

#[tokio::test]
async fn link_overviews_carry_clicks_conversions_earnings() {
    let hub = hub();
    let affiliate = AffiliateId::from("aff-1");

    for fp in ["fp-a", "fp-b", "fp-c"] {
        hub.record_click(&LinkId::from("lnk-course"), VisitorFingerprint::from(fp), Timestamp(10_000))
            .await
            .unwrap();
    }
    hub.ingest_conversion(
        conversion("order-1", "prod-course", "fp-a", 9_999, 50_000),
        Timestamp(50_001),
    )
    .await
    .unwrap();
    hub.ingest_conversion(
        conversion("order-2", "prod-course", "fp-b", 19_999, 55_000),
        Timestamp(55_001),
    )
    .await
    .unwrap();

    let links = hub.list_links(&affiliate).await.unwrap();
    assert_eq!(links.len(), 2);

    let course = links
        .iter()
        .find(|o| o.link.id == LinkId::from("lnk-course"))
        .unwrap();
    assert_eq!(course.clicks, 3);
    assert_eq!(course.conversions, 2);
    // 30% of 99.99 floors to 29.99, of 199.99 to 59.99
    assert_eq!(course.earnings, Money::from_minor(2_999 + 5_999));

    let ebook = links
        .iter()
        .find(|o| o.link.id == LinkId::from("lnk-ebook"))
        .unwrap();
    assert_eq!(ebook.clicks, 0);
    assert_eq!(ebook.conversions, 0);
    assert_eq!(ebook.earnings, Money::ZERO);

    let balance = hub.get_balance(&affiliate).await.unwrap();
    assert_eq!(balance.lifetime_earned, Money::from_minor(8_998));
    assert_eq!(balance.available, Money::from_minor(8_998));
}

#[tokio::test]
async fn withdrawal_history_is_newest_first() {
    let hub = hub();
    let affiliate = AffiliateId::from("aff-1");
    hub.record_click(&LinkId::from("lnk-course"), VisitorFingerprint::from("fp-a"), Timestamp(10_000))
        .await
        .unwrap();
    hub.ingest_conversion(
        conversion("order-1", "prod-course", "fp-a", 500_000, 50_000),
        Timestamp(50_001),
    )
    .await
    .unwrap();

    let first = hub
        .create_withdrawal(
            affiliate.clone(),
            Money::from_minor(50_000),
            PayoutMethod::Upi { vpa: "creator@upi".into() },
            Timestamp(60_000),
        )
        .await
        .unwrap();
    let second = hub
        .create_withdrawal(
            affiliate.clone(),
            Money::from_minor(30_000),
            PayoutMethod::BankTransfer {
                bank_name: "First Bank".into(),
                account_number: "0012345678".into(),
                ifsc: "FRST0000123".into(),
                account_name: "Creator".into(),
            },
            Timestamp(70_000),
        )
        .await
        .unwrap();

    let history = hub.list_withdrawals(&affiliate).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, second.id);
    assert_eq!(history[1].id, first.id);
    assert!(history.iter().all(|r| r.status == WithdrawalStatus::Reserved));
}

#[tokio::test]
async fn refused_withdrawal_stays_requested_and_cancellable() {
    let hub = hub();
    let affiliate = AffiliateId::from("aff-1");

    let err = hub
        .create_withdrawal(
            affiliate.clone(),
            Money::from_minor(10_000),
            PayoutMethod::Upi { vpa: "creator@upi".into() },
            Timestamp(1_000),
        )
        .await
        .expect_err("no funds at all");
    assert_eq!(err.code(), codes::LEDGER_INSUFFICIENT_FUNDS);
    assert!(!err.retry().is_retryable()); // user-correctable, not transient

    let history = hub.list_withdrawals(&affiliate).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, WithdrawalStatus::Requested);

    let cancelled = hub.cancel_withdrawal(&history[0].id).await.unwrap();
    assert_eq!(cancelled.status, WithdrawalStatus::Cancelled);

    // Cancellation never touched the ledger.
    let balance = hub.get_balance(&affiliate).await.unwrap();
    assert_eq!(balance, Default::default());
}

#[tokio::test]
async fn click_compaction_respects_retention_config() {
    let config = GatewayConfig::from_overrides(serde_json::json!({
        "click_retention_ms": 100_000
    }))
    .unwrap();
    let hub = AffiliateHub::new(catalog(), config);

    hub.record_click(&LinkId::from("lnk-course"), VisitorFingerprint::from("fp-a"), Timestamp(10_000))
        .await
        .unwrap();
    hub.record_click(&LinkId::from("lnk-course"), VisitorFingerprint::from("fp-b"), Timestamp(190_000))
        .await
        .unwrap();

    let removed = hub.compact_clicks(Timestamp(200_000)).await.unwrap();
    assert_eq!(removed, 1);

    let links = hub.list_links(&AffiliateId::from("aff-1")).await.unwrap();
    let course = links
        .iter()
        .find(|o| o.link.id == LinkId::from("lnk-course"))
        .unwrap();
    assert_eq!(course.clicks, 1);
}
