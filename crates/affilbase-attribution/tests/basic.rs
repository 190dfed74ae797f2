use affilbase_attribution::prelude::*;
use affilbase_errors::codes;
use affilbase_types::prelude::*;
use async_trait::async_trait;

fn catalog_with_link(active: bool) -> StaticCatalog {
    let catalog = StaticCatalog::default();
    catalog.upsert_link(AffiliateLink {
        id: LinkId::from("lnk-1"),
        affiliate_id: AffiliateId::from("aff-1"),
        product_id: ProductId::from("prod-1"),
        created_at: Timestamp(0),
        active,
    });
    catalog.set_policy(
        ProductId::from("prod-1"),
        CommissionPolicy {
            rate_bp: 3_000,
            attribution_window_ms: 60_000,
        },
    );
    catalog
}

fn recorder(
    clicks: InMemoryClickStore,
    catalog: StaticCatalog,
) -> ClickRecorder<InMemoryClickStore, StaticCatalog> {
    ClickRecorder::new(clicks, catalog, 30_000, 500)
}

fn conversion(order: &str, fp: &str, gross_minor: i64, at: i64) -> ConversionEvent {
    ConversionEvent {
        id: ConversionId::new_random(),
        order_id: OrderId::from(order),
        product_id: ProductId::from("prod-1"),
        visitor_fingerprint: VisitorFingerprint::from(fp),
        gross_amount: Money::from_minor(gross_minor),
        at: Timestamp(at),
    }
}

#[tokio::test]
async fn reload_within_debounce_returns_original_click() {
    let clicks = InMemoryClickStore::default();
    let recorder = recorder(clicks, catalog_with_link(true));

    let first = recorder
        .record(&LinkId::from("lnk-1"), VisitorFingerprint::from("fp-1"), Timestamp(1_000))
        .await
        .unwrap();
    let reload = recorder
        .record(&LinkId::from("lnk-1"), VisitorFingerprint::from("fp-1"), Timestamp(25_000))
        .await
        .unwrap();
    assert_eq!(reload.id, first.id);

    // A different visitor is never debounced against fp-1.
    let other = recorder
        .record(&LinkId::from("lnk-1"), VisitorFingerprint::from("fp-2"), Timestamp(2_000))
        .await
        .unwrap();
    assert_ne!(other.id, first.id);

    // Past the debounce interval a fresh click is recorded.
    let later = recorder
        .record(&LinkId::from("lnk-1"), VisitorFingerprint::from("fp-1"), Timestamp(31_001))
        .await
        .unwrap();
    assert_ne!(later.id, first.id);
}

#[tokio::test]
async fn inactive_or_unknown_link_is_rejected() {
    let recorder = recorder(InMemoryClickStore::default(), catalog_with_link(false));
    let err = recorder
        .record(&LinkId::from("lnk-1"), VisitorFingerprint::from("fp-1"), Timestamp(1))
        .await
        .expect_err("inactive link");
    assert_eq!(err.code(), codes::LINK_INACTIVE);

    let err = recorder
        .record(&LinkId::from("lnk-missing"), VisitorFingerprint::from("fp-1"), Timestamp(1))
        .await
        .expect_err("unknown link");
    assert_eq!(err.code(), codes::LINK_INACTIVE);
}

#[tokio::test]
async fn compaction_drops_expired_clicks() {
    let clicks = InMemoryClickStore::default();
    let recorder = recorder(clicks.clone(), catalog_with_link(true));
    recorder
        .record(&LinkId::from("lnk-1"), VisitorFingerprint::from("fp-old"), Timestamp(1_000))
        .await
        .unwrap();
    recorder
        .record(&LinkId::from("lnk-1"), VisitorFingerprint::from("fp-new"), Timestamp(500_000))
        .await
        .unwrap();

    let removed = recorder.compact(Timestamp(600_000), 200_000).await.unwrap();
    assert_eq!(removed, 1);
    assert_eq!(clicks.count_for_link(&LinkId::from("lnk-1")).await.unwrap(), 1);
}

fn resolver(
    clicks: InMemoryClickStore,
    conversions: InMemoryConversionStore,
    attributions: InMemoryAttributionStore,
    catalog: StaticCatalog,
) -> Resolver<InMemoryClickStore, InMemoryConversionStore, InMemoryAttributionStore, StaticCatalog>
{
    Resolver::new(clicks, conversions, attributions, catalog, 500)
}

// Debounce off so closely spaced clicks stay distinct events.
fn recorder_nodebounce(
    clicks: InMemoryClickStore,
    catalog: StaticCatalog,
) -> ClickRecorder<InMemoryClickStore, StaticCatalog> {
    ClickRecorder::new(clicks, catalog, 0, 500)
}

#[tokio::test]
async fn last_click_wins_and_window_is_half_open() {
    let clicks = InMemoryClickStore::default();
    let catalog = catalog_with_link(true);
    let recorder = recorder_nodebounce(clicks.clone(), catalog.clone());

    // Window is 60s; conversion at t=100_000, so [40_000, 100_000).
    recorder
        .record(&LinkId::from("lnk-1"), VisitorFingerprint::from("fp-1"), Timestamp(39_999))
        .await
        .unwrap(); // outside: too old
    let t = recorder
        .record(&LinkId::from("lnk-1"), VisitorFingerprint::from("fp-1"), Timestamp(80_000))
        .await
        .unwrap();
    let t5 = recorder
        .record(&LinkId::from("lnk-1"), VisitorFingerprint::from("fp-1"), Timestamp(85_000))
        .await
        .unwrap();
    assert_ne!(t.id, t5.id);

    let resolver = resolver(
        clicks,
        InMemoryConversionStore::default(),
        InMemoryAttributionStore::default(),
        catalog,
    );
    let conv = resolver
        .ingest(conversion("order-1", "fp-1", 12_999, 100_000))
        .await
        .unwrap();
    let attribution = resolver.resolve(&conv.id, Timestamp(100_001)).await.unwrap();
    assert_eq!(attribution.click_id, Some(t5.id));
    assert_eq!(attribution.affiliate_id, Some(AffiliateId::from("aff-1")));
}

#[tokio::test]
async fn no_eligible_click_is_terminal_not_an_error() {
    let resolver = resolver(
        InMemoryClickStore::default(),
        InMemoryConversionStore::default(),
        InMemoryAttributionStore::default(),
        catalog_with_link(true),
    );
    let conv = resolver
        .ingest(conversion("order-1", "fp-none", 12_999, 100_000))
        .await
        .unwrap();
    let attribution = resolver.resolve(&conv.id, Timestamp(100_001)).await.unwrap();
    assert!(!attribution.is_attributed());
    assert_eq!(attribution.click_id, None);
}

#[tokio::test]
async fn resolve_is_idempotent_across_retries() {
    let clicks = InMemoryClickStore::default();
    let catalog = catalog_with_link(true);
    let recorder = recorder_nodebounce(clicks.clone(), catalog.clone());
    recorder
        .record(&LinkId::from("lnk-1"), VisitorFingerprint::from("fp-1"), Timestamp(90_000))
        .await
        .unwrap();

    let resolver = resolver(
        clicks.clone(),
        InMemoryConversionStore::default(),
        InMemoryAttributionStore::default(),
        catalog,
    );
    let conv = resolver
        .ingest(conversion("order-1", "fp-1", 12_999, 100_000))
        .await
        .unwrap();
    let first = resolver.resolve(&conv.id, Timestamp(100_001)).await.unwrap();

    // A later click landing before the retry must not change the outcome.
    recorder
        .record(&LinkId::from("lnk-1"), VisitorFingerprint::from("fp-1"), Timestamp(99_000))
        .await
        .unwrap();
    let replay = resolver.resolve(&conv.id, Timestamp(200_000)).await.unwrap();
    assert_eq!(replay, first);
}

#[tokio::test]
async fn duplicate_order_ingest_is_a_no_op() {
    let resolver = resolver(
        InMemoryClickStore::default(),
        InMemoryConversionStore::default(),
        InMemoryAttributionStore::default(),
        catalog_with_link(true),
    );
    let first = resolver
        .ingest(conversion("order-1", "fp-1", 12_999, 100_000))
        .await
        .unwrap();
    let retry = resolver
        .ingest(conversion("order-1", "fp-1", 12_999, 100_500))
        .await
        .unwrap();
    assert_eq!(retry.id, first.id);

    let err = resolver
        .ingest(conversion("order-2", "fp-1", -1, 100_000))
        .await
        .expect_err("negative gross");
    assert_eq!(err.code(), codes::SCHEMA_VALIDATION);
}

struct StalledCatalog;

#[async_trait]
impl Catalog for StalledCatalog {
    async fn commission_policy(
        &self,
        _product_id: &ProductId,
    ) -> Result<CommissionPolicy, AttributionError> {
        tokio::time::sleep(std::time::Duration::from_secs(30)).await;
        Ok(CommissionPolicy::default())
    }

    async fn link(&self, _link_id: &LinkId) -> Result<Option<AffiliateLink>, AttributionError> {
        tokio::time::sleep(std::time::Duration::from_secs(30)).await;
        Ok(None)
    }

    async fn links_for(
        &self,
        _affiliate: &AffiliateId,
    ) -> Result<Vec<AffiliateLink>, AttributionError> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn stalled_catalog_surfaces_transient_timeout() {
    let recorder = ClickRecorder::new(InMemoryClickStore::default(), StalledCatalog, 30_000, 50);
    let err = recorder
        .record(&LinkId::from("lnk-1"), VisitorFingerprint::from("fp-1"), Timestamp(1))
        .await
        .expect_err("timeout");
    assert_eq!(err.code(), codes::PROVIDER_TIMEOUT);
    assert!(err.0.retry().is_retryable());
}
