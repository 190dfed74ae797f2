use crate::config::GatewayConfig;
use crate::errors::GatewayError;
use affilbase_attribution::catalog::Catalog;
use affilbase_attribution::memory::{
    InMemoryAttributionStore, InMemoryClickStore, InMemoryConversionStore,
};
use affilbase_attribution::model::{AffiliateLink, Attribution, ClickEvent, ConversionEvent};
use affilbase_attribution::recorder::ClickRecorder;
use affilbase_attribution::resolver::Resolver;
use affilbase_attribution::store::{AttributionStore, ClickStore, ConversionStore};
use affilbase_commission::engine::{CommissionEngine, Posting};
use affilbase_ledger::memory::InMemoryLedgerStore;
use affilbase_ledger::model::{Balance, EntryKind, ReferenceId};
use affilbase_ledger::store::LedgerStore;
use affilbase_types::prelude::*;
use affilbase_withdraw::coordinator::Coordinator;
use affilbase_withdraw::memory::InMemoryWithdrawalStore;
use affilbase_withdraw::model::{PayoutMethod, WithdrawalRequest};
use affilbase_withdraw::store::WithdrawalStore;
use serde::{Deserialize, Serialize};

/// Per-link aggregates behind the dashboard's "Your Affiliate Links" cards:
/// clicks, conversions, earnings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkOverview {
    pub link: AffiliateLink,
    pub clicks: u64,
    pub conversions: u64,
    pub earnings: Money,
}

/// Single-node composition of the whole funnel over the in-memory store
/// tier. The read-only query surface is what the presentation layer binds
/// to instead of mock state; the ingest entry points serve the click and
/// checkout collaborators.
pub struct AffiliateHub<C> {
    catalog: C,
    clicks: InMemoryClickStore,
    conversions: InMemoryConversionStore,
    attributions: InMemoryAttributionStore,
    ledger: InMemoryLedgerStore,
    recorder: ClickRecorder<InMemoryClickStore, C>,
    resolver: Resolver<InMemoryClickStore, InMemoryConversionStore, InMemoryAttributionStore, C>,
    engine: CommissionEngine<InMemoryLedgerStore, C>,
    coordinator: Coordinator<InMemoryWithdrawalStore, InMemoryLedgerStore>,
    config: GatewayConfig,
}

impl<C> AffiliateHub<C>
where
    C: Catalog + Clone,
{
    pub fn new(catalog: C, config: GatewayConfig) -> Self {
        let clicks = InMemoryClickStore::default();
        let conversions = InMemoryConversionStore::default();
        let attributions = InMemoryAttributionStore::default();
        let ledger = InMemoryLedgerStore::default();
        let withdrawals = InMemoryWithdrawalStore::default();

        let recorder = ClickRecorder::new(
            clicks.clone(),
            catalog.clone(),
            config.debounce_ms,
            config.catalog_timeout_ms,
        );
        let resolver = Resolver::new(
            clicks.clone(),
            conversions.clone(),
            attributions.clone(),
            catalog.clone(),
            config.catalog_timeout_ms,
        );
        let engine = CommissionEngine::new(ledger.clone(), catalog.clone(), config.catalog_timeout_ms);
        let coordinator = Coordinator::new(withdrawals, ledger.clone());

        Self {
            catalog,
            clicks,
            conversions,
            attributions,
            ledger,
            recorder,
            resolver,
            engine,
            coordinator,
            config,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Coordinator handle for the payout collaborator's settle/fail
    /// callbacks and for wiring a `PayoutDispatcher`.
    pub fn coordinator(&self) -> &Coordinator<InMemoryWithdrawalStore, InMemoryLedgerStore> {
        &self.coordinator
    }

    pub fn ledger(&self) -> &InMemoryLedgerStore {
        &self.ledger
    }

    // ---- ingest side ----

    pub async fn record_click(
        &self,
        link_id: &LinkId,
        fingerprint: VisitorFingerprint,
        at: Timestamp,
    ) -> Result<ClickEvent, GatewayError> {
        Ok(self.recorder.record(link_id, fingerprint, at).await?)
    }

    /// Checkout webhook entry point: ingest (deduped by order id), resolve
    /// (idempotent), post commission (exactly once). Safe to call any
    /// number of times for the same order.
    pub async fn ingest_conversion(
        &self,
        conversion: ConversionEvent,
        now: Timestamp,
    ) -> Result<(Attribution, Posting), GatewayError> {
        let stored = self.resolver.ingest(conversion).await?;
        let attribution = self.resolver.resolve(&stored.id, now).await?;
        let posting = self.engine.post(&attribution, &stored, now).await?;
        tracing::debug!(
            target = "affilbase::gateway",
            conversion = %stored.id,
            attributed = attribution.click_id.is_some(),
            "conversion processed"
        );
        Ok((attribution, posting))
    }

    pub async fn compact_clicks(&self, now: Timestamp) -> Result<usize, GatewayError> {
        Ok(self
            .recorder
            .compact(now, self.config.click_retention_ms)
            .await?)
    }

    // ---- dashboard query surface ----

    pub async fn get_balance(&self, affiliate: &AffiliateId) -> Result<Balance, GatewayError> {
        Ok(self.ledger.balance(affiliate).await?)
    }

    pub async fn list_links(
        &self,
        affiliate: &AffiliateId,
    ) -> Result<Vec<LinkOverview>, GatewayError> {
        let links = self.catalog.links_for(affiliate).await?;
        let attributions = self.attributions.list_for_affiliate(affiliate).await?;

        let mut overviews = Vec::with_capacity(links.len());
        for link in links {
            let clicks = self.clicks.count_for_link(&link.id).await?;
            let mut conversions = 0u64;
            let mut earnings = Money::ZERO;
            for attribution in attributions.iter().filter(|a| a.link_id.as_ref() == Some(&link.id)) {
                conversions += 1;
                let credited = self
                    .ledger
                    .find_reference(
                        EntryKind::Credit,
                        &ReferenceId::Conversion(attribution.conversion_id.clone()),
                    )
                    .await?;
                if let Some(entry) = credited {
                    earnings = earnings.saturating_add(entry.amount);
                }
            }
            overviews.push(LinkOverview {
                link,
                clicks,
                conversions,
                earnings,
            });
        }
        Ok(overviews)
    }

    pub async fn list_withdrawals(
        &self,
        affiliate: &AffiliateId,
    ) -> Result<Vec<WithdrawalRequest>, GatewayError> {
        Ok(self.coordinator.withdrawals.list_for_affiliate(affiliate).await?)
    }

    /// The "Withdraw Funds" dialog action: creates the request and attempts
    /// the reservation. On `InsufficientBalance` the error propagates and
    /// the request stays Requested, visible in the history where it can be
    /// retried or cancelled.
    pub async fn create_withdrawal(
        &self,
        affiliate: AffiliateId,
        amount: Money,
        method: PayoutMethod,
        now: Timestamp,
    ) -> Result<WithdrawalRequest, GatewayError> {
        let request = self.coordinator.request(affiliate, amount, method, now).await?;
        Ok(self.coordinator.reserve(&request.id, now).await?)
    }

    pub async fn cancel_withdrawal(
        &self,
        id: &WithdrawalId,
    ) -> Result<WithdrawalRequest, GatewayError> {
        Ok(self.coordinator.cancel(id).await?)
    }

    /// Replayed conversion lookups for audit views.
    pub async fn conversion(
        &self,
        id: &ConversionId,
    ) -> Result<Option<ConversionEvent>, GatewayError> {
        Ok(self.conversions.get(id).await?)
    }

    pub async fn attribution(
        &self,
        conversion: &ConversionId,
    ) -> Result<Option<Attribution>, GatewayError> {
        Ok(self.attributions.get(conversion).await?)
    }
}
