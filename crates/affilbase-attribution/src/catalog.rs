use crate::errors::AttributionError;
use crate::model::{AffiliateLink, CommissionPolicy};
use affilbase_types::prelude::*;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Read-only reference data owned by the catalog collaborator.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn commission_policy(
        &self,
        product_id: &ProductId,
    ) -> Result<CommissionPolicy, AttributionError>;

    async fn link(&self, link_id: &LinkId) -> Result<Option<AffiliateLink>, AttributionError>;

    async fn is_link_active(&self, link_id: &LinkId) -> Result<bool, AttributionError> {
        Ok(self.link(link_id).await?.map(|l| l.active).unwrap_or(false))
    }

    async fn links_for(
        &self,
        affiliate: &AffiliateId,
    ) -> Result<Vec<AffiliateLink>, AttributionError>;
}

/// Bounds a catalog call so a stalled collaborator cannot hold a caller (or
/// a per-affiliate lock) indefinitely. Elapsed deadline maps to a transient
/// timeout error.
pub async fn bounded<T, F>(timeout_ms: u64, what: &str, fut: F) -> Result<T, AttributionError>
where
    F: Future<Output = Result<T, AttributionError>>,
{
    match tokio::time::timeout(Duration::from_millis(timeout_ms), fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(target = "affilbase::catalog", call = what, timeout_ms, "catalog call timed out");
            Err(AttributionError::timeout(&format!(
                "{what} exceeded {timeout_ms}ms"
            )))
        }
    }
}

#[derive(Default)]
struct StaticCatalogInner {
    links: HashMap<LinkId, AffiliateLink>,
    policies: HashMap<ProductId, CommissionPolicy>,
}

/// In-process catalog used by tests and single-node deployments; a remote
/// catalog client implements the same trait.
#[derive(Default, Clone)]
pub struct StaticCatalog {
    inner: Arc<RwLock<StaticCatalogInner>>,
    default_policy: CommissionPolicy,
}

impl StaticCatalog {
    pub fn with_default_policy(default_policy: CommissionPolicy) -> Self {
        Self {
            inner: Default::default(),
            default_policy,
        }
    }

    pub fn upsert_link(&self, link: AffiliateLink) {
        self.inner.write().links.insert(link.id.clone(), link);
    }

    pub fn set_policy(&self, product_id: ProductId, policy: CommissionPolicy) {
        self.inner.write().policies.insert(product_id, policy);
    }

    pub fn deactivate_link(&self, link_id: &LinkId) {
        if let Some(link) = self.inner.write().links.get_mut(link_id) {
            link.active = false;
        }
    }
}

#[async_trait]
impl Catalog for StaticCatalog {
    async fn commission_policy(
        &self,
        product_id: &ProductId,
    ) -> Result<CommissionPolicy, AttributionError> {
        Ok(self
            .inner
            .read()
            .policies
            .get(product_id)
            .copied()
            .unwrap_or(self.default_policy))
    }

    async fn link(&self, link_id: &LinkId) -> Result<Option<AffiliateLink>, AttributionError> {
        Ok(self.inner.read().links.get(link_id).cloned())
    }

    async fn links_for(
        &self,
        affiliate: &AffiliateId,
    ) -> Result<Vec<AffiliateLink>, AttributionError> {
        let mut links: Vec<AffiliateLink> = self
            .inner
            .read()
            .links
            .values()
            .filter(|l| l.affiliate_id == *affiliate)
            .cloned()
            .collect();
        links.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(links)
    }
}
