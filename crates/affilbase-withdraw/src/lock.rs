use affilbase_types::prelude::AffiliateId;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;

/// Single-writer scope keyed by affiliate id: the balance check and the
/// Reserve append for one affiliate never interleave. A database tier would
/// replace this with row locks behind the same coordinator API.
#[derive(Default, Clone)]
pub struct LockTable {
    inner: Arc<Mutex<HashMap<AffiliateId, Arc<AsyncMutex<()>>>>>,
}

impl LockTable {
    pub fn for_affiliate(&self, affiliate: &AffiliateId) -> Arc<AsyncMutex<()>> {
        let mut guard = self.inner.lock();
        guard
            .entry(affiliate.clone())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }
}
