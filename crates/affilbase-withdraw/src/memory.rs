use crate::errors::WithdrawError;
use crate::model::{DispatchState, WithdrawalRequest, WithdrawalStatus};
use crate::store::WithdrawalStore;
use affilbase_types::prelude::*;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default, Clone)]
pub struct InMemoryWithdrawalStore {
    inner: Arc<RwLock<HashMap<WithdrawalId, WithdrawalRequest>>>,
}

#[async_trait]
impl WithdrawalStore for InMemoryWithdrawalStore {
    async fn create(&self, request: WithdrawalRequest) -> Result<(), WithdrawError> {
        let mut guard = self.inner.write();
        if guard.contains_key(&request.id) {
            return Err(WithdrawError::internal(&format!(
                "withdrawal {} already exists",
                request.id
            )));
        }
        guard.insert(request.id.clone(), request);
        Ok(())
    }

    async fn get(&self, id: &WithdrawalId) -> Result<Option<WithdrawalRequest>, WithdrawError> {
        Ok(self.inner.read().get(id).cloned())
    }

    async fn update(&self, request: WithdrawalRequest) -> Result<(), WithdrawError> {
        let mut guard = self.inner.write();
        if !guard.contains_key(&request.id) {
            return Err(WithdrawError::not_found(&format!(
                "withdrawal {} not found",
                request.id
            )));
        }
        guard.insert(request.id.clone(), request);
        Ok(())
    }

    async fn list_for_affiliate(
        &self,
        affiliate: &AffiliateId,
    ) -> Result<Vec<WithdrawalRequest>, WithdrawError> {
        let guard = self.inner.read();
        let mut requests: Vec<WithdrawalRequest> = guard
            .values()
            .filter(|r| r.affiliate_id == *affiliate)
            .cloned()
            .collect();
        requests.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(requests)
    }

    async fn lease_dispatchable(
        &self,
        now_ms: i64,
        worker: &str,
        batch: usize,
        lease_ms: i64,
    ) -> Result<Vec<WithdrawalRequest>, WithdrawError> {
        let mut guard = self.inner.write();
        let mut leased = Vec::new();
        for request in guard.values_mut() {
            if request.status != WithdrawalStatus::Reserved {
                continue;
            }
            let ready = match &request.dispatch {
                Some(DispatchState::Pending { visible_at }) => *visible_at <= now_ms,
                Some(DispatchState::Leased { lease_until, .. }) => *lease_until <= now_ms,
                _ => false,
            };
            if ready {
                request.dispatch = Some(DispatchState::Leased {
                    worker: worker.to_string(),
                    lease_until: now_ms + lease_ms,
                });
                request.attempts += 1;
                leased.push(request.clone());
                if leased.len() >= batch {
                    break;
                }
            }
        }
        Ok(leased)
    }

    async fn mark_initiated(&self, id: &WithdrawalId) -> Result<(), WithdrawError> {
        let mut guard = self.inner.write();
        let request = guard
            .get_mut(id)
            .ok_or_else(|| WithdrawError::not_found(&format!("withdrawal {id} not found")))?;
        request.dispatch = Some(DispatchState::Initiated);
        request.last_error = None;
        Ok(())
    }

    async fn retry_dispatch(
        &self,
        id: &WithdrawalId,
        error: &str,
        next_visible_at: i64,
    ) -> Result<(), WithdrawError> {
        let mut guard = self.inner.write();
        let request = guard
            .get_mut(id)
            .ok_or_else(|| WithdrawError::not_found(&format!("withdrawal {id} not found")))?;
        request.dispatch = Some(DispatchState::Pending {
            visible_at: next_visible_at,
        });
        request.last_error = Some(error.to_string());
        Ok(())
    }
}
