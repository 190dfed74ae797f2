use crate::errors::WithdrawError;
use crate::model::WithdrawalRequest;
use affilbase_types::prelude::*;
use async_trait::async_trait;

#[async_trait]
pub trait WithdrawalStore: Send + Sync {
    async fn create(&self, request: WithdrawalRequest) -> Result<(), WithdrawError>;

    async fn get(&self, id: &WithdrawalId) -> Result<Option<WithdrawalRequest>, WithdrawError>;

    /// Persists a transitioned request. The coordinator is the only caller;
    /// it mutates requests exclusively under the per-affiliate lock.
    async fn update(&self, request: WithdrawalRequest) -> Result<(), WithdrawError>;

    /// Newest first, the order the dashboard history table shows.
    async fn list_for_affiliate(
        &self,
        affiliate: &AffiliateId,
    ) -> Result<Vec<WithdrawalRequest>, WithdrawError>;

    /// Leases Reserved requests whose payout initiation is due: dispatch
    /// Pending with `visible_at <= now`, or a Leased lease that expired.
    /// Increments attempts, the at-least-once accounting the dispatcher
    /// retries against.
    async fn lease_dispatchable(
        &self,
        now_ms: i64,
        worker: &str,
        batch: usize,
        lease_ms: i64,
    ) -> Result<Vec<WithdrawalRequest>, WithdrawError>;

    /// Transport accepted the transfer; stop dispatching and wait for the
    /// settle/fail callback.
    async fn mark_initiated(&self, id: &WithdrawalId) -> Result<(), WithdrawError>;

    /// Transport failed transiently; make the request visible again at
    /// `next_visible_at`.
    async fn retry_dispatch(
        &self,
        id: &WithdrawalId,
        error: &str,
        next_visible_at: i64,
    ) -> Result<(), WithdrawError>;
}
