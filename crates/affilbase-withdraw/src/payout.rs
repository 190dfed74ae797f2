use crate::backoff::Backoff;
use crate::coordinator::Coordinator;
use crate::errors::WithdrawError;
use crate::model::WithdrawalRequest;
use crate::store::WithdrawalStore;
use affilbase_ledger::store::LedgerStore;
use affilbase_types::prelude::Timestamp;
use async_trait::async_trait;

/// Boundary to the external payout collaborator. `initiate` asks it to move
/// the money; the collaborator later calls back `Coordinator::settle` or
/// `Coordinator::fail` with the transfer outcome.
#[async_trait]
pub trait PayoutTransport: Send + Sync {
    async fn initiate(&self, request: &WithdrawalRequest) -> Result<(), WithdrawError>;
}

/// Polls Reserved withdrawals and pushes them at the payout transport with
/// leases and jittered retries. Exhausted attempts fail the withdrawal,
/// which releases its reservation.
pub struct PayoutDispatcher<T, W, L, B>
where
    T: PayoutTransport,
    W: WithdrawalStore,
    L: LedgerStore,
    B: Backoff,
{
    pub transport: T,
    pub coordinator: Coordinator<W, L>,
    pub worker_id: String,
    pub max_attempts: u32,
    pub lease_ms: i64,
    pub batch: usize,
    pub backoff: B,
}

impl<T, W, L, B> PayoutDispatcher<T, W, L, B>
where
    T: PayoutTransport,
    W: WithdrawalStore,
    L: LedgerStore,
    B: Backoff,
{
    pub async fn tick(&self, now_ms: i64) -> Result<(), WithdrawError> {
        let due = self
            .coordinator
            .withdrawals
            .lease_dispatchable(now_ms, &self.worker_id, self.batch, self.lease_ms)
            .await?;

        for request in due {
            let attempts = request.attempts;
            match self.transport.initiate(&request).await {
                Ok(()) => {
                    self.coordinator
                        .withdrawals
                        .mark_initiated(&request.id)
                        .await?;
                }
                Err(err) => {
                    let err_obj = err.into_inner();
                    let err_msg = err_obj
                        .message_dev
                        .clone()
                        .unwrap_or_else(|| err_obj.message_user.clone());
                    let max = self.max_attempts.min(self.backoff.max_attempts());
                    let retryable = err_obj.retry().is_retryable();
                    if !retryable || attempts >= max {
                        self.coordinator
                            .fail(&request.id, &err_msg, Timestamp(now_ms))
                            .await?;
                    } else {
                        let delay = self.backoff.next_delay_ms(attempts);
                        tracing::debug!(
                            target = "affilbase::withdraw",
                            withdrawal = %request.id,
                            attempts,
                            delay_ms = delay,
                            "payout initiation retry scheduled"
                        );
                        self.coordinator
                            .withdrawals
                            .retry_dispatch(&request.id, &err_msg, now_ms + delay)
                            .await?;
                    }
                }
            }
        }
        Ok(())
    }
}
