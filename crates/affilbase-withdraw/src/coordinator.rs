use crate::errors::WithdrawError;
use crate::lock::LockTable;
use crate::model::{DispatchState, PayoutMethod, WithdrawalRequest, WithdrawalStatus};
use crate::store::WithdrawalStore;
use affilbase_ledger::model::{EntryKind, LedgerEntry, ReferenceId};
use affilbase_ledger::store::LedgerStore;
use affilbase_types::prelude::*;

/// Drives the withdrawal state machine:
/// Requested -> Reserved -> Settled | Failed, or Requested -> Cancelled.
/// Reservation is the only step that races with itself, so it alone runs
/// inside the per-affiliate lock.
#[derive(Clone)]
pub struct Coordinator<W, L> {
    pub withdrawals: W,
    pub ledger: L,
    locks: LockTable,
}

impl<W, L> Coordinator<W, L>
where
    W: WithdrawalStore,
    L: LedgerStore,
{
    pub fn new(withdrawals: W, ledger: L) -> Self {
        Self {
            withdrawals,
            ledger,
            locks: LockTable::default(),
        }
    }

    pub async fn request(
        &self,
        affiliate_id: AffiliateId,
        amount: Money,
        method: PayoutMethod,
        now: Timestamp,
    ) -> Result<WithdrawalRequest, WithdrawError> {
        if amount.is_negative() || amount.is_zero() {
            return Err(WithdrawError::invalid(&format!(
                "withdrawal amount must be positive, got {amount}"
            )));
        }
        method.validate().map_err(|msg| WithdrawError::invalid(&msg))?;

        let request = WithdrawalRequest::new(affiliate_id, amount, method, now);
        self.withdrawals.create(request.clone()).await?;
        Ok(request)
    }

    /// Requested -> Reserved. The balance check, the Reserve append, and the
    /// status flip happen under the affiliate's lock so two concurrent
    /// requests cannot both pass the check against the same balance. On
    /// `InsufficientBalance` the request stays Requested.
    pub async fn reserve(
        &self,
        id: &WithdrawalId,
        now: Timestamp,
    ) -> Result<WithdrawalRequest, WithdrawError> {
        let mut request = self.load(id).await?;
        let lock = self.locks.for_affiliate(&request.affiliate_id);
        let _guard = lock.lock().await;

        // Re-read under the lock; another task may have transitioned it.
        request = self.load(id).await?;
        if request.status != WithdrawalStatus::Requested {
            return Err(WithdrawError::invalid_transition(
                request.status.as_str(),
                "reserved",
            ));
        }

        let balance = self.ledger.balance(&request.affiliate_id).await?;
        if request.amount > balance.available {
            tracing::debug!(
                target = "affilbase::withdraw",
                withdrawal = %request.id,
                available = %balance.available,
                requested = %request.amount,
                "reservation refused"
            );
            return Err(WithdrawError::insufficient(balance.available, request.amount));
        }

        self.ledger
            .append_once(LedgerEntry::new(
                request.affiliate_id.clone(),
                EntryKind::Reserve,
                request.amount,
                ReferenceId::Withdrawal(request.id.clone()),
                now,
            ))
            .await?;

        request.status = WithdrawalStatus::Reserved;
        request.dispatch = Some(DispatchState::Pending { visible_at: now.0 });
        self.withdrawals.update(request.clone()).await?;
        Ok(request)
    }

    /// Reserved -> Settled, on the payout collaborator's confirmation.
    /// Appends the Debit that finalizes the balance reduction.
    pub async fn settle(
        &self,
        id: &WithdrawalId,
        now: Timestamp,
    ) -> Result<WithdrawalRequest, WithdrawError> {
        let mut request = self.load(id).await?;
        if request.status != WithdrawalStatus::Reserved {
            return Err(WithdrawError::invalid_transition(
                request.status.as_str(),
                "settled",
            ));
        }

        self.ledger
            .append_once(LedgerEntry::new(
                request.affiliate_id.clone(),
                EntryKind::Debit,
                request.amount,
                ReferenceId::Withdrawal(request.id.clone()),
                now,
            ))
            .await?;

        request.status = WithdrawalStatus::Settled;
        request.settled_at = Some(now);
        self.withdrawals.update(request.clone()).await?;
        tracing::debug!(target = "affilbase::withdraw", withdrawal = %request.id, "settled");
        Ok(request)
    }

    /// Reserved -> Failed, on payout failure. Releases the reservation;
    /// distinct from Cancelled so the audit trail keeps the reason.
    pub async fn fail(
        &self,
        id: &WithdrawalId,
        reason: &str,
        now: Timestamp,
    ) -> Result<WithdrawalRequest, WithdrawError> {
        let mut request = self.load(id).await?;
        if request.status != WithdrawalStatus::Reserved {
            return Err(WithdrawError::invalid_transition(
                request.status.as_str(),
                "failed",
            ));
        }

        self.ledger
            .append_once(LedgerEntry::new(
                request.affiliate_id.clone(),
                EntryKind::Release,
                request.amount,
                ReferenceId::Withdrawal(request.id.clone()),
                now,
            ))
            .await?;

        request.status = WithdrawalStatus::Failed;
        request.last_error = Some(reason.to_string());
        self.withdrawals.update(request.clone()).await?;
        tracing::warn!(
            target = "affilbase::withdraw",
            withdrawal = %request.id,
            reason,
            "payout failed; reservation released"
        );
        Ok(request)
    }

    /// Requested -> Cancelled. Touches no ledger state; nothing was
    /// reserved yet.
    pub async fn cancel(
        &self,
        id: &WithdrawalId,
    ) -> Result<WithdrawalRequest, WithdrawError> {
        let mut request = self.load(id).await?;
        if request.status != WithdrawalStatus::Requested {
            return Err(WithdrawError::invalid_transition(
                request.status.as_str(),
                "cancelled",
            ));
        }
        request.status = WithdrawalStatus::Cancelled;
        self.withdrawals.update(request.clone()).await?;
        Ok(request)
    }

    async fn load(&self, id: &WithdrawalId) -> Result<WithdrawalRequest, WithdrawError> {
        self.withdrawals
            .get(id)
            .await?
            .ok_or_else(|| WithdrawError::not_found(&format!("withdrawal {id} not found")))
    }
}
