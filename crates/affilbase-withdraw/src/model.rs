use affilbase_types::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum PayoutMethod {
    Upi {
        vpa: String,
    },
    BankTransfer {
        bank_name: String,
        account_number: String,
        ifsc: String,
        account_name: String,
    },
}

impl PayoutMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PayoutMethod::Upi { .. } => "upi",
            PayoutMethod::BankTransfer { .. } => "bank_transfer",
        }
    }

    /// Detail payload completeness; deeper format checks belong to the
    /// payout collaborator.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            PayoutMethod::Upi { vpa } => {
                if vpa.trim().is_empty() {
                    return Err("upi vpa required".into());
                }
            }
            PayoutMethod::BankTransfer {
                bank_name,
                account_number,
                ifsc,
                account_name,
            } => {
                if bank_name.trim().is_empty()
                    || account_number.trim().is_empty()
                    || ifsc.trim().is_empty()
                    || account_name.trim().is_empty()
                {
                    return Err("all bank transfer fields required".into());
                }
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalStatus {
    Requested,
    Reserved,
    Settled,
    Failed,
    Cancelled,
}

impl WithdrawalStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            WithdrawalStatus::Requested => "requested",
            WithdrawalStatus::Reserved => "reserved",
            WithdrawalStatus::Settled => "settled",
            WithdrawalStatus::Failed => "failed",
            WithdrawalStatus::Cancelled => "cancelled",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            WithdrawalStatus::Settled | WithdrawalStatus::Failed | WithdrawalStatus::Cancelled
        )
    }
}

/// Payout-initiation lifecycle for a Reserved request, driven by the
/// dispatcher. Absent until the reservation exists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum DispatchState {
    Pending { visible_at: i64 },
    Leased { worker: String, lease_until: i64 },
    Initiated,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    pub id: WithdrawalId,
    pub affiliate_id: AffiliateId,
    pub amount: Money,
    pub method: PayoutMethod,
    pub status: WithdrawalStatus,
    pub created_at: Timestamp,
    pub settled_at: Option<Timestamp>,
    pub dispatch: Option<DispatchState>,
    pub attempts: u32,
    pub last_error: Option<String>,
}

impl WithdrawalRequest {
    pub fn new(
        affiliate_id: AffiliateId,
        amount: Money,
        method: PayoutMethod,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: WithdrawalId::new_random(),
            affiliate_id,
            amount,
            method,
            status: WithdrawalStatus::Requested,
            created_at,
            settled_at: None,
            dispatch: None,
            attempts: 0,
            last_error: None,
        }
    }
}
