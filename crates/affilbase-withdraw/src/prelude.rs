pub use crate::backoff::{Backoff, RetryPolicy};
pub use crate::coordinator::Coordinator;
pub use crate::errors::WithdrawError;
pub use crate::lock::LockTable;
pub use crate::memory::InMemoryWithdrawalStore;
pub use crate::model::{
    DispatchState, PayoutMethod, WithdrawalRequest, WithdrawalStatus,
};
pub use crate::payout::{PayoutDispatcher, PayoutTransport};
pub use crate::store::WithdrawalStore;
