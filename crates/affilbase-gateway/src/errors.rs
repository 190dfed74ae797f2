use affilbase_attribution::errors::AttributionError;
use affilbase_commission::errors::CommissionError;
use affilbase_errors::prelude::*;
use affilbase_ledger::errors::LedgerError;
use affilbase_withdraw::errors::WithdrawError;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct GatewayError(pub Box<ErrorObj>);

impl GatewayError {
    pub fn into_inner(self) -> ErrorObj {
        *self.0
    }

    pub fn code(&self) -> ErrorCode {
        self.0.code
    }

    pub fn retry(&self) -> RetryClass {
        self.0.retry()
    }
}

impl From<AttributionError> for GatewayError {
    fn from(err: AttributionError) -> Self {
        GatewayError(Box::new(err.into_inner()))
    }
}

impl From<CommissionError> for GatewayError {
    fn from(err: CommissionError) -> Self {
        GatewayError(Box::new(err.into_inner()))
    }
}

impl From<LedgerError> for GatewayError {
    fn from(err: LedgerError) -> Self {
        GatewayError(Box::new(err.into_inner()))
    }
}

impl From<WithdrawError> for GatewayError {
    fn from(err: WithdrawError) -> Self {
        GatewayError(Box::new(err.into_inner()))
    }
}
