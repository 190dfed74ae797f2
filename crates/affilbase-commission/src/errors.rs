use affilbase_attribution::errors::AttributionError;
use affilbase_errors::prelude::*;
use affilbase_ledger::errors::LedgerError;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct CommissionError(pub Box<ErrorObj>);

impl CommissionError {
    pub fn into_inner(self) -> ErrorObj {
        *self.0
    }

    pub fn code(&self) -> ErrorCode {
        self.0.code
    }

    pub fn invalid(msg: &str) -> Self {
        CommissionError(Box::new(
            ErrorBuilder::new(codes::SCHEMA_VALIDATION)
                .user_msg("Commission input failed validation.")
                .dev_msg(msg)
                .build(),
        ))
    }
}

impl From<LedgerError> for CommissionError {
    fn from(err: LedgerError) -> Self {
        CommissionError(Box::new(err.into_inner()))
    }
}

impl From<AttributionError> for CommissionError {
    fn from(err: AttributionError) -> Self {
        CommissionError(Box::new(err.into_inner()))
    }
}
