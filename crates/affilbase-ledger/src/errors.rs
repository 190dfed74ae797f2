use affilbase_errors::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct LedgerError(pub Box<ErrorObj>);

impl LedgerError {
    pub fn into_inner(self) -> ErrorObj {
        *self.0
    }

    pub fn code(&self) -> ErrorCode {
        self.0.code
    }

    pub fn invalid(msg: &str) -> Self {
        LedgerError(Box::new(
            ErrorBuilder::new(codes::SCHEMA_VALIDATION)
                .user_msg("Ledger entry failed validation.")
                .dev_msg(msg)
                .build(),
        ))
    }

    pub fn conflict(msg: &str) -> Self {
        LedgerError(Box::new(
            ErrorBuilder::new(codes::STORAGE_CONFLICT)
                .user_msg("Ledger entry already recorded.")
                .dev_msg(msg)
                .build(),
        ))
    }

    pub fn not_found(msg: &str) -> Self {
        LedgerError(Box::new(
            ErrorBuilder::new(codes::STORAGE_NOT_FOUND)
                .user_msg("Ledger entry not found.")
                .dev_msg(msg)
                .build(),
        ))
    }

    pub fn internal(msg: &str) -> Self {
        LedgerError(Box::new(
            ErrorBuilder::new(codes::STORAGE_INTERNAL)
                .user_msg("Ledger storage failed; retry is safe.")
                .dev_msg(msg)
                .build(),
        ))
    }
}

impl From<LedgerError> for ErrorObj {
    fn from(value: LedgerError) -> Self {
        value.into_inner()
    }
}
