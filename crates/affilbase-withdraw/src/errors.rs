use affilbase_errors::prelude::*;
use affilbase_ledger::errors::LedgerError;
use affilbase_types::money::Money;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct WithdrawError(pub Box<ErrorObj>);

impl WithdrawError {
    pub fn into_inner(self) -> ErrorObj {
        *self.0
    }

    pub fn code(&self) -> ErrorCode {
        self.0.code
    }

    pub fn invalid(msg: &str) -> Self {
        WithdrawError(Box::new(
            ErrorBuilder::new(codes::SCHEMA_VALIDATION)
                .user_msg("Withdrawal request failed validation.")
                .dev_msg(msg)
                .build(),
        ))
    }

    pub fn insufficient(available: Money, requested: Money) -> Self {
        WithdrawError(Box::new(
            ErrorBuilder::new(codes::LEDGER_INSUFFICIENT_FUNDS)
                .user_msg("Requested amount exceeds available balance.")
                .dev_msg(format!("available {available}, requested {requested}"))
                .meta("available", serde_json::json!(available.minor()))
                .meta("requested", serde_json::json!(requested.minor()))
                .build(),
        ))
    }

    pub fn invalid_transition(from: &str, attempted: &str) -> Self {
        WithdrawError(Box::new(
            ErrorBuilder::new(codes::WITHDRAW_INVALID_TRANSITION)
                .user_msg("Withdrawal is not in a state that allows this operation.")
                .dev_msg(format!("illegal transition {from} -> {attempted}"))
                .build(),
        ))
    }

    pub fn not_found(msg: &str) -> Self {
        WithdrawError(Box::new(
            ErrorBuilder::new(codes::STORAGE_NOT_FOUND)
                .user_msg("Withdrawal not found.")
                .dev_msg(msg)
                .build(),
        ))
    }

    pub fn provider_unavailable(msg: &str) -> Self {
        WithdrawError(Box::new(
            ErrorBuilder::new(codes::PROVIDER_UNAVAILABLE)
                .user_msg("Payout provider is unavailable; retry is safe.")
                .dev_msg(msg)
                .build(),
        ))
    }

    pub fn internal(msg: &str) -> Self {
        WithdrawError(Box::new(
            ErrorBuilder::new(codes::STORAGE_INTERNAL)
                .user_msg("Withdrawal storage failed; retry is safe.")
                .dev_msg(msg)
                .build(),
        ))
    }
}

impl From<LedgerError> for WithdrawError {
    fn from(err: LedgerError) -> Self {
        WithdrawError(Box::new(err.into_inner()))
    }
}
