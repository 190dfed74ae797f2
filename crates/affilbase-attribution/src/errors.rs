use affilbase_errors::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct AttributionError(pub Box<ErrorObj>);

impl AttributionError {
    pub fn into_inner(self) -> ErrorObj {
        *self.0
    }

    pub fn code(&self) -> ErrorCode {
        self.0.code
    }

    pub fn link_inactive(link_id: &str) -> Self {
        AttributionError(Box::new(
            ErrorBuilder::new(codes::LINK_INACTIVE)
                .user_msg("Referral link is unknown or no longer active.")
                .dev_msg(format!("link rejected: {link_id}"))
                .build(),
        ))
    }

    pub fn invalid(msg: &str) -> Self {
        AttributionError(Box::new(
            ErrorBuilder::new(codes::SCHEMA_VALIDATION)
                .user_msg("Event failed validation.")
                .dev_msg(msg)
                .build(),
        ))
    }

    pub fn not_found(msg: &str) -> Self {
        AttributionError(Box::new(
            ErrorBuilder::new(codes::STORAGE_NOT_FOUND)
                .user_msg("Record not found.")
                .dev_msg(msg)
                .build(),
        ))
    }

    pub fn timeout(msg: &str) -> Self {
        AttributionError(Box::new(
            ErrorBuilder::new(codes::PROVIDER_TIMEOUT)
                .user_msg("Catalog did not answer in time; retry is safe.")
                .dev_msg(msg)
                .build(),
        ))
    }

    pub fn provider_unavailable(msg: &str) -> Self {
        AttributionError(Box::new(
            ErrorBuilder::new(codes::PROVIDER_UNAVAILABLE)
                .user_msg("Catalog is unavailable; retry is safe.")
                .dev_msg(msg)
                .build(),
        ))
    }

    pub fn internal(msg: &str) -> Self {
        AttributionError(Box::new(
            ErrorBuilder::new(codes::STORAGE_INTERNAL)
                .user_msg("Attribution storage failed; retry is safe.")
                .dev_msg(msg)
                .build(),
        ))
    }
}

impl From<AttributionError> for ErrorObj {
    fn from(value: AttributionError) -> Self {
        value.into_inner()
    }
}
