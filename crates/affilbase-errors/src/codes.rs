use crate::retry::RetryClass;

/// Stable, wire-visible error code. The `name` is part of the public
/// contract; renaming one is a breaking change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ErrorCode {
    pub name: &'static str,
    pub retry: RetryClass,
}

macro_rules! code {
    ($ident:ident, $name:literal, $retry:ident) => {
        pub const $ident: ErrorCode = ErrorCode {
            name: $name,
            retry: RetryClass::$retry,
        };
    };
}

code!(SCHEMA_VALIDATION, "schema.validation", Permanent);
code!(LINK_INACTIVE, "attribution.link_inactive", Permanent);
code!(
    LEDGER_INSUFFICIENT_FUNDS,
    "ledger.insufficient_funds",
    None
);
code!(STORAGE_CONFLICT, "storage.conflict", Permanent);
code!(STORAGE_NOT_FOUND, "storage.not_found", Permanent);
code!(STORAGE_INTERNAL, "storage.internal", Transient);
code!(PROVIDER_TIMEOUT, "provider.timeout", Transient);
code!(PROVIDER_UNAVAILABLE, "provider.unavailable", Transient);
code!(
    WITHDRAW_INVALID_TRANSITION,
    "withdraw.invalid_transition",
    Permanent
);
code!(UNKNOWN_INTERNAL, "unknown.internal", Transient);
