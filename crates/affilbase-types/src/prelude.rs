pub use crate::id::{
    AffiliateId, ClickId, ConversionId, EntryId, LinkId, OrderId, ProductId, VisitorFingerprint,
    WithdrawalId,
};
pub use crate::money::Money;
pub use crate::time::{now, now_ms, Timestamp};
