use affilbase_types::prelude::*;
use serde::{Deserialize, Serialize};

/// A recorded referral-link visit. Immutable once recorded; compacted after
/// the attribution window plus a grace period. Product and rate are
/// snapshotted at click time so later catalog edits cannot rewrite history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickEvent {
    pub id: ClickId,
    pub affiliate_id: AffiliateId,
    pub link_id: LinkId,
    pub product_id: ProductId,
    pub commission_rate_bp: u32,
    pub visitor_fingerprint: VisitorFingerprint,
    pub at: Timestamp,
}

/// Catalog-owned link descriptor; clicks hold a weak reference to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffiliateLink {
    pub id: LinkId,
    pub affiliate_id: AffiliateId,
    pub product_id: ProductId,
    pub created_at: Timestamp,
    pub active: bool,
}

/// Checkout-collaborator payload, delivered at-least-once. `order_id` is the
/// dedup key: at most one stored conversion per order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionEvent {
    pub id: ConversionId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub visitor_fingerprint: VisitorFingerprint,
    pub gross_amount: Money,
    pub at: Timestamp,
}

/// Outcome of resolving one conversion. Created once, immutable. An
/// unattributed resolution (no eligible click) is terminal, not an error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    pub conversion_id: ConversionId,
    pub click_id: Option<ClickId>,
    pub affiliate_id: Option<AffiliateId>,
    pub link_id: Option<LinkId>,
    pub resolved_at: Timestamp,
}

impl Attribution {
    pub fn attributed(conversion_id: ConversionId, click: &ClickEvent, resolved_at: Timestamp) -> Self {
        Self {
            conversion_id,
            click_id: Some(click.id.clone()),
            affiliate_id: Some(click.affiliate_id.clone()),
            link_id: Some(click.link_id.clone()),
            resolved_at,
        }
    }

    pub fn unattributed(conversion_id: ConversionId, resolved_at: Timestamp) -> Self {
        Self {
            conversion_id,
            click_id: None,
            affiliate_id: None,
            link_id: None,
            resolved_at,
        }
    }

    pub fn is_attributed(&self) -> bool {
        self.affiliate_id.is_some()
    }
}

/// Per-product commission terms, owned by the catalog collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionPolicy {
    pub rate_bp: u32,
    pub attribution_window_ms: i64,
}

impl Default for CommissionPolicy {
    fn default() -> Self {
        // 30% over 7 days; business-configurable, never hard-coded downstream.
        Self {
            rate_bp: 3_000,
            attribution_window_ms: 7 * 24 * 60 * 60 * 1_000,
        }
    }
}
