pub use crate::config::{GatewayConfig, PayoutConfig};
pub use crate::errors::GatewayError;
pub use crate::hub::{AffiliateHub, LinkOverview};
