use serde::{Deserialize, Serialize};

/// Tunables for the in-process wiring. Values deserialize from a JSON tree
/// so deployments can override any subset of the defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewayConfig {
    /// Click dedup interval per `(link, fingerprint)`.
    pub debounce_ms: i64,
    /// Deadline for catalog collaborator calls.
    pub catalog_timeout_ms: u64,
    /// How long clicks are kept before compaction; should cover the longest
    /// attribution window plus grace.
    pub click_retention_ms: i64,
    pub payout: PayoutConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PayoutConfig {
    pub worker_id: String,
    pub max_attempts: u32,
    pub lease_ms: i64,
    pub batch: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 30_000,
            catalog_timeout_ms: 2_000,
            // 7-day default window + 1 day grace
            click_retention_ms: 8 * 24 * 60 * 60 * 1_000,
            payout: PayoutConfig::default(),
        }
    }
}

impl Default for PayoutConfig {
    fn default() -> Self {
        Self {
            worker_id: "payout-worker-1".into(),
            max_attempts: 4,
            lease_ms: 30_000,
            batch: 16,
        }
    }
}

impl GatewayConfig {
    /// Applies a partial JSON override on top of the defaults; unknown keys
    /// are rejected so typos fail loudly at boot.
    pub fn from_overrides(overrides: serde_json::Value) -> Result<Self, serde_json::Error> {
        let mut tree = serde_json::to_value(GatewayConfig::default())?;
        merge(&mut tree, overrides);
        serde_json::from_value(tree)
    }
}

fn merge(base: &mut serde_json::Value, overlay: serde_json::Value) {
    match (base, overlay) {
        (serde_json::Value::Object(base_map), serde_json::Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn overrides_merge_onto_defaults() {
        let config = GatewayConfig::from_overrides(json!({
            "debounce_ms": 10_000,
            "payout": { "max_attempts": 7 }
        }))
        .unwrap();
        assert_eq!(config.debounce_ms, 10_000);
        assert_eq!(config.payout.max_attempts, 7);
        // untouched defaults survive
        assert_eq!(config.catalog_timeout_ms, 2_000);
        assert_eq!(config.payout.batch, 16);
    }
}
