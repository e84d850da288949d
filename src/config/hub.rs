//! Message hub configuration.

use serde::Deserialize;

use crate::hub::{DEFAULT_EPHEMERAL_PREFIX, DeliveryMode, HubOptions};

/// `[hub]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct HubConfig {
    /// Username prefix of command-only clients excluded from broadcasts.
    /// Empty disables the prefix rule.
    #[serde(default = "default_ephemeral_prefix")]
    pub ephemeral_prefix: String,
    /// "serialized" (deliver under the hub lock) or "snapshot".
    #[serde(default)]
    pub delivery: DeliveryMode,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            ephemeral_prefix: default_ephemeral_prefix(),
            delivery: DeliveryMode::default(),
        }
    }
}

impl From<&HubConfig> for HubOptions {
    fn from(config: &HubConfig) -> Self {
        Self {
            ephemeral_prefix: config.ephemeral_prefix.clone(),
            delivery: config.delivery,
        }
    }
}

fn default_ephemeral_prefix() -> String {
    DEFAULT_EPHEMERAL_PREFIX.to_string()
}
