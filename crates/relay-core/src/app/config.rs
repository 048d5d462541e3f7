//! BridgeConfig - bridge の設定
//!
//! JSON で読み込めます。全フィールドに default があるので `{}` も有効です。
//!
//! ```json
//! { "reply_timeout_ms": 5000, "log_dropped_success": true }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::RelayError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    /// How long a `PendingReply` waits before giving up on its slot.
    pub reply_timeout_ms: u64,

    /// Warn when a successful result has no slot to go to.
    pub log_dropped_success: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            reply_timeout_ms: 30_000,
            log_dropped_success: true,
        }
    }
}

impl BridgeConfig {
    pub fn reply_timeout(&self) -> Duration {
        Duration::from_millis(self.reply_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), RelayError> {
        if self.reply_timeout_ms == 0 {
            return Err(RelayError::InvalidConfig(
                "reply_timeout_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn from_json_str(s: &str) -> Result<Self, RelayError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RelayError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}
