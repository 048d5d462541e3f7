//! Bridge / BridgeBuilder - registry + translator + config の束
//!
//! A `Bridge` is the explicit process-scoped state every runner is built
//! from. Tests create their own; production code usually goes through
//! `app::global`.
//!
//! # 使用例
//! ```ignore
//! let bridge = Bridge::builder()
//!     .config(BridgeConfig::load("relay.json")?)
//!     .translator(|fault: &Fault| ErrorPayload::new(fault.message()))
//!     .build()?;
//!
//! let pending = bridge.defer();
//! TaskRunner::for_key(&bridge, || Ok(42), pending.key().clone()).spawn();
//! let outcome = pending.wait().await?;
//! ```

use std::sync::Arc;

use super::config::BridgeConfig;
use super::pending::PendingReply;
use super::registry::SlotRegistry;
use super::translator::TranslatorCell;
use crate::domain::{RelayError, SlotKey};
use crate::impls::OneshotSlot;
use crate::ports::ErrorTranslator;

#[derive(Clone, Default)]
pub struct Bridge {
    registry: SlotRegistry,
    translators: TranslatorCell,
    config: Arc<BridgeConfig>,
}

impl Bridge {
    /// Empty registry, no translator, default config.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> BridgeBuilder {
        BridgeBuilder::new()
    }

    pub fn registry(&self) -> &SlotRegistry {
        &self.registry
    }

    pub fn translators(&self) -> &TranslatorCell {
        &self.translators
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Open an in-process slot under a fresh key.
    pub fn defer(&self) -> PendingReply {
        self.defer_with_key(SlotKey::generate())
    }

    /// Open an in-process slot under `key`, replacing any previous binding.
    pub fn defer_with_key(&self, key: impl Into<SlotKey>) -> PendingReply {
        let (slot, waiter) = OneshotSlot::pair(key);
        PendingReply::register(
            self.registry.clone(),
            slot,
            waiter,
            self.config.reply_timeout(),
        )
    }
}

/// BridgeBuilder は Bridge を構築
///
/// `build()` で config を検証します（不正なら `RelayError::InvalidConfig`）。
#[derive(Default)]
pub struct BridgeBuilder {
    config: BridgeConfig,
    translator: Option<Arc<dyn ErrorTranslator>>,
}

impl BridgeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn translator(mut self, translator: impl ErrorTranslator + 'static) -> Self {
        self.translator = Some(Arc::new(translator));
        self
    }

    pub fn build(self) -> Result<Bridge, RelayError> {
        self.config.validate()?;

        let translators = TranslatorCell::new();
        if let Some(translator) = self.translator {
            translators.install_arc(translator);
        }

        Ok(Bridge {
            registry: SlotRegistry::new(),
            translators,
            config: Arc::new(self.config),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorPayload, Fault};

    #[test]
    fn new_bridge_is_empty() {
        let bridge = Bridge::new();
        assert!(bridge.registry().is_empty());
        assert!(!bridge.translators().is_installed());
        assert_eq!(bridge.config(), &BridgeConfig::default());
    }

    #[test]
    fn builder_installs_translator() {
        let bridge = Bridge::builder()
            .translator(|f: &Fault| ErrorPayload::new(f.message()))
            .build()
            .unwrap();
        assert!(bridge.translators().is_installed());
    }

    #[test]
    fn builder_rejects_invalid_config() {
        let config = BridgeConfig {
            reply_timeout_ms: 0,
            ..BridgeConfig::default()
        };
        let result = Bridge::builder().config(config).build();
        assert!(matches!(result, Err(RelayError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn defer_registers_under_generated_key() {
        let bridge = Bridge::new();
        let pending = bridge.defer();

        assert!(pending.key().as_str().starts_with("slot-"));
        assert!(bridge.registry().contains(pending.key()));

        drop(pending);
        assert!(bridge.registry().is_empty());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let bridge = Bridge::new();
        let other = bridge.clone();
        let _pending = bridge.defer_with_key("shared");
        assert!(other.registry().contains(&SlotKey::from("shared")));
    }
}
