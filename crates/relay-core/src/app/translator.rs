//! TranslatorCell - 差し替え可能な ErrorTranslator の置き場
//!
//! Starts empty. While empty, failed work is only logged and never delivered
//! to its slot; the waiter then sees a timeout/abandonment instead of an
//! error payload. That degraded mode is deliberate, not a crash.

use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::{ErrorPayload, Fault};
use crate::ports::ErrorTranslator;

#[derive(Clone, Default)]
pub struct TranslatorCell {
    current: Arc<RwLock<Option<Arc<dyn ErrorTranslator>>>>,
}

impl TranslatorCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `translator`, returning the one it replaced.
    pub fn install(
        &self,
        translator: impl ErrorTranslator + 'static,
    ) -> Option<Arc<dyn ErrorTranslator>> {
        self.install_arc(Arc::new(translator))
    }

    pub fn install_arc(
        &self,
        translator: Arc<dyn ErrorTranslator>,
    ) -> Option<Arc<dyn ErrorTranslator>> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        tracing::debug!(replacing = guard.is_some(), "installing error translator");
        guard.replace(translator)
    }

    pub fn clear(&self) -> Option<Arc<dyn ErrorTranslator>> {
        self.current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub fn current(&self) -> Option<Arc<dyn ErrorTranslator>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_installed(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Translate with the installed translator, if any.
    ///
    /// The lock is released before the translator runs.
    pub fn translate(&self, fault: &Fault) -> Option<ErrorPayload> {
        let translator = self.current()?;
        Some(translator.translate(fault))
    }
}
