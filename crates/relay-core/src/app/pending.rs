//! PendingReply - transport 側の待ち受けハンドル
//!
//! Registers a `OneshotSlot` under its key and removes that binding again
//! when the reply resolves, times out or the handle is dropped. A runner that
//! completes after the timeout either misses the key (resolution failure) or
//! hits a closed slot; both are safe no-ops.

use std::sync::Arc;
use std::time::Duration;

use super::registry::SlotRegistry;
use crate::domain::{RelayError, SlotKey, SlotOutcome};
use crate::impls::{OneshotSlot, SlotWaiter};
use crate::ports::CompletionSlot;

pub struct PendingReply {
    key: SlotKey,
    registry: SlotRegistry,
    slot: Arc<dyn CompletionSlot>,
    waiter: Option<SlotWaiter>,
    timeout: Duration,
}

impl PendingReply {
    pub(crate) fn register(
        registry: SlotRegistry,
        slot: Arc<OneshotSlot>,
        waiter: SlotWaiter,
        timeout: Duration,
    ) -> Self {
        let key = slot.key().clone();
        let slot: Arc<dyn CompletionSlot> = slot;
        registry.register(key.clone(), Arc::clone(&slot));
        Self {
            key,
            registry,
            slot,
            waiter: Some(waiter),
            timeout,
        }
    }

    pub fn key(&self) -> &SlotKey {
        &self.key
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Direct handle to the slot, for runners that skip the registry.
    pub fn slot(&self) -> Arc<dyn CompletionSlot> {
        Arc::clone(&self.slot)
    }

    /// Wait for the outcome using the configured timeout.
    pub async fn wait(mut self) -> Result<SlotOutcome, RelayError> {
        let Some(waiter) = self.waiter.take() else {
            return Err(RelayError::Abandoned(self.key.clone()));
        };
        let result = waiter.wait(self.timeout).await;
        if let Err(err) = &result {
            tracing::warn!(key = %self.key, error = %err, "no outcome delivered to pending reply");
        }
        result
    }
}

impl Drop for PendingReply {
    fn drop(&mut self) {
        if self.registry.remove_if_same(&self.key, &self.slot) {
            tracing::trace!(key = %self.key, "pending reply unregistered");
        }
    }
}
