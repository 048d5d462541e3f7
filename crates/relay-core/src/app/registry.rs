//! SlotRegistry - SlotKey から CompletionSlot を引くための並行マップ
//!
//! # 設計
//! - register は上書き（last writer wins）。重複エラーは出さない
//! - lookup の miss は正常系（未登録・削除済み・タイムアウト済み）
//! - 削除は transport 層の責任。registry 自身は eviction / TTL を持たない
//! - `Clone` は同じマップを共有する

use std::sync::Arc;

use dashmap::DashMap;

use crate::domain::SlotKey;
use crate::ports::CompletionSlot;

#[derive(Clone, Default)]
pub struct SlotRegistry {
    slots: Arc<DashMap<SlotKey, Arc<dyn CompletionSlot>>>,
}

impl SlotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key` to `slot`, returning the slot it replaced.
    pub fn register(
        &self,
        key: impl Into<SlotKey>,
        slot: Arc<dyn CompletionSlot>,
    ) -> Option<Arc<dyn CompletionSlot>> {
        let key = key.into();
        tracing::trace!(key = %key, "registering completion slot");
        let replaced = self.slots.insert(key.clone(), slot);
        if replaced.is_some() {
            tracing::debug!(key = %key, "completion slot replaced");
        }
        replaced
    }

    pub fn lookup(&self, key: &SlotKey) -> Option<Arc<dyn CompletionSlot>> {
        self.slots.get(key).map(|entry| Arc::clone(entry.value()))
    }

    pub fn remove(&self, key: &SlotKey) -> Option<Arc<dyn CompletionSlot>> {
        tracing::trace!(key = %key, "removing completion slot");
        self.slots.remove(key).map(|(_, slot)| slot)
    }

    /// Remove `key` only while it is still bound to `slot`.
    ///
    /// Used by owners that must not drop a newer binding registered under the
    /// same key after theirs.
    pub fn remove_if_same(&self, key: &SlotKey, slot: &Arc<dyn CompletionSlot>) -> bool {
        self.slots
            .remove_if(key, |_, current| Arc::ptr_eq(current, slot))
            .is_some()
    }

    pub fn contains(&self, key: &SlotKey) -> bool {
        self.slots.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::RecordingSlot;

    fn slot() -> Arc<dyn CompletionSlot> {
        Arc::new(RecordingSlot::new())
    }

    #[test]
    fn lookup_returns_registered_slot() {
        let reg = SlotRegistry::new();
        let s1 = slot();
        assert!(reg.register("r1", Arc::clone(&s1)).is_none());

        let found = reg.lookup(&SlotKey::from("r1")).unwrap();
        assert!(Arc::ptr_eq(&found, &s1));
        assert!(reg.contains(&SlotKey::from("r1")));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn register_is_last_writer_wins() {
        let reg = SlotRegistry::new();
        let s1 = slot();
        let s2 = slot();

        reg.register("r1", Arc::clone(&s1));
        let replaced = reg.register("r1", Arc::clone(&s2)).unwrap();

        assert!(Arc::ptr_eq(&replaced, &s1));
        let found = reg.lookup(&SlotKey::from("r1")).unwrap();
        assert!(Arc::ptr_eq(&found, &s2));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn removed_or_unknown_keys_are_absent() {
        let reg = SlotRegistry::new();
        reg.register("r1", slot());

        assert!(reg.remove(&SlotKey::from("r1")).is_some());
        assert!(reg.lookup(&SlotKey::from("r1")).is_none());
        assert!(reg.lookup(&SlotKey::from("never")).is_none());
        assert!(reg.remove(&SlotKey::from("never")).is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn remove_if_same_keeps_newer_binding() {
        let reg = SlotRegistry::new();
        let key = SlotKey::from("r1");
        let old = slot();
        let new = slot();

        reg.register(key.clone(), Arc::clone(&old));
        reg.register(key.clone(), Arc::clone(&new));

        assert!(!reg.remove_if_same(&key, &old));
        assert!(reg.contains(&key));
        assert!(reg.remove_if_same(&key, &new));
        assert!(!reg.contains(&key));
    }

    #[test]
    fn clones_share_the_same_map() {
        let reg = SlotRegistry::new();
        let other = reg.clone();
        reg.register("shared", slot());
        assert!(other.contains(&SlotKey::from("shared")));
    }

    #[test]
    fn concurrent_register_lookup_remove() {
        let reg = SlotRegistry::new();

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let reg = reg.clone();
                std::thread::spawn(move || {
                    for i in 0..200 {
                        let key = SlotKey::new(format!("t{t}-{i}"));
                        reg.register(key.clone(), slot());
                        assert!(reg.lookup(&key).is_some());
                        if i % 2 == 0 {
                            reg.remove(&key);
                        }
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(reg.len(), 8 * 100);
    }
}
