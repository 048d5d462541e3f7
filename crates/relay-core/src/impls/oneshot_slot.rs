//! OneshotSlot - in-process の CompletionSlot
//!
//! # 実装詳細
//! - `tokio::sync::oneshot` で waiter に 1 回だけ outcome を渡す
//! - sender は `Mutex<Option<_>>` に入れ、最初の complete が take する
//! - 2 回目以降は sender が無いので `AlreadyCompleted`
//! - waiter が先に drop されていれば `Closed`
//!
//! # 使用例
//! ```ignore
//! let (slot, waiter) = OneshotSlot::pair("req-1");
//! registry.register(SlotKey::from("req-1"), slot);
//! let outcome = waiter.wait(Duration::from_secs(5)).await?;
//! ```

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::oneshot;

use crate::domain::{ErrorPayload, RelayError, Reply, SlotKey, SlotOutcome};
use crate::ports::{CompletionSlot, SlotError};

/// Sending half, held by whoever completes the slot.
pub struct OneshotSlot {
    key: SlotKey,
    tx: Mutex<Option<oneshot::Sender<SlotOutcome>>>,
}

impl OneshotSlot {
    /// Create a connected slot/waiter pair.
    pub fn pair(key: impl Into<SlotKey>) -> (Arc<Self>, SlotWaiter) {
        let key = key.into();
        let (tx, rx) = oneshot::channel();
        let slot = Arc::new(Self {
            key: key.clone(),
            tx: Mutex::new(Some(tx)),
        });
        (slot, SlotWaiter { key, rx })
    }

    pub fn key(&self) -> &SlotKey {
        &self.key
    }

    /// `true` once a completion was attempted (delivered or not).
    pub fn is_completed(&self) -> bool {
        self.tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    fn deliver(&self, outcome: SlotOutcome) -> Result<(), SlotError> {
        // lock は take するだけ。send はロックの外で行う
        let tx = self
            .tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or(SlotError::AlreadyCompleted)?;

        tx.send(outcome).map_err(|_| SlotError::Closed)
    }
}

impl CompletionSlot for OneshotSlot {
    fn complete(&self, reply: Reply) -> Result<(), SlotError> {
        self.deliver(Ok(reply))
    }

    fn complete_with_error(&self, error: ErrorPayload) -> Result<(), SlotError> {
        self.deliver(Err(error))
    }
}

/// Receiving half, held by the transport layer.
pub struct SlotWaiter {
    key: SlotKey,
    rx: oneshot::Receiver<SlotOutcome>,
}

impl SlotWaiter {
    pub fn key(&self) -> &SlotKey {
        &self.key
    }

    /// Wait without a deadline.
    ///
    /// Returns `RelayError::Abandoned` when the slot is dropped without ever
    /// being completed (e.g. the runner had no translator for its failure and
    /// the last reference went away).
    pub async fn recv(self) -> Result<SlotOutcome, RelayError> {
        self.rx
            .await
            .map_err(|_| RelayError::Abandoned(self.key))
    }

    /// Wait for at most `timeout`.
    ///
    /// On timeout the receiver is dropped, so a late completion hits
    /// `SlotError::Closed` on the sending side.
    pub async fn wait(self, timeout: Duration) -> Result<SlotOutcome, RelayError> {
        let key = self.key;
        match tokio::time::timeout(timeout, self.rx).await {
            Ok(Ok(outcome)) => Ok(outcome),
            Ok(Err(_)) => Err(RelayError::Abandoned(key)),
            Err(_) => Err(RelayError::TimedOut { key, timeout }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn complete_reaches_waiter() {
        let (slot, waiter) = OneshotSlot::pair("k");
        slot.complete(Reply::Value(json!(42))).unwrap();

        let outcome = waiter.wait(Duration::from_secs(1)).await.unwrap();
        assert_eq!(outcome, Ok(Reply::Value(json!(42))));
        assert!(slot.is_completed());
    }

    #[tokio::test]
    async fn error_reaches_waiter() {
        let (slot, waiter) = OneshotSlot::pair("k");
        slot.complete_with_error(ErrorPayload::new("ERR:x")).unwrap();

        let outcome = waiter.recv().await.unwrap();
        assert_eq!(outcome, Err(ErrorPayload::new("ERR:x")));
    }

    #[tokio::test]
    async fn second_completion_is_rejected() {
        let (slot, waiter) = OneshotSlot::pair("k");
        slot.complete(Reply::Accepted).unwrap();

        assert_eq!(
            slot.complete(Reply::Value(json!(1))),
            Err(SlotError::AlreadyCompleted)
        );
        assert_eq!(
            slot.complete_with_error(ErrorPayload::new("late")),
            Err(SlotError::AlreadyCompleted)
        );

        // waiter は最初の値だけを見る
        let outcome = waiter.recv().await.unwrap();
        assert_eq!(outcome, Ok(Reply::Accepted));
    }

    #[tokio::test]
    async fn completion_after_waiter_dropped_is_closed() {
        let (slot, waiter) = OneshotSlot::pair("k");
        drop(waiter);

        assert_eq!(slot.complete(Reply::Accepted), Err(SlotError::Closed));
        assert_eq!(slot.complete(Reply::Accepted), Err(SlotError::AlreadyCompleted));
    }

    #[tokio::test]
    async fn wait_times_out() {
        let (slot, waiter) = OneshotSlot::pair("k");

        let err = waiter.wait(Duration::from_millis(50)).await.unwrap_err();
        assert!(matches!(err, RelayError::TimedOut { ref key, .. } if key.as_str() == "k"));

        // late delivery after timeout: safe no-op
        assert_eq!(slot.complete(Reply::Accepted), Err(SlotError::Closed));
    }

    #[tokio::test]
    async fn dropped_slot_abandons_waiter() {
        let (slot, waiter) = OneshotSlot::pair("k");
        drop(slot);

        let err = waiter.recv().await.unwrap_err();
        assert!(matches!(err, RelayError::Abandoned(_)));
    }

    #[tokio::test]
    async fn completion_from_another_thread() {
        let (slot, waiter) = OneshotSlot::pair("k");

        let handle = std::thread::spawn(move || slot.complete(Reply::Value(json!("done"))));

        let outcome = waiter.wait(Duration::from_secs(5)).await.unwrap();
        assert_eq!(outcome, Ok(Reply::Value(json!("done"))));
        assert!(handle.join().unwrap().is_ok());
    }
}
