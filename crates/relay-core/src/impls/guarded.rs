//! GuardedSlot - exactly-once guard for external slots
//!
//! Some transport slot types accept any number of completions and let the
//! last one win. Wrapping them here makes only the first attempt reach the
//! inner slot, also under races with the transport's own timeout path.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::{ErrorPayload, Reply};
use crate::ports::{CompletionSlot, SlotError};

pub struct GuardedSlot<S> {
    inner: S,
    claimed: AtomicBool,
}

impl<S: CompletionSlot> GuardedSlot<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            claimed: AtomicBool::new(false),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed.load(Ordering::Acquire)
    }

    fn claim(&self) -> Result<(), SlotError> {
        self.claimed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|_| SlotError::AlreadyCompleted)
    }
}

impl<S: CompletionSlot> CompletionSlot for GuardedSlot<S> {
    fn complete(&self, reply: Reply) -> Result<(), SlotError> {
        self.claim()?;
        self.inner.complete(reply)
    }

    fn complete_with_error(&self, error: ErrorPayload) -> Result<(), SlotError> {
        self.claim()?;
        self.inner.complete_with_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::RecordingSlot;
    use std::sync::Arc;

    #[test]
    fn only_first_completion_reaches_inner() {
        let slot = GuardedSlot::new(RecordingSlot::new());

        slot.complete(Reply::Accepted).unwrap();
        assert_eq!(
            slot.complete_with_error(ErrorPayload::new("late")),
            Err(SlotError::AlreadyCompleted)
        );
        assert_eq!(slot.complete(Reply::Accepted), Err(SlotError::AlreadyCompleted));

        assert!(slot.is_claimed());
        assert_eq!(slot.inner().complete_count(), 1);
        assert_eq!(slot.inner().error_count(), 0);
    }

    #[test]
    fn racing_threads_deliver_once() {
        let slot = Arc::new(GuardedSlot::new(RecordingSlot::new()));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let slot = Arc::clone(&slot);
                std::thread::spawn(move || {
                    if i % 2 == 0 {
                        slot.complete(Reply::Accepted).is_ok()
                    } else {
                        slot.complete_with_error(ErrorPayload::new("x")).is_ok()
                    }
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(winners, 1);
        assert_eq!(slot.inner().calls().len(), 1);
    }
}
