//! CompletionSlot port - single-assignment outcome container
//!
//! Slots are created and owned by the transport layer (an inbound request
//! waiting for its response, ...). The core never allocates one; it only
//! resolves a reference and delivers into it.

use thiserror::Error;

use crate::domain::{ErrorPayload, Reply};

/// Why a delivery attempt did not change the slot.
///
/// Both cases are expected under races with the transport's timeout path, so
/// callers treat them as a no-op rather than a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("slot already completed")]
    AlreadyCompleted,

    #[error("slot closed by its waiter")]
    Closed,
}

/// A container for a not-yet-available outcome.
///
/// # Contract
/// - At most one of `complete` / `complete_with_error` ever changes the slot.
/// - A second attempt returns `Err(SlotError::AlreadyCompleted)`; it must never
///   deliver twice.
/// - Delivering into a slot whose waiter is gone returns
///   `Err(SlotError::Closed)`.
///
/// Implementations that cannot uphold the first two points on their own can be
/// wrapped in `impls::GuardedSlot`.
pub trait CompletionSlot: Send + Sync {
    fn complete(&self, reply: Reply) -> Result<(), SlotError>;

    fn complete_with_error(&self, error: ErrorPayload) -> Result<(), SlotError>;
}
