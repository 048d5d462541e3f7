//! RecordingSlot - 呼び出しを記録するだけの slot
//!
//! Accepts every call and remembers it, so tests can assert the exact number
//! of deliveries a runner made. It performs no exactly-once guarding itself.

use std::sync::{Mutex, PoisonError};

use crate::domain::{ErrorPayload, Reply};
use crate::ports::{CompletionSlot, SlotError};

#[derive(Debug, Clone, PartialEq)]
pub enum SlotCall {
    Complete(Reply),
    CompleteWithError(ErrorPayload),
}

#[derive(Debug, Default)]
pub struct RecordingSlot {
    calls: Mutex<Vec<SlotCall>>,
}

impl RecordingSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<SlotCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn complete_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, SlotCall::Complete(_)))
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, SlotCall::CompleteWithError(_)))
            .count()
    }

    fn record(&self, call: SlotCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

impl CompletionSlot for RecordingSlot {
    fn complete(&self, reply: Reply) -> Result<(), SlotError> {
        self.record(SlotCall::Complete(reply));
        Ok(())
    }

    fn complete_with_error(&self, error: ErrorPayload) -> Result<(), SlotError> {
        self.record(SlotCall::CompleteWithError(error));
        Ok(())
    }
}
