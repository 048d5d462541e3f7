//! Recorder port - 実行の前後・失敗時に呼ばれる観測フック
//!
//! A recorder is an optional strategy attached to a `TaskRunner`. It observes
//! the invocation and may rewrite a successful reply, but it can neither
//! suppress delivery nor turn a failure into a success. A hook that panics is
//! logged by the runner and treated as a no-op.

use crate::domain::{Fault, Reply, SlotKey};

/// Invocation observer. Every hook defaults to a no-op.
pub trait Recorder: Send + Sync {
    /// Before the unit of work runs.
    fn on_start(&self, _key: Option<&SlotKey>) {}

    /// After the work succeeded, before delivery. Returns the reply to deliver.
    fn on_return(&self, _key: Option<&SlotKey>, reply: Reply) -> Reply {
        reply
    }

    /// After the work failed, before translation.
    fn on_fault(&self, _key: Option<&SlotKey>, _fault: &Fault) {}
}

/// Recorder that observes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRecorder;

impl Recorder for NoopRecorder {}
