//! TaskRunner - unit of work を実行し、結果を slot に 1 回だけ届ける
//!
//! # フロー
//! 1. 構築時に target を 1 回だけ解決する（直接指定 or registry の key）
//! 2. `execute()` で work を実行（panic も捕捉）
//! 3. 成功: `complete(reply)`。値が無ければ `Reply::Accepted`
//! 4. 失敗: ログ出力。target と translator が両方あれば
//!    `complete_with_error(translator(fault))`、無ければログのみ
//!
//! `execute()` は何も返さず、何も外に投げません。結果は slot 経由でのみ観測されます。
//!
//! Recorder hooks run in their own `catch_unwind`: a panicking hook is logged
//! and the flow continues as if the hook were a no-op.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::Serialize;

use super::bridge::Bridge;
use super::translator::TranslatorCell;
use crate::domain::fault::arm_panic_capture;
use crate::domain::{Fault, RelayError, Reply, SlotKey};
use crate::ports::{CompletionSlot, NoopRecorder, Recorder, SlotError};

type Work = Box<dyn FnOnce() -> Result<Reply, Fault> + Send + 'static>;

/// Label used in logs for runners built with a direct slot.
const DIRECT_TARGET: &str = "<direct>";

/// Single-use wrapper around a unit of work and its target slot.
///
/// `execute` consumes the runner, so one runner delivers at most once.
pub struct TaskRunner {
    work: Work,
    target: Option<Arc<dyn CompletionSlot>>,
    key: Option<SlotKey>,
    translators: TranslatorCell,
    recorder: Arc<dyn Recorder>,
    log_dropped_success: bool,
}

impl TaskRunner {
    /// Runner with a direct target slot.
    ///
    /// The work's value is serialized to JSON; `()`/`None` become
    /// `Reply::Accepted`.
    pub fn new<F, T>(bridge: &Bridge, work: F, slot: Arc<dyn CompletionSlot>) -> Self
    where
        F: FnOnce() -> Result<T, Fault> + Send + 'static,
        T: Serialize + 'static,
    {
        Self::build(bridge, work, Some(slot), None)
    }

    /// Runner without any target. Successes are dropped and failures logged.
    pub fn detached<F, T>(bridge: &Bridge, work: F) -> Self
    where
        F: FnOnce() -> Result<T, Fault> + Send + 'static,
        T: Serialize + 'static,
    {
        Self::build(bridge, work, None, None)
    }

    /// Runner whose target is looked up once in the bridge's registry.
    ///
    /// A miss does not abort construction: it is logged as an error and the
    /// runner still executes its work, with nowhere to deliver the outcome.
    /// Use [`TaskRunner::try_for_key`] to refuse instead.
    pub fn for_key<F, T>(bridge: &Bridge, work: F, key: impl Into<SlotKey>) -> Self
    where
        F: FnOnce() -> Result<T, Fault> + Send + 'static,
        T: Serialize + 'static,
    {
        let key = key.into();
        let target = bridge.registry().lookup(&key);
        if target.is_none() {
            tracing::error!(
                key = %key,
                "no completion slot registered for key; outcome will not be delivered"
            );
        }
        Self::build(bridge, work, target, Some(key))
    }

    /// Like [`TaskRunner::for_key`], but a registry miss is an error.
    pub fn try_for_key<F, T>(
        bridge: &Bridge,
        work: F,
        key: impl Into<SlotKey>,
    ) -> Result<Self, RelayError>
    where
        F: FnOnce() -> Result<T, Fault> + Send + 'static,
        T: Serialize + 'static,
    {
        let key = key.into();
        let target = bridge
            .registry()
            .lookup(&key)
            .ok_or_else(|| RelayError::SlotNotFound(key.clone()))?;
        Ok(Self::build(bridge, work, Some(target), Some(key)))
    }

    fn build<F, T>(
        bridge: &Bridge,
        work: F,
        target: Option<Arc<dyn CompletionSlot>>,
        key: Option<SlotKey>,
    ) -> Self
    where
        F: FnOnce() -> Result<T, Fault> + Send + 'static,
        T: Serialize + 'static,
    {
        let work: Work = Box::new(move || {
            let value = work()?;
            let json = serde_json::to_value(value)?;
            Ok(Reply::from_json(json))
        });

        Self {
            work,
            target,
            key,
            translators: bridge.translators().clone(),
            recorder: Arc::new(NoopRecorder),
            log_dropped_success: bridge.config().log_dropped_success,
        }
    }

    pub fn with_recorder(mut self, recorder: Arc<dyn Recorder>) -> Self {
        self.recorder = recorder;
        self
    }

    pub fn key(&self) -> Option<&SlotKey> {
        self.key.as_ref()
    }

    /// `false` when construction could not resolve a slot.
    pub fn has_target(&self) -> bool {
        self.target.is_some()
    }

    /// Run the work and deliver its outcome.
    ///
    /// Never panics and never returns an error: failures of the work, the
    /// recorder or the translator all end up in the log.
    pub fn execute(self) {
        let label = self.label().to_string();
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| self.run())) {
            let fault = Fault::from_panic(payload);
            tracing::error!(key = %label, error = %fault, "task runner hook panicked");
        }
    }

    /// Hand the runner to tokio's blocking pool.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::task::spawn_blocking(move || self.execute())
    }

    fn label(&self) -> &str {
        self.key.as_ref().map_or(DIRECT_TARGET, SlotKey::as_str)
    }

    fn run(self) {
        let label = self.label().to_string();
        let Self {
            work,
            target,
            key,
            translators,
            recorder,
            log_dropped_success,
        } = self;

        guard_hook(&label, "on_start", || recorder.on_start(key.as_ref()));

        arm_panic_capture();
        let result = match panic::catch_unwind(AssertUnwindSafe(work)) {
            Ok(result) => result,
            Err(payload) => Err(Fault::from_panic(payload)),
        };

        match result {
            Ok(reply) => {
                let original = reply.clone();
                let reply = guard_hook(&label, "on_return", || {
                    recorder.on_return(key.as_ref(), reply)
                })
                .unwrap_or(original);
                match &target {
                    Some(slot) => report_delivery(&label, slot.complete(reply)),
                    None if log_dropped_success => {
                        tracing::warn!(key = %label, "work succeeded but has no slot; result dropped");
                    }
                    None => {}
                }
            }
            Err(fault) => {
                tracing::error!(
                    key = %label,
                    kind = ?fault.kind(),
                    location = fault.location().unwrap_or("-"),
                    chain = ?fault.chain(),
                    backtrace = %fault.backtrace(),
                    "unit of work failed: {fault}"
                );
                guard_hook(&label, "on_fault", || recorder.on_fault(key.as_ref(), &fault));

                let Some(slot) = &target else {
                    return;
                };
                match translators.translate(&fault) {
                    Some(payload) => report_delivery(&label, slot.complete_with_error(payload)),
                    None => {
                        tracing::warn!(
                            key = %label,
                            "no error translator installed; failure not delivered to slot"
                        );
                    }
                }
            }
        }
    }
}

/// Run one recorder hook; a panic is logged and yields `None`.
fn guard_hook<R>(label: &str, hook: &'static str, f: impl FnOnce() -> R) -> Option<R> {
    arm_panic_capture();
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Some(value),
        Err(payload) => {
            let fault = Fault::from_panic(payload);
            tracing::error!(key = %label, hook, error = %fault, "recorder hook panicked; ignored");
            None
        }
    }
}

fn report_delivery(label: &str, result: Result<(), SlotError>) {
    if let Err(err) = result {
        tracing::debug!(key = %label, reason = %err, "slot did not accept outcome");
    }
}
