//! relay-core
//!
//! Completion bridge: run a unit of work off the calling path and deliver its
//! outcome exactly once into a completion slot that someone else is waiting on.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（SlotKey, Reply, ErrorPayload, Fault, RelayError）
//! - **ports**: 抽象化レイヤー（CompletionSlot, ErrorTranslator, Recorder）
//! - **app**: アプリケーションロジック（TaskRunner, SlotRegistry, TranslatorCell, Bridge, global）
//! - **impls**: 実装（OneshotSlot, GuardedSlot, RecordingSlot）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{
    Bridge, BridgeBuilder, BridgeConfig, PendingReply, SlotRegistry, TaskRunner, TranslatorCell,
};
pub use domain::{ErrorPayload, Fault, FaultKind, RelayError, Reply, SlotKey, SlotOutcome};
pub use ports::{CompletionSlot, ErrorTranslator, NoopRecorder, Recorder, SlotError};
