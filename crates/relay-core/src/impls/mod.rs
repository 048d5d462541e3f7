//! Impls - ports の実装（開発用・テスト用）
//!
//! # 含まれる実装
//! - **OneshotSlot**: tokio oneshot ベースの CompletionSlot（in-process transport 用）
//! - **GuardedSlot**: 外部 slot に exactly-once ガードを付けるアダプタ
//! - **RecordingSlot**: 呼び出しを記録するだけの slot（テスト用）

pub mod guarded;
pub mod oneshot_slot;
pub mod recording;

pub use self::guarded::GuardedSlot;
pub use self::oneshot_slot::{OneshotSlot, SlotWaiter};
pub use self::recording::{RecordingSlot, SlotCall};
