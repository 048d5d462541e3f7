//! Domain model (keys, outcomes, faults, errors).
//!
//! - key: `SlotKey`（registry のキー）
//! - outcome: `Reply` / `ErrorPayload` / `SlotOutcome`
//! - fault: unit of work の失敗（`Fault`, `FaultKind`）
//! - errors: crate 全体のエラー型（`RelayError`）

pub mod errors;
pub mod fault;
pub mod key;
pub mod outcome;

pub use self::errors::RelayError;
pub use self::fault::{Fault, FaultKind};
pub use self::key::SlotKey;
pub use self::outcome::{ErrorPayload, Reply, SlotOutcome};
