//! Ports - 抽象化レイヤー
//!
//! The core talks to the outside world only through these traits:
//! - the transport layer owns `CompletionSlot` implementations
//! - process configuration installs an `ErrorTranslator`
//! - the surrounding system may attach a `Recorder` to observe invocations

pub mod completion_slot;
pub mod recorder;
pub mod translator;

pub use self::completion_slot::{CompletionSlot, SlotError};
pub use self::recorder::{NoopRecorder, Recorder};
pub use self::translator::ErrorTranslator;
