//! Process-wide bridge.
//!
//! Most code should pass a `&Bridge` around explicitly. This module exists for
//! the places that cannot (framework callbacks, static handlers): it holds one
//! `Bridge` for the whole process, initialized to an empty registry and no
//! translator unless [`init`] installs a configured one first.
//!
//! # Usage
//!
//! ```ignore
//! relay_core::app::global::install_translator(|fault: &Fault| {
//!     ErrorPayload::new(fault.message()).with_code("INTERNAL")
//! });
//!
//! let bridge = relay_core::app::global::bridge();
//! TaskRunner::for_key(&bridge, work, key).spawn();
//! ```

use std::sync::{Arc, OnceLock};

use super::bridge::Bridge;
use super::registry::SlotRegistry;
use crate::ports::ErrorTranslator;

static BRIDGE: OnceLock<Bridge> = OnceLock::new();

/// Install `bridge` as the process-wide bridge.
///
/// Returns `false` if a bridge was already in place (explicitly or through a
/// previous call to [`bridge`]); the first one stays.
pub fn init(bridge: Bridge) -> bool {
    BRIDGE.set(bridge).is_ok()
}

/// Handle to the process-wide bridge, created on first use.
pub fn bridge() -> Bridge {
    BRIDGE.get_or_init(Bridge::new).clone()
}

pub fn registry() -> SlotRegistry {
    bridge().registry().clone()
}

/// Install or replace the process-wide error translator.
pub fn install_translator(
    translator: impl ErrorTranslator + 'static,
) -> Option<Arc<dyn ErrorTranslator>> {
    bridge().translators().install(translator)
}

/// Remove the process-wide error translator. Failures go back to log-only.
pub fn clear_translator() -> Option<Arc<dyn ErrorTranslator>> {
    bridge().translators().clear()
}
