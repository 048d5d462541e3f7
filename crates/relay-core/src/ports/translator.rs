//! ErrorTranslator port - Fault から呼び出し側向けのエラーへの変換

use crate::domain::{ErrorPayload, Fault};

/// Converts an internal fault into a caller-presentable error payload.
///
/// Consulted at most once per failed unit of work. Should be pure: it runs on
/// whatever worker executed the failed work.
///
/// Closures work directly:
/// ```ignore
/// bridge.translators().install(|fault: &Fault| ErrorPayload::new(format!("ERR:{}", fault.message())));
/// ```
pub trait ErrorTranslator: Send + Sync {
    fn translate(&self, fault: &Fault) -> ErrorPayload;
}

impl<F> ErrorTranslator for F
where
    F: Fn(&Fault) -> ErrorPayload + Send + Sync,
{
    fn translate(&self, fault: &Fault) -> ErrorPayload {
        self(fault)
    }
}
