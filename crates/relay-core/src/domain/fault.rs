//! Fault - unit of work の失敗
//!
//! Work closures return `Result<T, Fault>`. Any `std::error::Error` converts
//! into a `Fault` with `?`, and a panic caught by the runner becomes a
//! `Fault` of kind `Panic`.
//!
//! `Fault` intentionally does not implement `std::error::Error` itself, so the
//! blanket `From<E: Error>` conversion stays coherent.
//!
//! Every fault carries a [`Backtrace`] captured where it was built. Capture
//! follows `RUST_BACKTRACE` / `RUST_LIB_BACKTRACE`. For panics the runner arms
//! a panic hook so the fault gets the panic's own location and backtrace
//! instead of the ones at the `catch_unwind` site.

use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::RefCell;
use std::error::Error as StdError;
use std::fmt;
use std::panic;
use std::sync::Once;

/// Location and stack recorded by the panic hook, consumed by `from_panic`.
struct PanicSite {
    location: Option<String>,
    backtrace: Backtrace,
}

thread_local! {
    static PANIC_SITE: RefCell<Option<PanicSite>> = const { RefCell::new(None) };
}

static PANIC_HOOK: Once = Once::new();

/// Install the recording panic hook once, then clear this thread's record.
///
/// The hook chains to whatever hook was installed before it, so default
/// panic output is unchanged.
pub(crate) fn arm_panic_capture() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let site = PanicSite {
                location: info.location().map(ToString::to_string),
                backtrace: Backtrace::capture(),
            };
            PANIC_SITE.with(|slot| *slot.borrow_mut() = Some(site));
            previous(info);
        }));
    });
    PANIC_SITE.with(|slot| *slot.borrow_mut() = None);
}

/// FaultKind は失敗の分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// The work returned an error.
    Error,
    /// The work panicked.
    Panic,
}

/// A failure raised by a unit of work.
#[derive(Debug)]
pub struct Fault {
    kind: FaultKind,
    message: String,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    location: Option<String>,
    backtrace: Backtrace,
}

impl Fault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            kind: FaultKind::Error,
            message: message.into(),
            source: None,
            location: None,
            backtrace: Backtrace::capture(),
        }
    }

    /// Build a fault from a caught panic payload.
    ///
    /// Picks up the location recorded by the panic hook on this thread, if
    /// the hook is armed.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        let (location, backtrace) = match PANIC_SITE.with(|slot| slot.borrow_mut().take()) {
            Some(site) => (site.location, site.backtrace),
            None => (None, Backtrace::capture()),
        };
        Self {
            kind: FaultKind::Panic,
            message,
            source: None,
            location,
            backtrace,
        }
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> FaultKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    /// `file:line:column` of the panic, for panic faults caught by a runner.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    /// Messages of the whole source chain, outermost first.
    ///
    /// The first source is skipped when its message equals the fault's own
    /// message (the `From<E>` case), so logs do not repeat it.
    pub fn chain(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut next = self
            .source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static));
        while let Some(e) = next {
            let msg = e.to_string();
            if !(out.is_empty() && msg == self.message) {
                out.push(msg);
            }
            next = e.source();
        }
        out
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FaultKind::Error => f.write_str(&self.message),
            FaultKind::Panic => match &self.location {
                Some(location) => write!(f, "panicked at {location}: {}", self.message),
                None => write!(f, "panicked: {}", self.message),
            },
        }
    }
}

impl<E> From<E> for Fault
where
    E: StdError + Send + Sync + 'static,
{
    fn from(err: E) -> Self {
        Self {
            kind: FaultKind::Error,
            message: err.to_string(),
            source: Some(Box::new(err)),
            location: None,
            backtrace: Backtrace::capture(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("outer failure")]
    struct Outer(#[source] Inner);

    #[derive(Debug, thiserror::Error)]
    #[error("inner failure")]
    struct Inner;

    #[test]
    fn new_fault_has_message_and_no_source() {
        let f = Fault::new("boom");
        assert_eq!(f.kind(), FaultKind::Error);
        assert_eq!(f.message(), "boom");
        assert!(f.source().is_none());
        assert!(f.chain().is_empty());
        assert_eq!(f.to_string(), "boom");
    }

    #[test]
    fn question_mark_converts_std_errors() {
        fn parse() -> Result<i32, Fault> {
            Ok("nope".parse::<i32>()?)
        }

        let f = parse().unwrap_err();
        assert_eq!(f.kind(), FaultKind::Error);
        assert!(f.message().contains("invalid digit"));
        assert!(f.source().is_some());
    }

    #[test]
    fn chain_walks_sources_without_repeating_message() {
        let f = Fault::from(Outer(Inner));
        assert_eq!(f.message(), "outer failure");
        assert_eq!(f.chain(), vec!["inner failure".to_string()]);

        let f = Fault::new("load user").with_source(Outer(Inner));
        assert_eq!(
            f.chain(),
            vec!["outer failure".to_string(), "inner failure".to_string()]
        );
    }

    #[test]
    fn panic_payloads_are_readable() {
        let f = Fault::from_panic(Box::new("static str"));
        assert_eq!(f.kind(), FaultKind::Panic);
        assert_eq!(f.message(), "static str");
        assert_eq!(f.to_string(), "panicked: static str");

        let f = Fault::from_panic(Box::new(String::from("owned")));
        assert_eq!(f.message(), "owned");

        let f = Fault::from_panic(Box::new(7_u8));
        assert_eq!(f.message(), "unknown panic");
    }

    #[test]
    fn armed_hook_records_panic_location() {
        arm_panic_capture();
        let payload = panic::catch_unwind(|| panic!("located")).unwrap_err();
        let f = Fault::from_panic(payload);

        let location = f.location().expect("hook should record a location");
        assert!(location.contains("fault.rs"), "location was {location}");
        assert!(f.to_string().starts_with("panicked at "));
        assert!(f.to_string().ends_with(": located"));

        // consumed: a later fault on this thread does not inherit it
        let f = Fault::from_panic(Box::new("no hook ran"));
        assert!(f.location().is_none());
    }

    #[test]
    fn every_fault_carries_a_backtrace() {
        for f in [Fault::new("a"), Fault::from(Outer(Inner))] {
            // "disabled backtrace" unless RUST_BACKTRACE is set
            assert!(!f.backtrace().to_string().is_empty());
            assert!(f.location().is_none());
        }
    }
}
