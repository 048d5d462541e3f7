//! Outcome model: what a completion slot receives and what a waiter observes.
//!
//! This module does not assume any transport. It only defines the "shape" of
//! the single outcome that travels from a unit of work to its slot.

use serde::{Deserialize, Serialize};

/// Successful outcome delivered through `CompletionSlot::complete`.
///
/// Serialized as SCREAMING_SNAKE_CASE tags: VALUE / ACCEPTED.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reply {
    /// The value produced by the unit of work.
    Value(serde_json::Value),

    /// Default success marker. Delivered when the work produced nothing
    /// meaningful (`()`, `None`, JSON `null`), so the waiter never sees an
    /// empty success.
    Accepted,
}

impl Reply {
    /// JSON `null` becomes `Accepted`; anything else is carried as a value.
    pub fn from_json(value: serde_json::Value) -> Self {
        if value.is_null() {
            Self::Accepted
        } else {
            Self::Value(value)
        }
    }

    pub fn value(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Value(v) => Some(v),
            Self::Accepted => None,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Caller-presentable error value, produced by an `ErrorTranslator`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Arbitrary structured detail (field errors, trace ids, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

impl ErrorPayload {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            detail: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// What the waiter on a slot finally observes.
pub type SlotOutcome = Result<Reply, ErrorPayload>;
