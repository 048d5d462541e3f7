use std::time::Duration;

use thiserror::Error;

use super::key::SlotKey;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("no completion slot registered for key={0}")]
    SlotNotFound(SlotKey),

    #[error("slot key={key} was not completed within {timeout:?}")]
    TimedOut { key: SlotKey, timeout: Duration },

    #[error("slot key={0} was dropped without an outcome")]
    Abandoned(SlotKey),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("config decode: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
