//! Configuration-boundary errors
//!
//! The simulation itself never fails; only loading tuning data and
//! editing key bindings can be rejected.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid tuning: {0}")]
    Invalid(String),
    #[error("Key {0:?} is reserved and cannot be bound")]
    ReservedKey(String),
    #[error("{0} is not a control of the active drive system")]
    InactiveSlot(&'static str),
}
