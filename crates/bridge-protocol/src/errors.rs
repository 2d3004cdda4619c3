//! Error Handling Guidelines
//!
//! All error messages should follow this format:
//!
//! 1. **What failed**: Describe the operation that failed
//! 2. **Why it failed**: Provide the root cause if known
//! 3. **What to do**: Suggest user action when possible
//!
//! Examples:
//! - ✅ "Serial link unavailable: Failed to open COM3: Access denied. Close other programs and retry."
//! - ✅ "Weather request failed: Weather API returned HTTP 401"
//! - ❌ "Open failed" (lacks context and action)

use core_types::{FetchError, PersistError, TransportError};
use thiserror::Error;

/// Unified error type for the bridge
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// Device cannot be opened or reopened
    #[error("Serial link unavailable: {0}")]
    LinkUnavailable(String),

    /// A read or write on an open handle failed
    #[error("Serial link I/O failed: {0}")]
    LinkIo(String),

    /// Weather provider could not deliver a usable record
    #[error("Weather request failed: {0}")]
    Fetch(FetchError),

    /// History could not be written
    #[error("Saving weather history failed: {0}")]
    Persist(#[from] PersistError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Unusable credentials or request settings are configuration errors, not
/// provider failures, whichever stage reports them.
impl From<FetchError> for BridgeError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Config(msg) => BridgeError::Config(msg),
            other => BridgeError::Fetch(other),
        }
    }
}

impl From<TransportError> for BridgeError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Unavailable { .. } => BridgeError::LinkUnavailable(err.to_string()),
            TransportError::Io(_) | TransportError::NotConnected => {
                BridgeError::LinkIo(err.to_string())
            }
        }
    }
}
