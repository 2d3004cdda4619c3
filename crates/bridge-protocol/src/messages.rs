use std::fmt;

use crate::state::LinkState;

/// Status events emitted by the protocol loop.
///
/// These are observations for the operator, not return values. The loop
/// sends them with `try_send` and never waits for a consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemEvent {
    /// Link state has changed
    StateChanged { state: LinkState },

    /// Opening the link failed; another attempt follows after `retry_in_ms`
    LinkOpenFailed { message: String, retry_in_ms: u64 },

    /// Bytes read from the link in one poll
    DataReceived { len: usize, discarded: usize },

    /// Non-signal text from the MCU
    Telemetry { text: String },

    /// Request signal detected, fetch starting
    RequestReceived,

    /// Weather frame written to the MCU
    Responded { frame: String },

    /// Fallback frame written because the request could not be served
    FallbackSent { reason: String },

    /// History append failed (response still attempted unless persistence is required)
    PersistFailed { message: String },

    /// Writing a frame to the link failed
    WriteFailed { message: String },

    /// Loop stopped on operator request
    Shutdown,
}

impl fmt::Display for SystemEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StateChanged { state } => write!(f, "{}", state.status_text()),
            Self::LinkOpenFailed {
                message,
                retry_in_ms,
            } => write!(f, "{} (retrying in {} ms)", message, retry_in_ms),
            Self::DataReceived { len, discarded: 0 } => write!(f, "Received {} bytes", len),
            Self::DataReceived { len, discarded } => write!(
                f,
                "Received {} bytes ({} undecodable bytes dropped)",
                len, discarded
            ),
            Self::Telemetry { text } => write!(f, "MCU says: {}", text),
            Self::RequestReceived => f.write_str("Weather request received, fetching..."),
            Self::Responded { frame } => write!(f, "Sent weather frame: {}", frame),
            Self::FallbackSent { reason } => write!(f, "Sent error frame: {}", reason),
            Self::PersistFailed { message } => write!(f, "History not saved: {}", message),
            Self::WriteFailed { message } => write!(f, "Serial write failed: {}", message),
            Self::Shutdown => f.write_str("Stopped by operator"),
        }
    }
}
