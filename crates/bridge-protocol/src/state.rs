use std::fmt;

/// # Link State Machine
///
/// ```text
///        open() ok
///   ┌──────────────────┐
///   │                  ▼
/// ┌─┴────────────┐   ┌───────────┐
/// │ Disconnected │◄──┤ Connected │
/// └─┬────────────┘   └───────────┘
///   │  ▲   handle closed / read or write failed
///   └──┘
///   open() failed: back off, retry
/// ```
///
/// ## State Invariants
///
/// - **Disconnected**: no usable handle. Every tick attempts `open`; failures back off.
/// - **Connected**: handle open, polled every tick. Only here are bytes read and
///   requests serviced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// No usable link. Initial state unless the link was opened at startup.
    Disconnected,

    /// Link open and being polled.
    Connected,
}

impl LinkState {
    /// Should the loop read from the link in this state?
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    /// User-facing status text
    pub fn status_text(&self) -> &'static str {
        match self {
            Self::Disconnected => "Serial link down, reconnecting...",
            Self::Connected => "Serial link up, listening for requests",
        }
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => f.write_str("Disconnected"),
            Self::Connected => f.write_str("Connected"),
        }
    }
}
