use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The device could not be opened (wrong path, permissions, claimed elsewhere).
    #[error("Failed to open {port}: {reason}. Check the port name, that the MCU is attached, and that no other program holds the port.")]
    Unavailable { port: String, reason: String },
    /// A read or write on an open handle failed.
    #[error("IO Error: {0}")]
    Io(String),
    #[error("Not connected")]
    NotConnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParityMode {
    None,
    Even,
    Odd,
}

/// Serial configuration parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    pub port: String,
    pub baud_rate: u32,
    pub data_bits: u8,
    pub stop_bits: u8,
    pub parity: ParityMode,
    /// Upper bound on any single blocking read or write.
    pub timeout_ms: u64,
}

impl SerialConfig {
    /// Create a standard 8N1 configuration for `port` at the given baud rate
    pub fn new_8n1(port: impl Into<String>, baud_rate: u32, timeout_ms: u64) -> Self {
        Self {
            port: port.into(),
            baud_rate,
            data_bits: 8,
            stop_bits: 1,
            parity: ParityMode::None,
            timeout_ms,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// A byte-oriented serial transport.
///
/// Implementations own at most one OS handle. `open` on an already open
/// transport must release the old handle first.
pub trait Transport: Send {
    /// Open the device described by `config`.
    fn open(&mut self, config: &SerialConfig) -> Result<(), TransportError>;

    /// Release the handle. Calling this on a closed transport is a no-op.
    fn close(&mut self);

    /// Whether a handle is currently held.
    fn is_open(&self) -> bool;

    /// Return whatever bytes are buffered right now, or an empty vector.
    /// Must not wait for more data to arrive.
    fn read_available(&mut self) -> Result<Vec<u8>, TransportError>;

    /// Write all of `data` to the device.
    fn write_all(&mut self, data: &[u8]) -> Result<(), TransportError>;
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_new_8n1() {
        let config = SerialConfig::new_8n1("/dev/ttyUSB0", 115200, 2000);
        assert_eq!(config.data_bits, 8);
        assert_eq!(config.stop_bits, 1);
        assert_eq!(config.parity, ParityMode::None);
        assert_eq!(config.timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_unavailable_message_names_port() {
        let err = TransportError::Unavailable {
            port: "COM3".into(),
            reason: "Access denied".into(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to open COM3: Access denied"));
    }
}
