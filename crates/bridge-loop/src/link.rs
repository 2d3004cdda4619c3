//! Link Manager
//!
//! Owns the single serial handle and turns transport failures into
//! [`BridgeError`]s. It never retries on its own; reopen policy belongs to
//! the protocol loop.

use bridge_protocol::BridgeError;
use bridge_runtime::{bridge_debug, bridge_info, bridge_warn};
use core_types::{SerialConfig, Transport};
use framing::encode_line;

pub struct LinkManager<T: Transport> {
    transport: T,
    config: SerialConfig,
    last_error: Option<BridgeError>,
}

impl<T: Transport> LinkManager<T> {
    pub fn new(transport: T, config: SerialConfig) -> Self {
        Self {
            transport,
            config,
            last_error: None,
        }
    }

    pub fn config(&self) -> &SerialConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Most recent write failure, if any.
    pub fn last_error(&self) -> Option<&BridgeError> {
        self.last_error.as_ref()
    }

    /// (Re)open the configured port with 8-N-1 framing.
    ///
    /// Any handle already held is released first. Every failure, whatever
    /// the transport reported, is `LinkUnavailable`.
    pub fn open(&mut self) -> Result<(), BridgeError> {
        self.transport.close();

        match self.transport.open(&self.config) {
            Ok(()) => {
                self.last_error = None;
                bridge_info!(
                    "LinkManager: Opened {} at {} baud",
                    self.config.port,
                    self.config.baud_rate
                );
                Ok(())
            }
            Err(e) => Err(BridgeError::LinkUnavailable(e.to_string())),
        }
    }

    pub fn close(&mut self) {
        if self.transport.is_open() {
            bridge_debug!("LinkManager: Closing {}", self.config.port);
        }
        self.transport.close();
    }

    pub fn is_open(&self) -> bool {
        self.transport.is_open()
    }

    /// Buffered bytes, or empty when nothing has arrived. Never waits.
    pub fn read_available(&mut self) -> Result<Vec<u8>, BridgeError> {
        self.transport.read_available().map_err(BridgeError::from)
    }

    /// Write `line` plus CRLF.
    ///
    /// Returns `false` on failure and closes the handle, so the next
    /// liveness check sees a dead link. The reason is logged and kept in
    /// [`last_error`](Self::last_error).
    pub fn write_line(&mut self, line: &str) -> bool {
        let bytes = encode_line(line);

        match self.transport.write_all(&bytes) {
            Ok(()) => {
                bridge_debug!("LinkManager: TX {} bytes: {:?}", bytes.len(), line);
                true
            }
            Err(e) => {
                let err = BridgeError::from(e);
                bridge_warn!("LinkManager: {}. Closing link for reconnect.", err);
                self.last_error = Some(err);
                self.transport.close();
                false
            }
        }
    }
}
