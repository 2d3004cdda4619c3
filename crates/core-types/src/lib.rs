//! # Core Types
//!
//! Shared vocabulary for the weather bridge: the serial transport seam, the
//! weather record, and the collaborator traits the protocol loop calls.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod transport;
pub mod weather;

pub use transport::{ParityMode, SerialConfig, Transport, TransportError};
pub use weather::{FetchError, HistoryStore, PersistError, WeatherFetcher, WeatherRecord};

/// Bytes read from the link in one poll, with their best-effort text form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundChunk {
    /// The raw bytes as read.
    pub bytes: Vec<u8>,
    /// UTF-8 text with undecodable sequences dropped.
    pub text: String,
    /// Number of bytes dropped while decoding.
    pub discarded: usize,
}

impl InboundChunk {
    pub fn is_clean(&self) -> bool {
        self.discarded == 0
    }
}
