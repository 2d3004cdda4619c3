//! Byte-level decoding of inbound serial traffic.

pub mod hex;
pub mod utf8;

pub use hex::hex_dump;
pub use utf8::{decode_chunk, decode_lossy};
