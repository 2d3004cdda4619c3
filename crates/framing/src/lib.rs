//! # Framing
//!
//! The two halves of the MCU wire grammar: classifying inbound text as a
//! request signal, and building the CRLF-terminated outbound frames.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod outbound;
pub mod signal;

pub use outbound::{encode_line, OutboundFrame, FALLBACK_FRAME, FRAME_TERMINATOR};
pub use signal::{classify, is_request_signal, Classification, REQUEST_SIGNAL};
