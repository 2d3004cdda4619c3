//! # Bridge Loop
//!
//! The serial request/response engine.
//!
//! ## Components
//!
//! - **LinkManager**: owns the serial handle, opens/closes it, writes CRLF lines
//! - **request_cycle**: one Fetch-Save-Respond pass, always yielding a line to send
//! - **ProtocolLoop**: the Disconnected/Connected state machine that ties them together

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod backoff;
pub mod constants;
pub mod link;
pub mod protocol_loop;
pub mod request_cycle;

pub use backoff::{calculate_retry_delay, BackoffPolicy};
pub use link::LinkManager;
pub use protocol_loop::{LoopConfig, LoopStats, ProtocolLoop, TickOutcome};
pub use request_cycle::{prepare_response, CycleReport, PersistPolicy, Response};
