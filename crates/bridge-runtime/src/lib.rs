//! # Bridge Runtime
//!
//! Runtime plumbing shared by the bridge crates:
//! - **Logging macros**: `bridge_debug!` and friends over the `log` facade
//! - **Cancellation**: a shared flag the operator interrupt sets, and helpers
//!   to race sleeps against it

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod cancellation;
pub mod logging;

#[doc(hidden)]
pub use log as __log;

pub use cancellation::{
    create_cancel_future, create_cancel_future_with_interval, race_with_cancellation,
    CancelToken, DEFAULT_CANCEL_POLL_MS,
};
