//! # Bridge Protocol
//!
//! Type definitions shared between the protocol loop and whatever observes it.
//!
//! This crate has no I/O of its own, which keeps it fully testable:
//!
//! - **BridgeError**: the failure taxonomy of the bridge
//! - **LinkState**: the two-state link FSM (pure logic, no side effects)
//! - **SystemEvent**: status events from the loop to the operator
//!
//! ## Event Flow
//!
//! ```text
//! ProtocolLoop → SystemEvent → status printer (stdout)
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod errors;
pub mod messages;
pub mod state;

pub use errors::BridgeError;
pub use messages::SystemEvent;
pub use state::LinkState;
