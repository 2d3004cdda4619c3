//! Centralized timing constants for the protocol loop
//!
//! All poll, retry, and timeout values are defined here with the reasoning
//! behind them. The binary exposes most of them as CLI overrides.
//!
//! **Before changing any constant:**
//! 1. Read its full documentation comment
//! 2. Check the MCU firmware's own timeouts (it waits for one reply per request)
//! 3. Test against a real board over USB-UART

/// Serial link timing
pub mod link {
    /// Per-operation timeout handed to the OS serial driver (milliseconds)
    ///
    /// **Value**: 2000ms
    ///
    /// **Rationale**: Reads are non-blocking (only buffered bytes are taken),
    /// so this bounds writes. A 40-byte frame at 115200 baud leaves the UART in
    /// under 4ms; anything approaching 2s means the USB bridge has stalled and
    /// the handle should be treated as broken.
    pub const BYTE_TIMEOUT_MS: u64 = 2000;

    /// Baud rate used when none is configured
    ///
    /// **Value**: 115200
    ///
    /// **Rationale**: Matches the MCU firmware's UART setup.
    pub const DEFAULT_BAUD_RATE: u32 = 115_200;
}

/// Protocol loop cadence and recovery
pub mod protocol {
    /// Delay between polls while connected (milliseconds)
    ///
    /// **Value**: 10ms
    ///
    /// **Rationale**: The MCU sends one short line per request. 10ms keeps
    /// request latency well below what a human watching the display notices,
    /// while a sleeping loop costs next to nothing in CPU.
    pub const POLL_INTERVAL_MS: u64 = 10;

    /// Wait after a failed open before trying again (milliseconds)
    ///
    /// **Value**: 1000ms
    ///
    /// **Rationale**: USB-UART bridges need 200-500ms to re-enumerate after a
    /// replug, plus OS driver setup. One second avoids hammering the driver
    /// while the device is gone and reconnects within a second once it is back.
    ///
    /// With the exponential policy this is the ceiling instead.
    pub const RECONNECT_BACKOFF_MS: u64 = 1000;

    /// First delay of the exponential backoff policy (milliseconds)
    ///
    /// **Value**: 100ms
    ///
    /// **Rationale**: Short enough that a brief lock held by another process
    /// (e.g. a serial monitor closing) is retried almost immediately.
    /// Doubles per attempt: 100, 200, 400, 800...
    pub const EXPONENTIAL_BASE_MS: u64 = 100;
}

/// Status event delivery
pub mod events {
    /// Capacity of the status event channel
    ///
    /// **Value**: 64 events
    ///
    /// **Rationale**: A serviced request produces at most five events
    /// (data, request, persist, response, state). 64 absorbs a dozen requests
    /// if the printer falls behind; past that events are dropped rather
    /// than stalling the loop.
    pub const CHANNEL_CAPACITY: usize = 64;
}
