use crate::constants::protocol::{EXPONENTIAL_BASE_MS, RECONNECT_BACKOFF_MS};

/// Calculates the retry delay in milliseconds for a given attempt number.
///
/// Uses exponential backoff:
/// - Base delay: 100ms
/// - Multiplier: 2^(attempt - 1)
///
/// # Arguments
/// * `attempt` - The current retry attempt number (1-based)
///
/// # Returns
/// Delay in milliseconds
pub fn calculate_retry_delay(attempt: u32) -> u64 {
    if attempt == 0 {
        return 0;
    }

    // Clamp the shift so the multiplication saturates instead of overflowing
    let shift = attempt.saturating_sub(1).min(30);

    EXPONENTIAL_BASE_MS.saturating_mul(1 << shift)
}

/// How long to wait before the next open attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffPolicy {
    /// Same delay after every failure.
    Fixed { delay_ms: u64 },
    /// [`calculate_retry_delay`], capped at `max_ms`.
    Exponential { max_ms: u64 },
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::Fixed {
            delay_ms: RECONNECT_BACKOFF_MS,
        }
    }
}

impl BackoffPolicy {
    /// Delay after the `attempt`-th consecutive failure (1-based).
    pub fn delay_for(&self, attempt: u32) -> u64 {
        match *self {
            Self::Fixed { delay_ms } => delay_ms,
            Self::Exponential { max_ms } => calculate_retry_delay(attempt).min(max_ms),
        }
    }
}
