//! Cancellation utilities for interruptible operations
//!
//! Provides helpers for racing futures against cancellation flags,
//! enabling responsive operator shutdown between poll iterations.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Default poll interval for cancellation checks (50ms)
pub const DEFAULT_CANCEL_POLL_MS: u64 = 50;

/// Shared cancellation flag.
///
/// Cloning shares the flag. Once cancelled it stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Underlying flag, for use with [`race_with_cancellation`].
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Sleep for `duration` unless cancelled first.
    ///
    /// Returns `true` if the sleep was cut short by cancellation.
    pub async fn sleep(&self, duration: Duration) -> bool {
        race_with_cancellation(tokio::time::sleep(duration), self.flag())
            .await
            .is_none()
    }
}

/// Creates a future that completes when the interrupt flag is set
///
/// Polls the flag every 50ms by default for responsive cancellation.
pub async fn create_cancel_future(flag: Arc<AtomicBool>) {
    create_cancel_future_with_interval(flag, DEFAULT_CANCEL_POLL_MS).await
}

/// Creates a cancel future with custom poll interval
pub async fn create_cancel_future_with_interval(flag: Arc<AtomicBool>, poll_interval_ms: u64) {
    loop {
        if flag.load(Ordering::Acquire) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(poll_interval_ms)).await;
    }
}

/// Races a future against cancellation, returns None if cancelled
///
/// # Example
/// ```ignore
/// let result = race_with_cancellation(
///     tokio::time::sleep(backoff),
///     cancel.flag(),
/// ).await;
///
/// match result {
///     Some(()) => println!("Slept"),
///     None => println!("Cancelled by operator"),
/// }
/// ```
pub async fn race_with_cancellation<T, F>(fut: F, cancel_flag: Arc<AtomicBool>) -> Option<T>
where
    F: Future<Output = T>,
{
    use futures::future::{select, Either};

    if cancel_flag.load(Ordering::Acquire) {
        return None;
    }

    let cancel_fut = create_cancel_future(cancel_flag);

    match select(Box::pin(fut), Box::pin(cancel_fut)).await {
        Either::Left((result, _)) => Some(result),
        Either::Right(_) => None,
    }
}
