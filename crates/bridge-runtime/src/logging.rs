/// Centralized logging macros for the bridge
///
/// These macros give every crate the same entry points into the `log`
/// facade, so crates only depend on `bridge-runtime` and level filtering
/// is decided once by the binary.
///
/// Log debug-level message
///
/// Use for raw traffic and per-tick detail
///
/// # Example
/// ```
/// use bridge_runtime::bridge_debug;
/// bridge_debug!("ProtocolLoop: {:?} → {:?}", "Disconnected", "Connected");
/// ```
#[macro_export]
macro_rules! bridge_debug {
    ($($arg:tt)*) => {
        $crate::__log::debug!($($arg)*)
    };
}

/// Log info-level message
///
/// Use for important state changes and operator-facing events
#[macro_export]
macro_rules! bridge_info {
    ($($arg:tt)*) => {
        $crate::__log::info!($($arg)*)
    };
}

/// Log warning-level message
///
/// Use for recoverable errors and unexpected conditions
#[macro_export]
macro_rules! bridge_warn {
    ($($arg:tt)*) => {
        $crate::__log::warn!($($arg)*)
    };
}

/// Log error-level message
///
/// Use for failures the operator must act on
#[macro_export]
macro_rules! bridge_error {
    ($($arg:tt)*) => {
        $crate::__log::error!($($arg)*)
    };
}

/// Install the process-wide logger.
///
/// `RUST_LOG` wins when set; otherwise `default_level` applies. Calling this
/// twice is harmless (the second call is ignored).
pub fn init(default_level: log::LevelFilter) {
    let env = env_logger::Env::default().default_filter_or(default_level.as_str());
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init();
}
