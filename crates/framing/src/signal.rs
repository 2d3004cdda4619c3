/// The request marker the MCU sends when it wants a weather update.
pub const REQUEST_SIGNAL: &str = "GET_WEATHER";

/// Line endings stripped (at most one, first match wins) before comparison.
/// CRLF is listed first so `\r\n` is removed whole rather than as a bare `\n`.
pub const ALLOWED_SUFFIXES: [&str; 3] = ["\r\n", "\n", "\r"];

/// How an inbound chunk should be treated by the protocol loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Exactly the request signal: run a fetch/respond cycle.
    Trigger,
    /// Anything else with visible content. Observed, no protocol action.
    Telemetry(String),
    /// Only whitespace or line endings.
    Empty,
}

/// Strip a single allowed line-ending suffix, if present.
pub fn strip_line_ending(text: &str) -> &str {
    ALLOWED_SUFFIXES
        .iter()
        .find_map(|suffix| text.strip_suffix(suffix))
        .unwrap_or(text)
}

/// True when `text` is the request signal after suffix and whitespace trimming.
pub fn is_request_signal(text: &str) -> bool {
    strip_line_ending(text).trim() == REQUEST_SIGNAL
}

/// Classify one decoded chunk.
pub fn classify(text: &str) -> Classification {
    if is_request_signal(text) {
        return Classification::Trigger;
    }
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Classification::Empty
    } else {
        Classification::Telemetry(trimmed.to_string())
    }
}
