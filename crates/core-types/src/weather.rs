use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single weather snapshot as captured from the provider.
///
/// Values are kept as the provider's strings so the outbound frame carries
/// exactly what was received. Records are append-only once persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherRecord {
    /// Local capture time, `YYYY-MM-DD HH:MM:SS`.
    pub record_time: String,
    pub temp: String,
    pub feels_like: String,
    pub precip: String,
    /// Condition icon code. Stored as `icons` to match existing history files.
    #[serde(rename = "icons")]
    pub icon: String,
    pub humidity: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Credentials or request settings are unusable
    #[error("Weather request not configured: {0}")]
    Config(String),

    /// Transport-level failure (DNS, TLS, timeout, connection reset)
    #[error("Weather API request failed: {0}")]
    Network(String),

    /// Non-2xx HTTP status
    #[error("Weather API returned HTTP {0}")]
    Status(u16),

    /// Provider answered 2xx but reported an error code in the body
    #[error("Weather API reported error code {0}")]
    Provider(String),

    /// Body was not the JSON shape we expect
    #[error("Weather API response malformed: {0}")]
    Malformed(String),

    /// A required field was absent from the observation
    #[error("Weather API response missing field `{0}`")]
    MissingField(&'static str),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistError {
    #[error("History store I/O failed: {0}")]
    Io(String),

    #[error("History store is not valid JSON: {0}")]
    Corrupt(String),

    /// The store exists but holds something other than a list. Refusing to overwrite it.
    #[error("History store does not contain a list; fix or move the file before retrying")]
    NotAList,
}

/// Source of fresh weather records.
#[allow(async_fn_in_trait)]
pub trait WeatherFetcher {
    /// Fetch the current conditions. Implementations must bound the call with a timeout.
    async fn fetch(&mut self) -> Result<WeatherRecord, FetchError>;
}

/// Append-only persisted history of weather records.
pub trait HistoryStore {
    /// Append `record` and return the new history length.
    fn append(&mut self, record: &WeatherRecord) -> Result<usize, PersistError>;
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn sample() -> WeatherRecord {
        WeatherRecord {
            record_time: "2024-01-01 12:00:00".into(),
            temp: "20".into(),
            feels_like: "19".into(),
            precip: "0".into(),
            icon: "100".into(),
            humidity: "55".into(),
        }
    }

    #[test]
    fn test_record_uses_icons_key() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["icons"], "100");
        assert!(json.get("icon").is_none());
    }

    #[test]
    fn test_record_reads_legacy_entry() {
        let legacy = r#"{
            "record_time": "2025-12-27 08:00:00",
            "temp": "7",
            "feels_like": "4",
            "precip": "0.0",
            "icons": "101",
            "humidity": "80"
        }"#;
        let record: WeatherRecord = serde_json::from_str(legacy).unwrap();
        assert_eq!(record.icon, "101");
        assert_eq!(record.precip, "0.0");
    }

    #[test]
    fn test_fetch_error_display() {
        assert_eq!(
            FetchError::MissingField("feelsLike").to_string(),
            "Weather API response missing field `feelsLike`"
        );
        assert_eq!(FetchError::Status(401).to_string(), "Weather API returned HTTP 401");
    }
}
