//! QWeather `/v7/weather/now` response body

use core_types::{FetchError, WeatherRecord};
use serde::Deserialize;
use serde_json::Value;

/// Provider status code for a successful lookup.
pub const SUCCESS_CODE: &str = "200";

/// Substituted when the provider omits humidity.
pub const DEFAULT_HUMIDITY: &str = "0";

#[derive(Debug, Clone, Deserialize)]
pub struct NowResponse {
    pub code: Option<String>,
    pub now: Option<Observation>,
}

/// The `now` object. Fields stay loosely typed because the provider sends
/// numbers as strings but nothing guarantees it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub temp: Option<Value>,
    pub feels_like: Option<Value>,
    pub precip: Option<Value>,
    pub icon: Option<Value>,
    pub humidity: Option<Value>,
}

impl NowResponse {
    pub fn parse(body: &Value) -> Result<Self, FetchError> {
        serde_json::from_value(body.clone()).map_err(|e| FetchError::Malformed(e.to_string()))
    }

    /// Map into a record stamped with `captured_at`.
    pub fn into_record(self, captured_at: String) -> Result<WeatherRecord, FetchError> {
        if let Some(code) = self.code.as_deref() {
            if code != SUCCESS_CODE {
                return Err(FetchError::Provider(code.to_string()));
            }
        }

        let now = self.now.ok_or(FetchError::MissingField("now"))?;

        Ok(WeatherRecord {
            record_time: captured_at,
            temp: text(now.temp, "now.temp")?,
            feels_like: text(now.feels_like, "now.feelsLike")?,
            precip: text(now.precip, "now.precip")?,
            icon: text(now.icon, "now.icon")?,
            humidity: text(now.humidity, "now.humidity")
                .unwrap_or_else(|_| DEFAULT_HUMIDITY.to_string()),
        })
    }
}

fn text(value: Option<Value>, field: &'static str) -> Result<String, FetchError> {
    match value {
        Some(Value::String(s)) => Ok(s),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(FetchError::MissingField(field)),
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body() -> Value {
        json!({
            "code": "200",
            "updateTime": "2024-01-01T12:00+08:00",
            "now": {
                "obsTime": "2024-01-01T11:50+08:00",
                "temp": "20",
                "feelsLike": "19",
                "icon": "100",
                "text": "Sunny",
                "humidity": "55",
                "precip": "0.0"
            }
        })
    }

    #[test]
    fn test_maps_observation() {
        let record = NowResponse::parse(&body())
            .unwrap()
            .into_record("2024-01-01 12:00:00".into())
            .unwrap();

        assert_eq!(record.temp, "20");
        assert_eq!(record.feels_like, "19");
        assert_eq!(record.precip, "0.0");
        assert_eq!(record.icon, "100");
        assert_eq!(record.humidity, "55");
        assert_eq!(record.record_time, "2024-01-01 12:00:00");
    }

    #[test]
    fn test_missing_humidity_defaults() {
        let mut body = body();
        body["now"].as_object_mut().unwrap().remove("humidity");

        let record = NowResponse::parse(&body)
            .unwrap()
            .into_record("t".into())
            .unwrap();
        assert_eq!(record.humidity, "0");
    }

    #[test]
    fn test_missing_required_field() {
        let mut body = body();
        body["now"].as_object_mut().unwrap().remove("feelsLike");

        let err = NowResponse::parse(&body)
            .unwrap()
            .into_record("t".into())
            .unwrap_err();
        assert_eq!(err, FetchError::MissingField("now.feelsLike"));
    }

    #[test]
    fn test_numeric_values_accepted() {
        let mut body = body();
        body["now"]["temp"] = json!(-3);

        let record = NowResponse::parse(&body)
            .unwrap()
            .into_record("t".into())
            .unwrap();
        assert_eq!(record.temp, "-3");
    }

    #[test]
    fn test_provider_error_code() {
        let err = NowResponse::parse(&json!({ "code": "401" }))
            .unwrap()
            .into_record("t".into())
            .unwrap_err();
        assert_eq!(err, FetchError::Provider("401".into()));
    }

    #[test]
    fn test_missing_now() {
        let err = NowResponse::parse(&json!({ "code": "200" }))
            .unwrap()
            .into_record("t".into())
            .unwrap_err();
        assert_eq!(err, FetchError::MissingField("now"));
    }

    #[test]
    fn test_wrong_shape_is_malformed() {
        let err = NowResponse::parse(&json!({ "code": 200 })).unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }
}
