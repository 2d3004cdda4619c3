//! QWeather "current conditions" client

use std::time::Duration;

use bridge_runtime::{bridge_debug, bridge_info};
use core_types::{FetchError, WeatherFetcher, WeatherRecord};
use serde_json::Value;

use crate::response::NowResponse;
use crate::token::TokenSigner;

/// Path of the current-conditions endpoint.
pub const NOW_PATH: &str = "/v7/weather/now";

/// Format of `record_time`.
pub const RECORD_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const DEFAULT_LOCATION: &str = "101210101";
pub const DEFAULT_LANG: &str = "en";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Where and how to ask for the weather.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Account-specific API host, without scheme.
    pub host: String,
    pub location: String,
    pub lang: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            location: DEFAULT_LOCATION.to_string(),
            lang: DEFAULT_LANG.to_string(),
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }

    pub fn endpoint(&self) -> String {
        let host = self
            .host
            .trim()
            .trim_start_matches("https://")
            .trim_end_matches('/');
        format!("https://{}{}", host, NOW_PATH)
    }
}

#[derive(Debug)]
pub struct QWeatherClient {
    http: reqwest::Client,
    config: ApiConfig,
    signer: TokenSigner,
}

impl QWeatherClient {
    pub fn new(config: ApiConfig, signer: TokenSigner) -> Result<Self, FetchError> {
        if config.host.trim().is_empty() {
            return Err(FetchError::Config(
                "API host is empty. Set API_HOST to the host shown in the QWeather console."
                    .into(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Config(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            http,
            config,
            signer,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Signed request for the configured location.
    pub fn build_request(&self, now_unix: i64) -> Result<reqwest::Request, FetchError> {
        let token = self.signer.sign(now_unix)?;

        self.http
            .get(self.config.endpoint())
            .bearer_auth(token)
            .query(&[
                ("location", self.config.location.as_str()),
                ("lang", self.config.lang.as_str()),
            ])
            .build()
            .map_err(|e| FetchError::Config(format!("Invalid API request: {}", e)))
    }

    async fn fetch_body(&self) -> Result<Value, FetchError> {
        let request = self.build_request(chrono::Utc::now().timestamp())?;
        bridge_debug!("QWeatherClient: GET {}", request.url());

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| FetchError::Network(describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| FetchError::Network(describe(&e)))?;

        let body: Value =
            serde_json::from_str(&text).map_err(|e| FetchError::Malformed(e.to_string()))?;

        bridge_debug!(
            "QWeatherClient: Raw response:\n{}",
            serde_json::to_string_pretty(&body).unwrap_or(text)
        );

        Ok(body)
    }
}

impl WeatherFetcher for QWeatherClient {
    async fn fetch(&mut self) -> Result<WeatherRecord, FetchError> {
        let body = self.fetch_body().await?;
        let captured_at = chrono::Local::now().format(RECORD_TIME_FORMAT).to_string();

        let record = NowResponse::parse(&body)?.into_record(captured_at)?;
        bridge_info!(
            "QWeatherClient: {} temp={} feels_like={} precip={} icon={} humidity={}",
            self.config.location,
            record.temp,
            record.feels_like,
            record.precip,
            record.icon,
            record.humidity
        );

        Ok(record)
    }
}

fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("timed out ({})", err)
    } else {
        err.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::token::tests::test_signer;

    #[test]
    fn test_endpoint_normalizes_host() {
        assert_eq!(
            ApiConfig::new("abc123.re.qweatherapi.com").endpoint(),
            "https://abc123.re.qweatherapi.com/v7/weather/now"
        );
        assert_eq!(
            ApiConfig::new("https://abc123.re.qweatherapi.com/").endpoint(),
            "https://abc123.re.qweatherapi.com/v7/weather/now"
        );
    }

    #[test]
    fn test_request_carries_query_and_bearer() {
        let client =
            QWeatherClient::new(ApiConfig::new("abc123.re.qweatherapi.com"), test_signer()).unwrap();

        let request = client.build_request(1_700_000_000).unwrap();

        assert_eq!(*request.method(), reqwest::Method::GET);
        assert_eq!(request.url().path(), "/v7/weather/now");
        assert_eq!(request.url().query(), Some("location=101210101&lang=en"));

        let auth = request
            .headers()
            .get(reqwest::header::AUTHORIZATION)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(auth.starts_with("Bearer "));
        assert_eq!(auth.matches('.').count(), 2);
    }

    #[test]
    fn test_empty_host_rejected() {
        let err = QWeatherClient::new(ApiConfig::new("  "), test_signer()).unwrap_err();
        assert!(matches!(err, FetchError::Config(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let mut config = ApiConfig::new("127.0.0.1:9");
        config.timeout = Duration::from_millis(500);
        let mut client = QWeatherClient::new(config, test_signer()).unwrap();

        let err = client.fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)), "got {:?}", err);
    }
}
