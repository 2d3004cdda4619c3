//! # Weather API
//!
//! The QWeather-backed [`WeatherFetcher`](core_types::WeatherFetcher) and the
//! JSON-file [`HistoryStore`](core_types::HistoryStore).

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod client;
pub mod history;
pub mod response;
pub mod token;

pub use client::{ApiConfig, QWeatherClient};
pub use history::{JsonHistoryStore, DEFAULT_HISTORY_FILE};
pub use response::NowResponse;
pub use token::{TokenSigner, DEFAULT_TOKEN_TTL_SECS};
