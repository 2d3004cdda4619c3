use std::path::PathBuf;
use std::time::Duration;

use bridge_loop::constants::{link, protocol};
use bridge_loop::{BackoffPolicy, LoopConfig, PersistPolicy};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use weather_api::client::{DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_LANG, DEFAULT_LOCATION};
use weather_api::{DEFAULT_HISTORY_FILE, DEFAULT_TOKEN_TTL_SECS};

pub const DEFAULT_PORT: &str = if cfg!(windows) { "COM3" } else { "/dev/ttyUSB0" };

pub const DEFAULT_PRIVATE_KEY: &str = "ed25519-private.pem";

/// Answer GET_WEATHER requests from a microcontroller with live weather data.
///
/// Settings are read from flags, then environment variables, then a `.env`
/// file in the working directory.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub run: RunArgs,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        match (self.quiet, self.verbose) {
            (true, _) => LevelFilter::Warn,
            (false, 0) => LevelFilter::Info,
            (false, 1) => LevelFilter::Debug,
            (false, _) => LevelFilter::Trace,
        }
    }

    /// The subcommand to execute; no subcommand means `run`.
    pub fn into_command(self) -> Command {
        self.command.unwrap_or(Command::Run(self.run))
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve weather requests on the serial port until Ctrl+C (default)
    Run(RunArgs),
    /// Fetch once, append to history and print the frame the MCU would get
    Fetch(FetchArgs),
    /// List serial ports
    Ports,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub serial: SerialArgs,

    #[command(flatten)]
    pub api: ApiArgs,

    #[command(flatten)]
    pub history: HistoryArgs,

    /// Delay between serial polls (ms)
    #[arg(long, default_value_t = protocol::POLL_INTERVAL_MS)]
    pub poll_interval_ms: u64,

    /// Delay before reopening a lost port (ms); ceiling for `--backoff exponential`
    #[arg(long, default_value_t = protocol::RECONNECT_BACKOFF_MS)]
    pub reconnect_backoff_ms: u64,

    #[arg(long, value_enum, default_value_t = BackoffKind::Fixed)]
    pub backoff: BackoffKind,
}

impl RunArgs {
    pub fn loop_config(&self) -> LoopConfig {
        let backoff = match self.backoff {
            BackoffKind::Fixed => BackoffPolicy::Fixed {
                delay_ms: self.reconnect_backoff_ms,
            },
            BackoffKind::Exponential => BackoffPolicy::Exponential {
                max_ms: self.reconnect_backoff_ms,
            },
        };

        LoopConfig {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            backoff,
            persist_policy: self.history.persist_policy(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    #[command(flatten)]
    pub api: ApiArgs,

    #[command(flatten)]
    pub history: HistoryArgs,
}

#[derive(Args, Debug, Clone)]
pub struct SerialArgs {
    /// Serial port the MCU is attached to
    #[arg(short, long, env = "SERIAL_PORT", default_value = DEFAULT_PORT)]
    pub port: String,

    #[arg(short, long, env = "BAUDRATE", default_value_t = link::DEFAULT_BAUD_RATE)]
    pub baud: u32,

    /// OS-level serial operation timeout (ms)
    #[arg(long, default_value_t = link::BYTE_TIMEOUT_MS)]
    pub byte_timeout_ms: u64,
}

#[derive(Args, Debug, Clone)]
pub struct ApiArgs {
    /// QWeather API host, e.g. abc123.re.qweatherapi.com
    #[arg(long, env = "API_HOST")]
    pub api_host: Option<String>,

    /// QWeather location id
    #[arg(long, env = "LOCATION_ID", default_value = DEFAULT_LOCATION)]
    pub location: String,

    #[arg(long, env = "WEATHER_LANG", default_value = DEFAULT_LANG)]
    pub lang: String,

    /// Project id, used as the token subject
    #[arg(long, env = "PROJECT_ID")]
    pub project_id: Option<String>,

    /// Credential id, sent as the token `kid`
    #[arg(long, env = "JWT_KID")]
    pub key_id: Option<String>,

    /// Ed25519 private key (PKCS#8 PEM)
    #[arg(long, env = "PRIVATE_KEY_FILE", default_value = DEFAULT_PRIVATE_KEY)]
    pub private_key: PathBuf,

    #[arg(long, env = "JWT_EXPIRE", default_value_t = DEFAULT_TOKEN_TTL_SECS)]
    pub token_ttl_secs: i64,

    #[arg(long, default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
    pub http_timeout_secs: u64,
}

#[derive(Args, Debug, Clone)]
pub struct HistoryArgs {
    #[arg(long, env = "HISTORY_FILE", default_value = DEFAULT_HISTORY_FILE)]
    pub history_file: PathBuf,

    /// Send the error frame when the history cannot be saved
    #[arg(long)]
    pub require_persist: bool,
}

impl HistoryArgs {
    pub fn persist_policy(&self) -> PersistPolicy {
        if self.require_persist {
            PersistPolicy::Required
        } else {
            PersistPolicy::BestEffort
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffKind {
    /// Wait the same interval after every failed open
    Fixed,
    /// Start at 100ms and double up to the backoff interval
    Exponential,
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_run() {
        let cli = Cli::try_parse_from([
            "weather-bridge",
            "--port",
            "/dev/ttyACM0",
            "--require-persist",
            "--backoff",
            "exponential",
        ])
        .unwrap();

        match cli.into_command() {
            Command::Run(args) => {
                assert_eq!(args.serial.port, "/dev/ttyACM0");
                let config = args.loop_config();
                assert_eq!(config.persist_policy, PersistPolicy::Required);
                assert_eq!(
                    config.backoff,
                    BackoffPolicy::Exponential {
                        max_ms: args.reconnect_backoff_ms
                    }
                );
            }
            other => panic!("expected run, got {:?}", other),
        }
    }

    #[test]
    fn test_subcommands_parse() {
        let cli = Cli::try_parse_from(["weather-bridge", "ports"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Ports)));

        let cli = Cli::try_parse_from(["weather-bridge", "-v", "fetch", "--api-host", "h"]).unwrap();
        assert_eq!(cli.log_level(), LevelFilter::Debug);
        match cli.command {
            Some(Command::Fetch(args)) => assert_eq!(args.api.api_host.as_deref(), Some("h")),
            other => panic!("expected fetch, got {:?}", other),
        }
    }

    #[test]
    fn test_history_defaults_to_existing_file_name() {
        if std::env::var_os("HISTORY_FILE").is_some() {
            return;
        }
        let cli = Cli::try_parse_from(["weather-bridge", "fetch"]).unwrap();
        match cli.command {
            Some(Command::Fetch(args)) => assert_eq!(
                args.history.history_file,
                PathBuf::from("hangzhou_weather_history.json")
            ),
            other => panic!("expected fetch, got {:?}", other),
        }
    }

    #[test]
    fn test_log_levels() {
        let cli = Cli::try_parse_from(["weather-bridge", "-q", "ports"]).unwrap();
        assert_eq!(cli.log_level(), LevelFilter::Warn);

        let cli = Cli::try_parse_from(["weather-bridge", "-vv", "ports"]).unwrap();
        assert_eq!(cli.log_level(), LevelFilter::Trace);
    }
}
