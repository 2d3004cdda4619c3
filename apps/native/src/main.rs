#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

mod cli;
mod status;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context as _;
use bridge_loop::constants::events::CHANNEL_CAPACITY;
use bridge_loop::{prepare_response, LinkManager, LoopStats, ProtocolLoop, Response};
use bridge_runtime::{bridge_error, bridge_info, bridge_warn, CancelToken};
use clap::Parser;
use cli::{ApiArgs, Cli, Command, FetchArgs, RunArgs};
use core_types::SerialConfig;
use futures_channel::mpsc;
use transport_native::NativeSerialTransport;
use weather_api::{ApiConfig, JsonHistoryStore, QWeatherClient, TokenSigner};

#[tokio::main]
async fn main() -> ExitCode {
    // .env first so clap's env fallbacks see it
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    bridge_runtime::logging::init(cli.log_level());

    if let Ok(path) = dotenv {
        bridge_info!("Loaded settings from {}", path.display());
    }

    let result = match cli.into_command() {
        Command::Run(args) => run(args).await,
        Command::Fetch(args) => fetch(args).await,
        Command::Ports => ports(),
    };

    result.unwrap_or_else(|e| {
        bridge_error!("{:#}", e);
        ExitCode::FAILURE
    })
}

async fn run(args: RunArgs) -> anyhow::Result<ExitCode> {
    let fetcher = build_client(&args.api)?;
    let history = JsonHistoryStore::new(&args.history.history_file);

    let serial = SerialConfig::new_8n1(
        args.serial.port.clone(),
        args.serial.baud,
        args.serial.byte_timeout_ms,
    );
    let mut link = LinkManager::new(NativeSerialTransport::new(), serial);
    link.open()
        .with_context(|| format!("Cannot start without serial port {}", args.serial.port))?;

    let (event_tx, event_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let printer = tokio::spawn(status::print_events(event_rx));

    let cancel = CancelToken::new();
    tokio::spawn(watch_ctrl_c(cancel.clone()));

    let protocol = ProtocolLoop::new(link, fetcher, history, args.loop_config(), event_tx);
    let stats = protocol.run(cancel).await;

    // The loop owned the only sender, so the printer drains and exits
    if let Err(e) = printer.await {
        bridge_warn!("Status printer ended abnormally: {}", e);
    }
    log_stats(&stats);

    Ok(ExitCode::SUCCESS)
}

async fn fetch(args: FetchArgs) -> anyhow::Result<ExitCode> {
    let mut client = build_client(&args.api)?;
    let mut history = JsonHistoryStore::new(&args.history.history_file);

    let report = prepare_response(&mut client, &mut history, args.history.persist_policy()).await;
    println!("{}", report.response.wire_line());

    if let Some(len) = report.history_len {
        println!(
            "Appended to {} ({} records)",
            args.history.history_file.display(),
            len
        );
    }
    if let Some(e) = &report.persist_error {
        bridge_warn!("{}", e);
    }

    match report.response {
        Response::Weather(_) => Ok(ExitCode::SUCCESS),
        Response::Fallback { reason } => {
            bridge_error!("{}", reason);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn ports() -> anyhow::Result<ExitCode> {
    let ports = transport_native::list_ports().context("Listing serial ports failed")?;

    if ports.is_empty() {
        println!("No serial ports found.");
    }
    for port in ports {
        println!("{:<24} {}", port.name, port.description);
    }

    Ok(ExitCode::SUCCESS)
}

fn build_client(api: &ApiArgs) -> anyhow::Result<QWeatherClient> {
    let host = api
        .api_host
        .clone()
        .context("API_HOST is not set. Add it to .env or pass --api-host.")?;

    let signer = TokenSigner::from_pem_file(
        &api.private_key,
        api.key_id.clone(),
        api.project_id.clone(),
        api.token_ttl_secs,
    )?;

    let mut config = ApiConfig::new(host);
    config.location = api.location.clone();
    config.lang = api.lang.clone();
    config.timeout = Duration::from_secs(api.http_timeout_secs);

    Ok(QWeatherClient::new(config, signer)?)
}

async fn watch_ctrl_c(cancel: CancelToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            bridge_info!("Ctrl+C received, shutting down");
            cancel.cancel();
        }
        Err(e) => bridge_warn!("Cannot listen for Ctrl+C: {}", e),
    }
}

fn log_stats(stats: &LoopStats) {
    bridge_info!(
        "Session: {} requests, {} frames, {} fallbacks, {} telemetry lines, {} bytes in {} chunks",
        stats.triggers,
        stats.frames_sent,
        stats.fallbacks_sent,
        stats.telemetry_lines,
        stats.bytes_seen,
        stats.chunks
    );
    if stats.reconnects + stats.write_failures + stats.persist_failures > 0 {
        bridge_warn!(
            "Session: {} reconnects, {} write failures, {} history failures",
            stats.reconnects,
            stats.write_failures,
            stats.persist_failures
        );
    }
}
