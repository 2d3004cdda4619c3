//! Protocol Loop
//!
//! Drives the two-state link machine ([`LinkState`]) and services one request
//! at a time. The loop is the only owner of the link, the fetcher and the
//! history store; nothing else can touch the serial handle while it runs.

use std::time::Duration;

use bridge_protocol::{LinkState, SystemEvent};
use bridge_runtime::{bridge_debug, bridge_info, bridge_warn, CancelToken};
use core_types::{HistoryStore, Transport, WeatherFetcher};
use decoders::{decode_chunk, hex_dump};
use framing::{classify, Classification};
use futures_channel::mpsc;

use crate::backoff::BackoffPolicy;
use crate::constants::protocol::POLL_INTERVAL_MS;
use crate::link::LinkManager;
use crate::request_cycle::{prepare_response, PersistPolicy, Response};

/// Tunables for [`ProtocolLoop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    pub poll_interval: Duration,
    pub backoff: BackoffPolicy,
    pub persist_policy: PersistPolicy,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(POLL_INTERVAL_MS),
            backoff: BackoffPolicy::default(),
            persist_policy: PersistPolicy::default(),
        }
    }
}

/// Counters accumulated over the life of the loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub bytes_seen: u64,
    pub chunks: u64,
    pub telemetry_lines: u64,
    pub triggers: u64,
    pub frames_sent: u64,
    pub fallbacks_sent: u64,
    pub persist_failures: u64,
    pub write_failures: u64,
    /// Successful opens after the link had been up at least once.
    pub reconnects: u64,
}

/// What a single [`ProtocolLoop::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Link opened; polling starts next tick.
    Opened,
    /// Open failed; wait `retry_in` before the next tick.
    OpenFailed { retry_in: Duration },
    /// Link found closed or broken; now Disconnected.
    LinkLost,
    /// Nothing to act on.
    Idle,
    /// Non-signal text observed and discarded.
    Telemetry,
    /// A request was answered (or the write of the answer failed).
    Served { fallback: bool, written: bool },
}

pub struct ProtocolLoop<T, F, H>
where
    T: Transport,
    F: WeatherFetcher,
    H: HistoryStore,
{
    link: LinkManager<T>,
    fetcher: F,
    history: H,
    config: LoopConfig,
    state: LinkState,
    event_tx: mpsc::Sender<SystemEvent>,
    stats: LoopStats,
    open_attempt: u32,
    was_connected: bool,
}

impl<T, F, H> ProtocolLoop<T, F, H>
where
    T: Transport,
    F: WeatherFetcher,
    H: HistoryStore,
{
    /// Starts Connected when `link` is already open, Disconnected otherwise.
    pub fn new(
        link: LinkManager<T>,
        fetcher: F,
        history: H,
        config: LoopConfig,
        event_tx: mpsc::Sender<SystemEvent>,
    ) -> Self {
        let state = if link.is_open() {
            LinkState::Connected
        } else {
            LinkState::Disconnected
        };

        Self {
            link,
            fetcher,
            history,
            config,
            state,
            event_tx,
            stats: LoopStats::default(),
            open_attempt: 0,
            was_connected: state.is_connected(),
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn link(&self) -> &LinkManager<T> {
        &self.link
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    /// Run until `cancel` fires, then close the link.
    pub async fn run(mut self, cancel: CancelToken) -> LoopStats {
        bridge_info!(
            "ProtocolLoop: Starting on {} ({})",
            self.link.config().port,
            self.state
        );

        while !cancel.is_cancelled() {
            let pause = match self.tick().await {
                TickOutcome::OpenFailed { retry_in } => retry_in,
                _ => self.config.poll_interval,
            };

            if cancel.sleep(pause).await {
                break;
            }
        }

        self.link.close();
        self.state = LinkState::Disconnected;
        self.send_event(SystemEvent::Shutdown);
        bridge_info!("ProtocolLoop: Stopped");

        self.stats
    }

    /// One iteration of the state machine. Sleeping is left to the caller.
    pub async fn tick(&mut self) -> TickOutcome {
        match self.state {
            LinkState::Disconnected => self.try_open(),
            LinkState::Connected => self.poll().await,
        }
    }

    fn try_open(&mut self) -> TickOutcome {
        match self.link.open() {
            Ok(()) => {
                if self.was_connected {
                    self.stats.reconnects += 1;
                }
                self.was_connected = true;
                self.open_attempt = 0;
                self.transition(LinkState::Connected);
                TickOutcome::Opened
            }
            Err(e) => {
                self.open_attempt = self.open_attempt.saturating_add(1);
                let retry_in_ms = self.config.backoff.delay_for(self.open_attempt);

                bridge_warn!(
                    "ProtocolLoop: {} (attempt {}, retrying in {}ms)",
                    e,
                    self.open_attempt,
                    retry_in_ms
                );
                self.send_event(SystemEvent::LinkOpenFailed {
                    message: e.to_string(),
                    retry_in_ms,
                });

                TickOutcome::OpenFailed {
                    retry_in: Duration::from_millis(retry_in_ms),
                }
            }
        }
    }

    async fn poll(&mut self) -> TickOutcome {
        if !self.link.is_open() {
            bridge_warn!("ProtocolLoop: Link closed underneath us");
            self.transition(LinkState::Disconnected);
            return TickOutcome::LinkLost;
        }

        let bytes = match self.link.read_available() {
            Ok(bytes) => bytes,
            Err(e) => {
                bridge_warn!("ProtocolLoop: {}", e);
                self.link.close();
                self.transition(LinkState::Disconnected);
                return TickOutcome::LinkLost;
            }
        };

        if bytes.is_empty() {
            return TickOutcome::Idle;
        }

        let chunk = decode_chunk(bytes);
        self.stats.bytes_seen += chunk.bytes.len() as u64;
        self.stats.chunks += 1;

        bridge_debug!("ProtocolLoop: RX {} {:?}", hex_dump(&chunk.bytes), chunk.text);
        if !chunk.is_clean() {
            bridge_debug!(
                "ProtocolLoop: Dropped {} undecodable bytes",
                chunk.discarded
            );
        }
        self.send_event(SystemEvent::DataReceived {
            len: chunk.bytes.len(),
            discarded: chunk.discarded,
        });

        match classify(&chunk.text) {
            Classification::Trigger => self.serve_request().await,
            Classification::Telemetry(text) => {
                self.stats.telemetry_lines += 1;
                bridge_info!("ProtocolLoop: MCU: {}", text);
                self.send_event(SystemEvent::Telemetry { text });
                TickOutcome::Telemetry
            }
            Classification::Empty => TickOutcome::Idle,
        }
    }

    async fn serve_request(&mut self) -> TickOutcome {
        self.stats.triggers += 1;
        bridge_info!("ProtocolLoop: Weather request received");
        self.send_event(SystemEvent::RequestReceived);

        let report = prepare_response(
            &mut self.fetcher,
            &mut self.history,
            self.config.persist_policy,
        )
        .await;

        if let Some(e) = &report.persist_error {
            self.stats.persist_failures += 1;
            self.send_event(SystemEvent::PersistFailed {
                message: e.to_string(),
            });
        }

        let line = report.response.wire_line().to_string();
        let written = self.link.write_line(&line);
        let fallback = report.response.is_fallback();

        if written {
            match report.response {
                Response::Weather(_) => {
                    self.stats.frames_sent += 1;
                    bridge_info!("ProtocolLoop: Sent {}", line);
                    self.send_event(SystemEvent::Responded { frame: line });
                }
                Response::Fallback { reason } => {
                    self.stats.fallbacks_sent += 1;
                    bridge_info!("ProtocolLoop: Sent fallback frame ({})", reason);
                    self.send_event(SystemEvent::FallbackSent {
                        reason: reason.to_string(),
                    });
                }
            }
        } else {
            self.stats.write_failures += 1;
            let message = self
                .link
                .last_error()
                .map(ToString::to_string)
                .unwrap_or_else(|| "unknown write failure".to_string());
            self.send_event(SystemEvent::WriteFailed { message });
        }

        TickOutcome::Served { fallback, written }
    }

    fn transition(&mut self, new_state: LinkState) {
        if self.state == new_state {
            return;
        }

        bridge_debug!("ProtocolLoop: {:?} → {:?}", self.state, new_state);
        self.state = new_state;
        self.send_event(SystemEvent::StateChanged { state: new_state });
    }

    /// Status events are best effort; a full or closed channel drops them.
    fn send_event(&mut self, event: SystemEvent) {
        if let Err(e) = self.event_tx.try_send(event) {
            bridge_debug!("ProtocolLoop: Status event dropped: {:?}", e.into_inner());
        }
    }
}
