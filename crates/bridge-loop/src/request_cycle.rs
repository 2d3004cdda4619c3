//! Fetch-Save-Respond
//!
//! One trigger, one fetch attempt, one response. Every failure is folded
//! into [`Response::Fallback`] here so the caller always has a line to send.

use bridge_protocol::BridgeError;
use bridge_runtime::{bridge_debug, bridge_error, bridge_warn};
use core_types::{HistoryStore, PersistError, WeatherFetcher};
use framing::{OutboundFrame, FALLBACK_FRAME};

/// Whether a failed history append should cost the MCU its weather frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PersistPolicy {
    /// Log the failure and respond with the fetched record anyway.
    #[default]
    BestEffort,
    /// Treat the failure like a fetch failure and send the fallback frame.
    Required,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Weather(OutboundFrame),
    Fallback { reason: BridgeError },
}

impl Response {
    /// Line to write, without terminator.
    pub fn wire_line(&self) -> &str {
        match self {
            Self::Weather(frame) => frame.as_line(),
            Self::Fallback { .. } => FALLBACK_FRAME,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Outcome of one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub response: Response,
    /// Set whenever the append failed, under either policy.
    pub persist_error: Option<PersistError>,
    /// History length after a successful append.
    pub history_len: Option<usize>,
}

/// Run one fetch, append it to history and build the response.
pub async fn prepare_response<F, H>(
    fetcher: &mut F,
    history: &mut H,
    policy: PersistPolicy,
) -> CycleReport
where
    F: WeatherFetcher,
    H: HistoryStore,
{
    let record = match fetcher.fetch().await {
        Ok(record) => record,
        Err(e) => {
            bridge_error!("RequestCycle: {}", e);
            return CycleReport {
                response: Response::Fallback { reason: e.into() },
                persist_error: None,
                history_len: None,
            };
        }
    };

    let (persist_error, history_len) = match history.append(&record) {
        Ok(len) => {
            bridge_debug!("RequestCycle: History now holds {} records", len);
            (None, Some(len))
        }
        Err(e) => {
            bridge_warn!("RequestCycle: {}", e);
            (Some(e), None)
        }
    };

    let response = match (&persist_error, policy) {
        (Some(e), PersistPolicy::Required) => Response::Fallback {
            reason: BridgeError::Persist(e.clone()),
        },
        _ => Response::Weather(OutboundFrame::from_record(&record)),
    };

    CycleReport {
        response,
        persist_error,
        history_len,
    }
}
