//! Operator-facing status lines

use bridge_protocol::SystemEvent;
use futures::StreamExt;
use futures_channel::mpsc;

/// Print every event until the sender side is dropped.
pub async fn print_events(mut rx: mpsc::Receiver<SystemEvent>) {
    while let Some(event) = rx.next().await {
        if let Some(line) = status_line(&event) {
            println!("[{}] {}", chrono::Local::now().format("%H:%M:%S"), line);
        }
    }
}

/// Byte counts are only interesting in the debug log.
fn status_line(event: &SystemEvent) -> Option<String> {
    match event {
        SystemEvent::DataReceived { .. } => None,
        other => Some(other.to_string()),
    }
}
