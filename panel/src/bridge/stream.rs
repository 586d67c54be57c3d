//! Inbound side of the bridge: a server-sent event stream where every message
//! carries one full machine state.
//!
//! Snapshots are published into a [`watch`] channel. Readers only ever see
//! the latest one; intermediate snapshots a slow reader missed are dropped.

use std::time::Duration;

use futures::StreamExt;
use tokio::sync::watch;

use crate::core::prelude::*;
use crate::settings::PanelSettings;
use crate::state::Snapshot;

pub type SnapshotSender = watch::Sender<Snapshot>;
pub type SnapshotReceiver = watch::Receiver<Snapshot>;

pub fn snapshot_channel() -> (SnapshotSender, SnapshotReceiver) {
    watch::channel(Snapshot::empty())
}

/// A complete server-sent event
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SseEvent {
    pub event: Option<String>,
    pub data: String,
    pub retry: Option<Duration>,
}

/// Incremental parser for the `text/event-stream` format. Bytes go in as they
/// arrive off the wire; complete events come out.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    event: Option<String>,
    data: Vec<String>,
    retry: Option<Duration>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);
        let mut events = Vec::new();

        while let Some(end) = self.buffer.iter().position(|b| *b == b'\n') {
            let mut line: Vec<u8> = self.buffer.drain(..=end).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            let line = String::from_utf8_lossy(&line);
            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
        }

        events
    }

    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => {
                (field, value.strip_prefix(' ').unwrap_or(value))
            }
            None => (line, ""),
        };

        match field {
            "data" => self.data.push(value.to_string()),
            "event" => self.event = Some(value.to_string()),
            "retry" => {
                if let Ok(ms) = value.trim().parse::<u64>() {
                    self.retry = Some(Duration::from_millis(ms));
                }
            }
            _ => {}
        }

        None
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let retry = self.retry.take();
        let event = self.event.take();
        if self.data.is_empty() {
            return retry.map(|retry| SseEvent {
                retry: Some(retry),
                ..SseEvent::default()
            });
        }
        let data = self.data.join("\n");
        self.data.clear();
        Some(SseEvent { event, data, retry })
    }
}

/// Applies one event to the snapshot channel. Returns `true` when a new
/// snapshot was published. Malformed payloads leave the current snapshot in
/// place.
pub fn publish_event(event: &SseEvent, sender: &SnapshotSender) -> bool {
    let is_message = event.event.as_deref().is_none_or(|e| e == "message");
    if !is_message || event.data.is_empty() {
        return false;
    }

    match Snapshot::parse(&event.data) {
        Ok(snapshot) => {
            sender.send_replace(snapshot);
            true
        }
        Err(err) => {
            warn!("Discarding malformed snapshot: {}", err);
            false
        }
    }
}

/// Keeps an event stream connected for as long as anyone holds a receiver,
/// reconnecting after the connection ends or fails.
pub async fn run_event_stream(
    client: reqwest::Client,
    settings: PanelSettings,
    sender: SnapshotSender,
) {
    let url = settings.events_url();
    let idle = settings.stream_idle_timeout;
    let mut retry_delay = settings.retry_delay;

    while !sender.is_closed() {
        let result =
            stream_once(&client, &url, &sender, idle, &mut retry_delay).await;
        match result {
            Ok(()) => info!("Event stream closed by {}", url),
            Err(err) => error!("Event stream failed: {}", err),
        }

        if sender.is_closed() {
            break;
        }
        debug!("Reconnecting to {} in {:?}", url, retry_delay);
        tokio::time::sleep(retry_delay).await;
    }
}

async fn stream_once(
    client: &reqwest::Client,
    url: &str,
    sender: &SnapshotSender,
    idle: Duration,
    retry_delay: &mut Duration,
) -> Result<(), BridgeError> {
    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, "text/event-stream")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(BridgeError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    info!("Event stream connected to {}", url);
    let mut decoder = SseDecoder::new();
    let mut body = response.bytes_stream();
    let mut received = 0u64;

    loop {
        let next = tokio::time::timeout(idle, body.next())
            .await
            .map_err(|_| BridgeError::Idle {
                url: url.to_string(),
                idle,
            })?;
        let Some(chunk) = next else {
            break;
        };
        let chunk = chunk?;
        for event in decoder.push(&chunk) {
            if let Some(retry) = event.retry {
                *retry_delay = retry;
            }
            if publish_event(&event, sender) {
                received += 1;
                trace!("snapshot #{}", received);
            }
        }
        if sender.is_closed() {
            break;
        }
    }

    Ok(())
}
