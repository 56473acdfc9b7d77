//! Console Transport
//!
//! A JSON-lines stand-in for the Echo session layer, useful on a bench.
//! Each stdin line is one inbound message, each outbound event is written
//! to stdout as one line.
//!
//! ```text
//! {"kind":"connected","device_addr":"AA:BB"}
//! {"kind":"directive","namespace":"Custom.Mindstorms.Gadget","name":"control","payload":{"type":"read"}}
//! ```

use crate::domain::models::{Directive, OutboundEvent, SessionEvent};
use crate::infrastructure::emitter::{EmitError, EventSink};
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum WireMessage {
    Connected {
        device_addr: String,
    },
    Disconnected {
        device_addr: String,
    },
    Directive {
        namespace: String,
        name: String,
        #[serde(default)]
        payload: serde_json::Value,
    },
}

impl From<WireMessage> for SessionEvent {
    fn from(msg: WireMessage) -> Self {
        match msg {
            WireMessage::Connected { device_addr } => SessionEvent::Connected { device_addr },
            WireMessage::Disconnected { device_addr } => {
                SessionEvent::Disconnected { device_addr }
            }
            WireMessage::Directive {
                namespace,
                name,
                payload,
            } => {
                // A string payload is taken verbatim so the dispatcher sees
                // exactly what the sender wrote.
                let payload = match payload {
                    serde_json::Value::String(raw) => raw.into_bytes(),
                    other => other.to_string().into_bytes(),
                };
                SessionEvent::Directive(Directive {
                    namespace,
                    name,
                    payload,
                })
            }
        }
    }
}

pub fn parse_line(line: &str) -> Result<SessionEvent> {
    let msg: WireMessage = serde_json::from_str(line)?;
    Ok(msg.into())
}

/// Read lines until EOF and forward every parseable one. Returns when the
/// input ends or the receiver is gone.
pub async fn forward_inbound<R>(reader: R, tx: mpsc::UnboundedSender<SessionEvent>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_line(line) {
            Ok(event) => {
                debug!("Inbound: {:?}", event);
                if tx.send(event).is_err() {
                    break;
                }
            }
            Err(e) => warn!("Skipping unreadable line: {} ({})", line, e),
        }
    }
    info!("Console input closed");
    Ok(())
}

/// Writes outbound events as JSON lines
pub struct ConsoleSink<W> {
    writer: Mutex<W>,
}

impl<W> ConsoleSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[async_trait]
impl<W> EventSink for ConsoleSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn send(&self, event: OutboundEvent) -> Result<(), EmitError> {
        let json = serde_json::to_string(&event)
            .map_err(|e| EmitError::Transport(e.to_string()))?
            + "\n";

        let mut writer = self.writer.lock().await;
        writer
            .write_all(json.as_bytes())
            .await
            .map_err(|e| EmitError::Transport(e.to_string()))?;
        writer
            .flush()
            .await
            .map_err(|e| EmitError::Transport(e.to_string()))
    }
}
