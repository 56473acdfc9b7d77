//! Paced Event Emitter
//!
//! Sends one `Read` custom event per chunk, never starting a send sooner
//! than the configured delay after the previous one.

use crate::domain::models::{OutboundEvent, TextChunk};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("outbound channel closed")]
    Closed,

    #[error("failed to send event: {0}")]
    Transport(String),
}

/// The session layer's outbound side
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn send(&self, event: OutboundEvent) -> Result<(), EmitError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitReport {
    pub sent: usize,
    pub failed: usize,
}

pub struct PacedEmitter<S> {
    sink: S,
    delay: Duration,
    last_send: Option<Instant>,
}

impl<S: EventSink> PacedEmitter<S> {
    pub fn new(sink: S, delay: Duration) -> Self {
        Self {
            sink,
            delay,
            last_send: None,
        }
    }

    /// Emit every chunk in order. Send failures are logged and skipped;
    /// pacing is kept regardless.
    pub async fn emit(&mut self, chunks: &[TextChunk]) -> EmitReport {
        let mut report = EmitReport::default();
        for chunk in chunks {
            if self.emit_one(chunk).await {
                report.sent += 1;
            } else {
                report.failed += 1;
            }
        }
        report
    }

    async fn emit_one(&mut self, chunk: &TextChunk) -> bool {
        if let Some(last) = self.last_send {
            tokio::time::sleep_until(last + self.delay).await;
        }
        self.last_send = Some(Instant::now());

        debug!(index = chunk.index, "Sending chunk: {}", chunk.text);
        match self.sink.send(OutboundEvent::read(&chunk.text)).await {
            Ok(()) => {
                info!(
                    index = chunk.index,
                    bytes = chunk.text.len(),
                    "Read event sent"
                );
                true
            }
            Err(e) => {
                warn!(index = chunk.index, "Failed to send Read event: {}", e);
                false
            }
        }
    }
}
