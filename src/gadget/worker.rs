//! Read-Job Worker
//!
//! One perpetual task. Every poll interval it tries to move the shared
//! request from `Requested` to `Running`; if that succeeds it runs a whole
//! read job (remote OCR, chunking, paced emission) and then returns the
//! request to `Idle`. A job is never interrupted once started.

use crate::domain::chunker::{chunk, normalize_line_breaks, strip_artifacts};
use crate::domain::models::TextChunk;
use crate::domain::read_request::ReadRequest;
use crate::domain::settings::Settings;
use crate::infrastructure::emitter::{EventSink, PacedEmitter};
use crate::infrastructure::remote::RemoteExecutor;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

#[derive(Debug, Clone)]
pub struct ReadJobConfig {
    pub command: String,
    pub timeout: Duration,
    pub group_size: usize,
    pub emit_delay: Duration,
    pub poll_interval: Duration,
}

impl ReadJobConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            command: settings.remote.command.clone(),
            timeout: settings.remote.timeout(),
            group_size: settings.reader.group_size(),
            emit_delay: settings.reader.emit_delay(),
            poll_interval: settings.reader.poll_interval(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Completed { sent: usize, failed: usize },
    /// The OCR command failed; nothing was emitted
    Abandoned { reason: &'static str },
}

pub struct ReadWorker<S> {
    request: Arc<ReadRequest>,
    executor: Arc<dyn RemoteExecutor>,
    emitter: PacedEmitter<S>,
    config: ReadJobConfig,
}

impl<S: EventSink> ReadWorker<S> {
    pub fn new(
        request: Arc<ReadRequest>,
        executor: Arc<dyn RemoteExecutor>,
        sink: S,
        config: ReadJobConfig,
    ) -> Self {
        Self {
            request,
            executor,
            emitter: PacedEmitter::new(sink, config.emit_delay),
            config,
        }
    }

    /// Poll until `shutdown` flips to true or its sender is dropped. A job
    /// already running is finished first.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!(
            poll_ms = self.config.poll_interval.as_millis() as u64,
            "Read worker started"
        );
        let mut ticker = tokio::time::interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                _ = ticker.tick() => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
            }
            self.poll_once().await;
        }
        info!("Read worker stopped");
    }

    /// Run one job if one was requested
    pub async fn poll_once(&mut self) -> Option<JobOutcome> {
        if !self.request.begin() {
            return None;
        }

        let outcome = self.run_job().await;
        self.request.finish();
        info!(?outcome, "Read job finished");
        Some(outcome)
    }

    async fn run_job(&mut self) -> JobOutcome {
        info!("Read job started");

        let text = match self
            .executor
            .execute(&self.config.command, self.config.timeout)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                error!(reason = e.reason(), "Failed to get text from image: {}", e);
                return JobOutcome::Abandoned { reason: e.reason() };
            }
        };

        let clean_text = normalize_line_breaks(&text);
        let chunks = chunk(&clean_text, self.config.group_size);
        info!(
            words = clean_text.split_whitespace().count(),
            chunks = chunks.len(),
            "Recognized text chunked"
        );

        let cleaned: Vec<TextChunk> = chunks
            .into_iter()
            .filter_map(|raw| {
                let text = strip_artifacts(&raw.text);
                if text.is_empty() {
                    debug!(index = raw.index, "Chunk empty after cleanup, skipped");
                    return None;
                }
                Some(TextChunk {
                    index: raw.index,
                    text,
                })
            })
            .collect();

        let report = self.emitter.emit(&cleaned).await;
        JobOutcome::Completed {
            sent: report.sent,
            failed: report.failed,
        }
    }
}
