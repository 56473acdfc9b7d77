//! Read Request
//!
//! The only state shared between directive handling and the read worker.
//! Transitions are compare-and-swap on a single atomic:
//!
//! ```text
//!   Idle ──request()──▶ Requested ──begin()──▶ Running ──finish()──▶ Idle
//! ```
//!
//! `request()` while `Requested` or `Running` changes nothing, so at most
//! one job is ever in flight and rapid duplicate requests merge.

use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadState {
    Idle,
    Requested,
    Running,
}

impl ReadState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Requested,
            2 => Self::Running,
            _ => Self::Idle,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Requested => 1,
            Self::Running => 2,
        }
    }
}

/// What happened to a read request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// A new job will be picked up by the worker
    Accepted,
    /// A job was already waiting; this request merged into it
    AlreadyPending,
    /// A job is running; this request is dropped
    Busy,
}

#[derive(Debug, Default)]
pub struct ReadRequest {
    state: AtomicU8,
}

impl ReadRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ReadState {
        ReadState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Idle → Requested
    pub fn request(&self) -> RequestOutcome {
        match self.transition(ReadState::Idle, ReadState::Requested) {
            Ok(()) => RequestOutcome::Accepted,
            Err(ReadState::Running) => RequestOutcome::Busy,
            Err(_) => RequestOutcome::AlreadyPending,
        }
    }

    /// Requested → Running. Returns false if there was nothing to start.
    pub fn begin(&self) -> bool {
        self.transition(ReadState::Requested, ReadState::Running)
            .is_ok()
    }

    /// Running → Idle
    pub fn finish(&self) {
        if let Err(state) = self.transition(ReadState::Running, ReadState::Idle) {
            tracing::warn!(?state, "finish() called outside of a running job");
        }
    }

    fn transition(&self, from: ReadState, to: ReadState) -> Result<(), ReadState> {
        self.state
            .compare_exchange(from.as_u8(), to.as_u8(), Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(ReadState::from_u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_full_cycle() {
        let request = ReadRequest::new();
        assert_eq!(request.state(), ReadState::Idle);

        assert_eq!(request.request(), RequestOutcome::Accepted);
        assert_eq!(request.state(), ReadState::Requested);

        assert!(request.begin());
        assert_eq!(request.state(), ReadState::Running);

        request.finish();
        assert_eq!(request.state(), ReadState::Idle);
    }

    #[test]
    fn test_duplicate_requests_merge() {
        let request = ReadRequest::new();
        assert_eq!(request.request(), RequestOutcome::Accepted);
        assert_eq!(request.request(), RequestOutcome::AlreadyPending);

        assert!(request.begin());
        assert!(!request.begin());
        assert_eq!(request.request(), RequestOutcome::Busy);
        assert_eq!(request.state(), ReadState::Running);
    }

    #[test]
    fn test_begin_without_request() {
        let request = ReadRequest::new();
        assert!(!request.begin());
        request.finish();
        assert_eq!(request.state(), ReadState::Idle);
    }

    #[test]
    fn test_concurrent_requests_start_one_job() {
        let request = Arc::new(ReadRequest::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let request = request.clone();
                std::thread::spawn(move || request.request())
            })
            .collect();

        let accepted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|o| *o == RequestOutcome::Accepted)
            .count();
        assert_eq!(accepted, 1);
        assert!(request.begin());
        assert!(!request.begin());
    }
}
