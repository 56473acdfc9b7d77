//! Gadget
//!
//! Wires the coordination core together.
//!
//! ## Architecture
//!
//! ```text
//!  session layer ──SessionEvent──▶ Gadget::handle
//!                                    │
//!                  ┌─────────────────┴──────────────┐
//!                  ▼                                ▼
//!            ConnectionHooks                   Dispatcher
//!            (status, LEDs)                  │           │
//!                                   turn ────┘           └──── read
//!                                    ▼                           ▼
//!                                Actuator                 ReadRequest
//!                                                               │ polled
//!                                                               ▼
//!                            RemoteExecutor ◀──────────── ReadWorker
//!                                                               │
//!                                                               ▼
//!                                                   PacedEmitter ──▶ EventSink
//! ```
//!
//! ## Modules
//!
//! - [`dispatcher`] - directive decoding and routing
//! - [`worker`] - the background read-job loop
//! - [`lifecycle`] - connect/disconnect hooks

pub mod dispatcher;
pub mod lifecycle;
pub mod worker;

use crate::domain::models::{GadgetStatus, SessionEvent};
use crate::domain::read_request::{ReadRequest, ReadState};
use crate::domain::settings::Settings;
use crate::infrastructure::devices::{Actuator, StatusIndicator};
use crate::infrastructure::emitter::EventSink;
use crate::infrastructure::remote::RemoteExecutor;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub use dispatcher::{DirectiveError, DispatchOutcome, Dispatcher};
pub use lifecycle::ConnectionHooks;
pub use worker::{JobOutcome, ReadJobConfig, ReadWorker};

pub struct Gadget {
    read_request: Arc<ReadRequest>,
    dispatcher: Dispatcher,
    hooks: ConnectionHooks,
}

impl Gadget {
    pub fn new(
        friendly_name: impl Into<String>,
        actuator: Arc<dyn Actuator>,
        indicator: Arc<dyn StatusIndicator>,
    ) -> Self {
        let read_request = Arc::new(ReadRequest::new());
        Self {
            dispatcher: Dispatcher::new(actuator, read_request.clone()),
            hooks: ConnectionHooks::new(friendly_name, indicator),
            read_request,
        }
    }

    /// Start the read worker on the current tokio runtime
    pub fn spawn_worker<S>(
        &self,
        executor: Arc<dyn RemoteExecutor>,
        sink: S,
        settings: &Settings,
        shutdown: watch::Receiver<bool>,
    ) -> JoinHandle<()>
    where
        S: EventSink + 'static,
    {
        let worker = ReadWorker::new(
            self.read_request.clone(),
            executor,
            sink,
            ReadJobConfig::from_settings(settings),
        );
        tokio::spawn(worker.run(shutdown))
    }

    /// Entry point for everything the session layer delivers. Never blocks
    /// on a read job.
    pub fn handle(&self, event: &SessionEvent) {
        match event {
            SessionEvent::Connected { device_addr } => self.hooks.on_connected(device_addr),
            SessionEvent::Disconnected { device_addr } => self.hooks.on_disconnected(device_addr),
            SessionEvent::Directive(directive) => self.dispatcher.dispatch(directive),
        }
    }

    pub fn status(&self) -> GadgetStatus {
        self.hooks.status()
    }

    pub fn read_state(&self) -> ReadState {
        self.read_request.state()
    }
}
