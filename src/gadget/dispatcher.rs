//! Directive Dispatcher
//!
//! Decodes control directives and routes them without ever waiting on a
//! read job: `turn` drives the motors right here, `read` only flags a
//! request for the worker.

use crate::domain::models::{ControlCommand, Directive, TURN_SEQUENCE};
use crate::domain::read_request::{ReadRequest, RequestOutcome};
use crate::infrastructure::devices::Actuator;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// A control directive whose payload cannot be acted on
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectiveError {
    #[error("payload is not valid JSON: {0}")]
    InvalidPayload(String),

    #[error("payload is not a JSON object")]
    NotAnObject,

    #[error("missing expected parameter `type`")]
    MissingType,

    #[error("parameter `type` is not a string")]
    InvalidType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Both motor steps were issued
    Turned,
    /// A motor step failed; the rest of the sequence was skipped
    TurnAborted,
    Read(RequestOutcome),
    /// A `type` this gadget does not know
    UnknownType(String),
    /// Not a control directive for this gadget
    NotControl,
}

pub struct Dispatcher {
    actuator: Arc<dyn Actuator>,
    read_request: Arc<ReadRequest>,
}

/// Decode a payload, accepting only a JSON object
fn parse_payload(payload: &[u8]) -> Result<Value, DirectiveError> {
    let value: Value = serde_json::from_slice(payload)
        .map_err(|e| DirectiveError::InvalidPayload(e.to_string()))?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(DirectiveError::NotAnObject)
    }
}

impl Dispatcher {
    pub fn new(actuator: Arc<dyn Actuator>, read_request: Arc<ReadRequest>) -> Self {
        Self {
            actuator,
            read_request,
        }
    }

    /// Handle a directive. Failures are logged, never returned.
    pub fn dispatch(&self, directive: &Directive) {
        match self.try_dispatch(directive) {
            Ok(outcome) => debug!(?outcome, "Directive handled"),
            Err(e) => warn!(
                namespace = %directive.namespace,
                name = %directive.name,
                "Malformed directive: {}",
                e
            ),
        }
    }

    pub fn try_dispatch(&self, directive: &Directive) -> Result<DispatchOutcome, DirectiveError> {
        if !directive.is_control() {
            debug!(
                "Ignoring directive {}.{}",
                directive.namespace, directive.name
            );
            return Ok(DispatchOutcome::NotControl);
        }

        let payload = parse_payload(&directive.payload)?;
        info!("Control payload: {}", payload);

        let control_type = match payload.get("type") {
            None => return Err(DirectiveError::MissingType),
            Some(Value::String(s)) => s.as_str(),
            Some(_) => return Err(DirectiveError::InvalidType),
        };

        let Some(command) = ControlCommand::from_type(control_type) else {
            info!("Ignoring unknown control type: {}", control_type);
            return Ok(DispatchOutcome::UnknownType(control_type.to_string()));
        };

        let outcome = match command {
            ControlCommand::Turn => self.turn_page(),
            ControlCommand::Read => {
                let outcome = self.read_request.request();
                match outcome {
                    RequestOutcome::Accepted => info!("Read requested"),
                    RequestOutcome::AlreadyPending => info!("Read already pending"),
                    RequestOutcome::Busy => info!("Read job in progress, request dropped"),
                }
                DispatchOutcome::Read(outcome)
            }
        };
        Ok(outcome)
    }

    /// Scrunch the page and turn it
    fn turn_page(&self) -> DispatchOutcome {
        for step in TURN_SEQUENCE {
            if let Err(e) = self.actuator.run(step) {
                error!(motor = ?step.motor, "Page turn aborted: {}", e);
                return DispatchOutcome::TurnAborted;
            }
        }
        info!("Page turned");
        DispatchOutcome::Turned
    }
}
