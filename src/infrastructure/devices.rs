//! Device Collaborators
//!
//! Seams towards the motors and the status LEDs. The brick drivers live
//! outside this crate; the logging implementations here stand in for them
//! when running on a desk.

use crate::domain::models::{ActuationStep, GadgetStatus, Motor};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ActuatorError {
    #[error("motor {0:?} not connected")]
    NotConnected(Motor),
}

/// Drives a single motor step. Must return promptly; the dispatcher calls it
/// on the directive path.
pub trait Actuator: Send + Sync {
    fn run(&self, step: &ActuationStep) -> Result<(), ActuatorError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedColor {
    Green,
    Black,
}

impl LedColor {
    pub fn for_status(status: GadgetStatus) -> Self {
        match status {
            GadgetStatus::Connected => Self::Green,
            GadgetStatus::Disconnected => Self::Black,
        }
    }
}

/// Visible/audible indication of the gadget status
pub trait StatusIndicator: Send + Sync {
    fn show(&self, status: GadgetStatus);
}

#[derive(Debug, Default)]
pub struct LoggingActuator;

impl Actuator for LoggingActuator {
    fn run(&self, step: &ActuationStep) -> Result<(), ActuatorError> {
        info!(
            motor = ?step.motor,
            speed = step.speed_percent,
            rotations = step.rotations,
            "Motor step"
        );
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct LoggingIndicator;

impl StatusIndicator for LoggingIndicator {
    fn show(&self, status: GadgetStatus) {
        let color = LedColor::for_status(status);
        info!(?status, "LEFT and RIGHT LEDs set to {:?}", color);
    }
}
