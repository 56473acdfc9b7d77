use serde::{Deserialize, Serialize};

/// Namespace of the custom directives and events exchanged with the Echo device
pub const GADGET_NAMESPACE: &str = "Custom.Mindstorms.Gadget";

/// Name of the control directive within [`GADGET_NAMESPACE`]
pub const CONTROL_DIRECTIVE: &str = "control";

/// An inbound directive as delivered by the session layer.
///
/// The payload is kept as raw bytes; decoding happens in the dispatcher so a
/// malformed payload is reported there instead of at the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub namespace: String,
    pub name: String,
    pub payload: Vec<u8>,
}

impl Directive {
    /// Build a control directive carrying the given JSON payload
    pub fn control(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            namespace: GADGET_NAMESPACE.to_string(),
            name: CONTROL_DIRECTIVE.to_string(),
            payload: payload.into(),
        }
    }

    pub fn is_control(&self) -> bool {
        self.namespace == GADGET_NAMESPACE && self.name == CONTROL_DIRECTIVE
    }
}

/// Everything the session layer can deliver to the gadget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Connected { device_addr: String },
    Disconnected { device_addr: String },
    Directive(Directive),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    Turn,
    Read,
}

impl ControlCommand {
    /// Map the payload `type` value to a command. Unknown values yield `None`.
    pub fn from_type(value: &str) -> Option<Self> {
        match value {
            "turn" => Some(Self::Turn),
            "read" => Some(Self::Read),
            _ => None,
        }
    }
}

/// One group of words produced by the chunker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    pub index: usize,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GadgetStatus {
    #[default]
    Disconnected,
    Connected,
}

/// Custom events sent from this gadget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventName {
    Read,
}

impl EventName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "Read",
        }
    }
}

/// Body of a `Read` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadPayload {
    pub text: String,
}

/// An outbound custom event, ready to hand to the session layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundEvent {
    pub namespace: &'static str,
    pub name: &'static str,
    pub payload: ReadPayload,
}

impl OutboundEvent {
    pub fn read(text: &str) -> Self {
        Self {
            namespace: GADGET_NAMESPACE,
            name: EventName::Read.as_str(),
            payload: ReadPayload {
                text: text.to_string(),
            },
        }
    }
}

/// Page-turning motors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motor {
    /// Output A, scrunches the page back so the turner can catch it
    Starter,
    /// Output D, sweeps the page over
    Turner,
}

/// A single motor movement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActuationStep {
    pub motor: Motor,
    pub speed_percent: i8,
    pub rotations: f32,
}

/// Scrunch the page back, then advance it
pub const TURN_SEQUENCE: &[ActuationStep] = &[
    ActuationStep {
        motor: Motor::Starter,
        speed_percent: 20,
        rotations: -0.47,
    },
    ActuationStep {
        motor: Motor::Turner,
        speed_percent: 30,
        rotations: 1.0,
    },
];
