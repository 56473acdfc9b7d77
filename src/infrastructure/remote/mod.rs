//! Remote Execution
//!
//! Runs the OCR command somewhere and hands back its standard output.
//!
//! ## Modules
//!
//! - [`ssh`] - password-authenticated SSH through `sshpass`
//! - [`local`] - local shell subprocess, for bench testing without a host
//! - [`process`] - child process plumbing shared by both

pub mod local;
pub mod process;
pub mod ssh;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub use local::LocalExecutor;
pub use ssh::{RemoteTarget, SshExecutor};

#[derive(Debug, Error)]
pub enum RemoteExecError {
    #[error("remote command timed out after {0:?}")]
    Timeout(Duration),

    #[error("authentication rejected by {host}")]
    AuthRejected { host: String },

    #[error("could not reach {host}: {detail}")]
    ConnectionRefused { host: String, detail: String },

    #[error("remote command exited with status {code:?}: {stderr}")]
    NonZeroExit { code: Option<i32>, stderr: String },

    #[error("failed to launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl RemoteExecError {
    /// Short label used in log fields
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "timeout",
            Self::AuthRejected { .. } => "auth_rejected",
            Self::ConnectionRefused { .. } => "connection_refused",
            Self::NonZeroExit { .. } => "non_zero_exit",
            Self::Launch { .. } => "launch",
        }
    }
}

/// Something that can run one command and capture its output.
///
/// A fresh session is opened for every call and torn down before it returns.
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    async fn execute(&self, command: &str, timeout: Duration) -> Result<String, RemoteExecError>;
}
