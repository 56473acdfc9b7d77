//! SSH Executor
//!
//! Opens a password-authenticated SSH session per call. `sshpass` answers
//! the password prompt; public-key auth is switched off so the prompt
//! always appears, and host keys are neither checked nor recorded since the
//! OCR host is trusted by network topology.

use super::process::{run_with_timeout, CapturedOutput};
use super::{RemoteExecError, RemoteExecutor};
use crate::domain::settings::RemoteSettings;
use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;
use tracing::info;

/// sshpass: "Invalid/incorrect password"
const SSHPASS_BAD_PASSWORD: i32 = 5;
/// ssh: connection or protocol failure
const SSH_CONNECTION_ERROR: i32 = 255;

const SSH_OPTIONS: &[&str] = &[
    "-q",
    "-o",
    "StrictHostKeyChecking=no",
    "-o",
    "UserKnownHostsFile=/dev/null",
    "-o",
    "PubkeyAuthentication=no",
];

/// Host and credentials of the OCR machine
#[derive(Clone)]
pub struct RemoteTarget {
    pub host: String,
    pub user: String,
    pub password: String,
}

impl std::fmt::Debug for RemoteTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteTarget")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub struct SshExecutor {
    target: RemoteTarget,
    ssh_program: String,
    sshpass_program: String,
}

impl SshExecutor {
    pub fn new(target: RemoteTarget) -> Self {
        Self {
            target,
            ssh_program: "ssh".to_string(),
            sshpass_program: "sshpass".to_string(),
        }
    }

    pub fn from_settings(settings: &RemoteSettings) -> Self {
        Self {
            target: RemoteTarget {
                host: settings.host.clone(),
                user: settings.user.clone(),
                password: settings.password.clone(),
            },
            ssh_program: settings.ssh_program.clone(),
            sshpass_program: settings.sshpass_program.clone(),
        }
    }

    /// `sshpass -e ssh <options> user@host <command>`, password in `SSHPASS`
    fn build_command(&self, command: &str) -> Command {
        let mut cmd = Command::new(&self.sshpass_program);
        cmd.arg("-e")
            .arg(&self.ssh_program)
            .args(SSH_OPTIONS)
            .arg(format!("{}@{}", self.target.user, self.target.host))
            .arg(command)
            .env("SSHPASS", &self.target.password);
        cmd
    }

    /// Map a finished call onto the error taxonomy.
    ///
    /// ssh passes the remote command's exit status through unchanged, so a
    /// status of 5 or 255 may come from the OCR script itself. Those codes
    /// count as client failures only when stderr is what the client would
    /// print: nothing at all (sshpass, or ssh under `-q`), a password
    /// rejection, or an `ssh:` diagnostic. A remote command that exits 5
    /// without writing to stderr is still reported as `AuthRejected`.
    fn classify(&self, output: CapturedOutput) -> Result<String, RemoteExecError> {
        if output.status.success() {
            return Ok(output.stdout);
        }

        let stderr = output.stderr.trim().to_string();
        match output.status.code() {
            Some(SSHPASS_BAD_PASSWORD) if is_auth_failure(&stderr) => {
                Err(RemoteExecError::AuthRejected {
                    host: self.target.host.clone(),
                })
            }
            Some(SSH_CONNECTION_ERROR) if is_client_diagnostic(&stderr) => {
                Err(RemoteExecError::ConnectionRefused {
                    host: self.target.host.clone(),
                    detail: stderr,
                })
            }
            code => Err(RemoteExecError::NonZeroExit { code, stderr }),
        }
    }
}

fn is_auth_failure(stderr: &str) -> bool {
    stderr.is_empty() || stderr.contains("Permission denied")
}

fn is_client_diagnostic(stderr: &str) -> bool {
    stderr.is_empty() || stderr.starts_with("ssh:") || stderr.contains("Permission denied")
}

#[async_trait]
impl RemoteExecutor for SshExecutor {
    async fn execute(&self, command: &str, timeout: Duration) -> Result<String, RemoteExecError> {
        info!(
            host = %self.target.host,
            user = %self.target.user,
            "Running remote command: {}",
            command
        );
        let output = run_with_timeout(self.build_command(command), timeout).await?;
        self.classify(output)
    }
}
