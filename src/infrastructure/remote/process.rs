use super::RemoteExecError;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug)]
pub struct CapturedOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Spawn `command`, wait for it to exit and capture both streams.
///
/// The child is killed if `timeout` elapses first.
pub async fn run_with_timeout(
    mut command: Command,
    timeout: Duration,
) -> Result<CapturedOutput, RemoteExecError> {
    let program = command.as_std().get_program().to_string_lossy().to_string();

    let child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| RemoteExecError::Launch {
            program: program.clone(),
            source,
        })?;

    // Dropping the pending wait on timeout drops the child, which kills it.
    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(source)) => return Err(RemoteExecError::Launch { program, source }),
        Err(_) => return Err(RemoteExecError::Timeout(timeout)),
    };

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    debug!(
        "'{}' exited with status {} (stdout={} chars, stderr={} chars)",
        program,
        output.status,
        stdout.len(),
        stderr.len()
    );

    Ok(CapturedOutput {
        status: output.status,
        stdout,
        stderr,
    })
}
