use super::process::run_with_timeout;
use super::{RemoteExecError, RemoteExecutor};
use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;
use tracing::info;

/// Runs the command through `sh -c` on this machine
#[derive(Debug, Clone)]
pub struct LocalExecutor {
    shell: String,
}

impl LocalExecutor {
    pub fn new() -> Self {
        Self {
            shell: "sh".to_string(),
        }
    }
}

impl Default for LocalExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteExecutor for LocalExecutor {
    async fn execute(&self, command: &str, timeout: Duration) -> Result<String, RemoteExecError> {
        info!("Running local command: {}", command);

        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c").arg(command);

        let output = run_with_timeout(cmd, timeout).await?;
        if output.status.success() {
            Ok(output.stdout)
        } else {
            Err(RemoteExecError::NonZeroExit {
                code: output.status.code(),
                stderr: output.stderr.trim().to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_captures_stdout() {
        let out = LocalExecutor::new()
            .execute("printf 'Hello\\nworld'", Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(out, "Hello\nworld");
    }

    #[tokio::test]
    async fn test_non_zero_exit() {
        let err = LocalExecutor::new()
            .execute("echo oops >&2; exit 3", Duration::from_secs(5))
            .await
            .unwrap_err();
        match err {
            RemoteExecError::NonZeroExit { code, stderr } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "oops");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout() {
        let err = LocalExecutor::new()
            .execute("sleep 5", Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteExecError::Timeout(_)));
    }
}
