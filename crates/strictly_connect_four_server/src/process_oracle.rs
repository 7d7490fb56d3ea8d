//! Oracle backed by one external process per request.
//!
//! The board goes to the child's stdin as newline-separated rows; side and
//! budget go on the command line as separate arguments. No shell is
//! involved, so board text never becomes part of a command string.
//!
//! On Unix the child leads its own process group. A timeout kills the whole
//! group, so an engine started through a wrapper such as `cargo run` dies
//! with it. Dropping an in-flight call kills only the direct child.

use crate::config::OracleConfig;
use async_trait::async_trait;
use derive_getters::Getters;
use std::process::Stdio;
use std::time::Duration;
use strictly_connect_four::{
    MoveRequest, MoveResult, Oracle, OracleError, ProcessError, SentinelTable, Separator,
    classify_reply, encode_with,
};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

/// Raw output of one oracle run.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct OracleReply {
    /// Standard output, trimmed.
    stdout: String,
    /// Standard error, trimmed.
    stderr: String,
}

/// Spawns the configured oracle executable for every request.
#[derive(Debug, Clone)]
pub struct ProcessOracle {
    config: OracleConfig,
    sentinels: SentinelTable,
}

impl ProcessOracle {
    /// Creates a process oracle from configuration.
    #[instrument(skip(config), fields(program = %config.program()))]
    pub fn new(config: OracleConfig) -> Self {
        info!("Creating process oracle");
        let sentinels = config.sentinel_table();
        Self { config, sentinels }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    /// Sentinel table used to classify replies.
    pub fn sentinels(&self) -> &SentinelTable {
        &self.sentinels
    }

    /// Arguments passed to the executable for `request`.
    pub fn command_args(&self, request: &MoveRequest) -> Vec<String> {
        let mut args = self.config.args().clone();
        args.push(self.config.side_flag().clone());
        args.push(request.side().token().to_string());
        if !self.config.budget_flag().is_empty() {
            args.push(self.config.budget_flag().clone());
            args.push(request.budget().to_string());
        }
        args
    }

    /// Runs the oracle once and collects its output.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError` if the process cannot be started, exits with a
    /// failure status, or outlives the configured timeout (it is killed).
    #[instrument(skip(self, request), fields(side = %request.side(), budget = %request.budget()))]
    pub async fn run(&self, request: &MoveRequest) -> Result<OracleReply, ProcessError> {
        let program = self.config.program();
        let args = self.command_args(request);
        let payload = format!("{}\n", encode_with(request.board(), Separator::Newline));
        let timeout = self.config.timeout();

        debug!(program = %program, args = ?args, "Spawning oracle");
        let mut command = Command::new(program);
        command
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        command.process_group(0);

        let mut child = command.spawn().map_err(|e| {
            warn!(error = %e, program = %program, "Failed to start oracle");
            ProcessError::new(format!("failed to start oracle {:?}: {}", program, e))
        })?;

        let group = child.id();
        let mut stdin = child.stdin.take().ok_or_else(|| {
            tracing::error!("Failed to capture oracle stdin");
            ProcessError::new("failed to capture oracle stdin")
        })?;

        let exchange = async move {
            if let Err(e) = stdin.write_all(payload.as_bytes()).await {
                // The oracle may exit before reading its input.
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(e);
                }
            }
            drop(stdin);
            child.wait_with_output().await
        };

        let output = match tokio::time::timeout(timeout, exchange).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                warn!(error = %e, "Oracle I/O failed");
                return Err(ProcessError::new(format!("oracle I/O failed: {}", e)));
            }
            Err(_) => {
                warn!(timeout_ms = timeout.as_millis() as u64, "Oracle timed out, killed");
                kill_process_group(group).await;
                return Err(timed_out(timeout));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            warn!(status = %output.status, stderr = %stderr, "Oracle exited abnormally");
            return Err(ProcessError::new(format!(
                "oracle exited with {}: {}",
                output.status, stderr
            )));
        }

        debug!(stdout = %stdout, "Oracle finished");
        Ok(OracleReply { stdout, stderr })
    }
}

/// Sends SIGKILL to every process left in the oracle's group.
#[cfg(unix)]
#[instrument]
async fn kill_process_group(group: Option<u32>) {
    let Some(pgid) = group else {
        return;
    };
    let status = Command::new("/bin/sh")
        .arg("-c")
        .arg("kill -KILL -\"$1\"")
        .arg("kill_process_group")
        .arg(pgid.to_string())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;
    match status {
        Ok(status) if status.success() => debug!("Killed oracle process group"),
        Ok(status) => debug!(%status, "Oracle process group already gone"),
        Err(e) => warn!(error = %e, "Failed to kill oracle process group"),
    }
}

#[cfg(not(unix))]
async fn kill_process_group(_group: Option<u32>) {}

fn timed_out(timeout: Duration) -> ProcessError {
    ProcessError::new(format!("oracle timed out after {} ms", timeout.as_millis()))
}

#[async_trait]
impl Oracle for ProcessOracle {
    async fn request(&self, request: &MoveRequest) -> Result<MoveResult, OracleError> {
        let reply = self.run(request).await?;
        Ok(classify_reply(reply.stdout(), &self.sentinels)?)
    }
}
