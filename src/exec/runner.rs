// src/exec/runner.rs

//! Running a single transport process.

use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::engine::{RuntimeEvent, ScheduledSync, SyncOutcome};
use crate::exec::invocation::SyncInvocation;

/// Captured result of one transport process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOutput {
    /// Exit code, `None` if the process was killed by a signal.
    pub code: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl TransportOutput {
    pub fn outcome(&self) -> SyncOutcome {
        if self.success {
            SyncOutcome::Success
        } else {
            SyncOutcome::Failed(self.code.unwrap_or(-1))
        }
    }
}

/// Run one scheduled sync to completion and report a `SyncCompleted` event.
///
/// Spawn failures and non-zero exits are reported as
/// [`SyncOutcome::Failed`]; they never abort the caller.
pub async fn run_sync(sync: ScheduledSync, runtime_tx: &mpsc::Sender<RuntimeEvent>) {
    let run_id = sync.run_id;

    info!(
        run_id,
        mode = %sync.invocation.mode,
        cmd = %sync.invocation.command_line(),
        "starting transport"
    );
    debug!(run_id, stdin = %sync.invocation.stdin, "transport filter input");

    let outcome = match execute(&sync.invocation).await {
        Ok(output) => {
            echo_output(&output);
            let outcome = output.outcome();
            if output.success {
                info!(run_id, exit_code = ?output.code, "transport finished");
            } else {
                warn!(
                    run_id,
                    exit_code = ?output.code,
                    "transport failed; destination may be partially synced until the next change"
                );
            }
            outcome
        }
        Err(err) => {
            error!(run_id, error = %err, "transport could not be run");
            SyncOutcome::Failed(-1)
        }
    };

    if let Err(err) = runtime_tx
        .send(RuntimeEvent::SyncCompleted { run_id, outcome })
        .await
    {
        warn!(run_id, "failed to send SyncCompleted event: {err}");
    }
}

/// Spawn the transport, feed its filter rules on stdin and capture output.
pub async fn execute(invocation: &SyncInvocation) -> Result<TransportOutput> {
    let mut child = Command::new(&invocation.program)
        .args(&invocation.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("spawning transport '{}'", invocation.program))?;

    let writer = child.stdin.take().map(|mut stdin| {
        let input = invocation.stdin.clone().into_bytes();
        tokio::spawn(async move {
            stdin.write_all(&input).await?;
            stdin.shutdown().await
        })
    });

    let output = child
        .wait_with_output()
        .await
        .with_context(|| format!("waiting for transport '{}'", invocation.program))?;

    if let Some(writer) = writer {
        match writer.await {
            Ok(Ok(())) => {}
            // The transport may exit before reading all of stdin.
            Ok(Err(err)) => debug!(error = %err, "writing transport stdin failed"),
            Err(err) => debug!(error = %err, "stdin writer task failed"),
        }
    }

    Ok(TransportOutput {
        code: output.status.code(),
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Surface the transport's output to the operator verbatim.
fn echo_output(output: &TransportOutput) {
    if !output.stdout.is_empty() {
        print!("{}", output.stdout);
    }
    if !output.stderr.is_empty() {
        eprint!("{}", output.stderr);
    }
}
