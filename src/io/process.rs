//! Child process execution with a hard deadline and bounded capture.

use std::io::{Read, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, warn};
use wait_timeout::ChildExt;

/// Captured output of one child process invocation.
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// Bytes discarded beyond the capture limit (stdout + stderr).
    pub truncated_bytes: usize,
    /// The deadline elapsed and the child was killed. `status` is then the
    /// post-kill status and any captured output must be discarded by callers.
    pub timed_out: bool,
}

/// Spawn `cmd`, write `stdin` to it, and wait at most `timeout`.
///
/// stdout and stderr are drained on dedicated threads while the child runs,
/// so a chatty backend cannot deadlock on a full pipe. Each stream keeps at
/// most `capture_limit_bytes`; the rest is drained and counted. On timeout
/// the child is killed and reaped before returning, so no zombie survives
/// any exit path.
pub fn run_with_deadline(
    mut cmd: Command,
    stdin: &[u8],
    timeout: Duration,
    capture_limit_bytes: usize,
) -> Result<CommandOutput> {
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!(timeout_secs = timeout.as_secs(), "spawning backend process");
    let mut child = cmd.spawn().context("spawn backend process")?;

    {
        let mut child_stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("stdin was not piped"))?;
        // A dropped write end signals EOF; errors here usually mean the child
        // already exited, which the exit status will report.
        if let Err(err) = child_stdin.write_all(stdin) {
            warn!(err = %err, "failed to write prompt to backend stdin");
        }
    }

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr was not piped"))?;

    let stdout_reader = thread::spawn(move || drain_limited(stdout, capture_limit_bytes));
    let stderr_reader = thread::spawn(move || drain_limited(stderr, capture_limit_bytes));

    let mut timed_out = false;
    let status = match child.wait_timeout(timeout).context("wait for backend")? {
        Some(status) => status,
        None => {
            warn!(timeout_secs = timeout.as_secs(), "backend timed out, killing");
            timed_out = true;
            child.kill().context("kill timed-out backend")?;
            child.wait().context("reap backend after kill")?
        }
    };

    let (stdout, stdout_dropped) = join_reader(stdout_reader).context("join stdout reader")?;
    let (stderr, stderr_dropped) = join_reader(stderr_reader).context("join stderr reader")?;
    let truncated_bytes = stdout_dropped + stderr_dropped;
    if truncated_bytes > 0 {
        warn!(truncated_bytes, "backend output exceeded capture limit");
    }

    debug!(exit_code = ?status.code(), timed_out, "backend finished");
    Ok(CommandOutput {
        status,
        stdout,
        stderr,
        truncated_bytes,
        timed_out,
    })
}

fn join_reader(handle: thread::JoinHandle<Result<(Vec<u8>, usize)>>) -> Result<(Vec<u8>, usize)> {
    handle
        .join()
        .map_err(|_| anyhow!("output reader thread panicked"))?
}

/// Read a stream to EOF, keeping at most `limit` bytes and counting the rest.
fn drain_limited<R: Read>(mut reader: R, limit: usize) -> Result<(Vec<u8>, usize)> {
    let mut kept = Vec::new();
    let mut dropped = 0usize;
    let mut chunk = [0u8; 8192];

    loop {
        let n = reader.read(&mut chunk).context("read backend output")?;
        if n == 0 {
            return Ok((kept, dropped));
        }
        let room = limit.saturating_sub(kept.len());
        let take = n.min(room);
        kept.extend_from_slice(&chunk[..take]);
        dropped += n - take;
    }
}
