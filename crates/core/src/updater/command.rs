//! Subprocess-backed updater.
//!
//! Spawns the configured program with stdin closed, captures stdout and
//! stderr, and waits for it to exit. There is no timeout: a refresh runs as
//! long as it needs to.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Instant;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use super::{UpdateOutcome, Updater};

/// Maximum stdout or stderr size captured per stream (1 MiB).
const MAX_OUTPUT_BYTES: u64 = 1024 * 1024;

/// Maximum number of stderr characters carried into a failure reason.
const MAX_REASON_CHARS: usize = 500;

/// Captured result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
    pub duration_ms: u64,
}

impl ProcessOutput {
    /// Anything written to stderr counts as a failure, as does a non-zero
    /// or missing exit code.
    pub fn outcome(&self) -> UpdateOutcome {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return UpdateOutcome::Failure(format!(
                "updater wrote to stderr: {}",
                truncate(stderr, MAX_REASON_CHARS)
            ));
        }
        match self.exit_code {
            Some(0) => UpdateOutcome::Success,
            Some(code) => UpdateOutcome::Failure(format!("updater exited with code {code}")),
            None => UpdateOutcome::Failure("updater was terminated by a signal".to_string()),
        }
    }
}

/// Runs an external program to rebuild the listings table.
#[derive(Debug, Clone)]
pub struct CommandUpdater {
    program: String,
    args: Vec<String>,
    working_directory: Option<PathBuf>,
}

impl CommandUpdater {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            working_directory: None,
        }
    }

    /// Run the program from `dir` instead of the server's working directory.
    pub fn with_working_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(dir.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Spawn the program and wait for it to exit.
    pub async fn run(&self) -> std::io::Result<ProcessOutput> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(dir) = &self.working_directory {
            cmd.current_dir(dir);
        }

        let start = Instant::now();
        let mut child = cmd.spawn()?;

        // Drain both pipes while waiting so a chatty child never blocks on a
        // full pipe buffer.
        let stdout_task = tokio::spawn(read_stream(child.stdout.take()));
        let stderr_task = tokio::spawn(read_stream(child.stderr.take()));

        let status = child.wait().await?;
        let stdout = stdout_task.await.unwrap_or_default();
        let stderr = stderr_task.await.unwrap_or_default();

        Ok(ProcessOutput {
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
            exit_code: status.code(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[async_trait::async_trait]
impl Updater for CommandUpdater {
    async fn trigger(&self) -> UpdateOutcome {
        match self.run().await {
            Ok(output) => {
                tracing::debug!(
                    program = %self.program,
                    exit_code = ?output.exit_code,
                    duration_ms = output.duration_ms,
                    stdout_bytes = output.stdout.len(),
                    "Updater process exited"
                );
                output.outcome()
            }
            Err(e) => UpdateOutcome::Failure(format!(
                "failed to run updater '{}': {e}",
                self.program
            )),
        }
    }
}

/// Read an output stream to EOF, keeping the first [`MAX_OUTPUT_BYTES`].
///
/// The remainder is drained and discarded; closing the pipe early would make
/// the child's next write fail.
async fn read_stream<R: AsyncRead + Unpin>(handle: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut h) = handle {
        let _ = (&mut h).take(MAX_OUTPUT_BYTES).read_to_end(&mut buf).await;
        let _ = tokio::io::copy(&mut h, &mut tokio::io::sink()).await;
    }
    buf
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
