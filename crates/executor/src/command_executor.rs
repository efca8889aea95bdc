use async_trait::async_trait;
use parking_lot::Mutex;
use std::fmt;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::process::{ChildStderr, Command};
use tokio::task::JoinHandle;

/// How long a launcher's stderr is still collected after it has exited.
/// Whatever it handed off to may hold the pipe open indefinitely.
pub const STDERR_GRACE: Duration = Duration::from_millis(250);

const STDERR_LIMIT: usize = 16 * 1024;

#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {}: {stderr}", exit_label(.code))]
    NonZeroExit {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("{program} timed out after {timeout:?}")]
    Timeout { program: String, timeout: Duration },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "signal".to_string(),
    }
}

/// An external program and its arguments. Arguments are passed as-is, never
/// through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Process-exec primitive the opener is built on.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run to completion and capture output. `limit` bounds the wait; the
    /// child is killed when it is exceeded.
    async fn output(
        &self,
        spec: &CommandSpec,
        limit: Option<Duration>,
    ) -> Result<CommandOutput, ExecutorError>;

    /// Start without waiting for exit. Only a failure to start is reported.
    async fn spawn(&self, spec: &CommandSpec) -> Result<(), ExecutorError>;

    /// Run a hand-off launcher (`xdg-open`, `open`, `cmd /C start`) and wait
    /// for its own exit status only. Anything it starts may keep running and
    /// keep its inherited handles; that never delays the result. A non-zero
    /// exit is an error carrying the launcher's stderr.
    async fn launch(&self, spec: &CommandSpec) -> Result<(), ExecutorError>;
}

/// Runs commands on the host with `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn output(
        &self,
        spec: &CommandSpec,
        limit: Option<Duration>,
    ) -> Result<CommandOutput, ExecutorError> {
        tracing::debug!("Executing command: {}", spec);

        let future = Command::new(&spec.program)
            .args(&spec.args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = match limit {
            Some(limit) => tokio::time::timeout(limit, future)
                .await
                .map_err(|_| ExecutorError::Timeout {
                    program: spec.program.clone(),
                    timeout: limit,
                })?,
            None => future.await,
        }
        .map_err(|source| ExecutorError::Spawn {
            program: spec.program.clone(),
            source,
        })?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    async fn spawn(&self, spec: &CommandSpec) -> Result<(), ExecutorError> {
        tracing::debug!("Spawning command: {}", spec);

        let mut child = Command::new(&spec.program)
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| ExecutorError::Spawn {
                program: spec.program.clone(),
                source,
            })?;

        // Reap in the background so the launched app never becomes a zombie.
        let program = spec.program.clone();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) => tracing::debug!("{} exited with {}", program, status),
                Err(e) => tracing::debug!("Failed to wait for {}: {}", program, e),
            }
        });

        Ok(())
    }

    async fn launch(&self, spec: &CommandSpec) -> Result<(), ExecutorError> {
        tracing::debug!("Running launcher: {}", spec);

        let mut child = Command::new(&spec.program)
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ExecutorError::Spawn {
                program: spec.program.clone(),
                source,
            })?;

        let captured = Arc::new(Mutex::new(Vec::new()));
        let reader = child
            .stderr
            .take()
            .map(|stderr| tokio::spawn(collect_stderr(stderr, captured.clone())));

        let status = child.wait().await.map_err(|source| ExecutorError::Spawn {
            program: spec.program.clone(),
            source,
        })?;
        tracing::debug!("{} exited with {}", spec.program, status);

        if status.success() {
            return Ok(());
        }

        if let Some(reader) = reader {
            wait_for_stderr(reader).await;
        }
        let stderr = String::from_utf8_lossy(&captured.lock()).trim().to_string();
        Err(ExecutorError::NonZeroExit {
            program: spec.program.clone(),
            code: status.code(),
            stderr,
        })
    }
}

/// Drain the pipe until EOF so a descendant writing to it never blocks or
/// hits a broken pipe. Only the first `STDERR_LIMIT` bytes are kept.
async fn collect_stderr(mut stderr: ChildStderr, sink: Arc<Mutex<Vec<u8>>>) {
    let mut buf = [0u8; 4096];
    loop {
        match stderr.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                let mut sink = sink.lock();
                let room = STDERR_LIMIT.saturating_sub(sink.len());
                sink.extend_from_slice(&buf[..n.min(room)]);
            }
        }
    }
}

/// The reader keeps running in the background when the grace period ends.
async fn wait_for_stderr(reader: JoinHandle<()>) {
    if tokio::time::timeout(STDERR_GRACE, reader).await.is_err() {
        tracing::debug!("stderr still open after launcher exit");
    }
}
