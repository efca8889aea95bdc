//! Recording runner for tests. Nothing is executed.

use crate::command_executor::{CommandOutput, CommandRunner, CommandSpec, ExecutorError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::io;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Output,
    Spawn,
    Launch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub kind: CallKind,
    pub spec: CommandSpec,
}

impl RecordedCall {
    /// `which`/`where` lookups and `flatpak list`.
    pub fn is_probe(&self) -> bool {
        matches!(self.spec.program.as_str(), "which" | "where")
            || (self.spec.program == "flatpak" && self.spec.args.first().map(String::as_str) == Some("list"))
    }
}

#[derive(Debug, Default)]
pub struct MockRunner {
    installed: HashSet<String>,
    broken_lookup: bool,
    flatpak_list: Option<String>,
    failing: HashMap<String, String>,
    unspawnable: HashSet<String>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Programs the search-path lookup reports as present.
    pub fn with_installed<I, S>(mut self, programs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.installed.extend(programs.into_iter().map(Into::into));
        self
    }

    /// Make `which`/`where` themselves fail to start.
    pub fn with_broken_lookup(mut self) -> Self {
        self.broken_lookup = true;
        self
    }

    /// Stdout of `flatpak list --app`. Without it, `flatpak` is not installed.
    pub fn with_flatpak_list(mut self, listing: impl Into<String>) -> Self {
        self.flatpak_list = Some(listing.into());
        self
    }

    /// Runs and launches of `program` exit non-zero with `stderr`.
    pub fn with_failing(mut self, program: impl Into<String>, stderr: impl Into<String>) -> Self {
        self.failing.insert(program.into(), stderr.into());
        self
    }

    /// Spawns of `program` fail to start.
    pub fn with_unspawnable(mut self, program: impl Into<String>) -> Self {
        self.unspawnable.insert(program.into());
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn probes(&self) -> Vec<RecordedCall> {
        self.calls().into_iter().filter(RecordedCall::is_probe).collect()
    }

    /// Everything that is not a probe.
    pub fn launches(&self) -> Vec<RecordedCall> {
        self.calls().into_iter().filter(|c| !c.is_probe()).collect()
    }

    fn record(&self, kind: CallKind, spec: &CommandSpec) {
        self.calls.lock().push(RecordedCall {
            kind,
            spec: spec.clone(),
        });
    }

    fn not_found(program: &str) -> ExecutorError {
        ExecutorError::Spawn {
            program: program.to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        }
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn output(
        &self,
        spec: &CommandSpec,
        _limit: Option<Duration>,
    ) -> Result<CommandOutput, ExecutorError> {
        self.record(CallKind::Output, spec);

        if let Some(stderr) = self.failing.get(&spec.program) {
            return Ok(CommandOutput {
                success: false,
                code: Some(1),
                stdout: String::new(),
                stderr: stderr.clone(),
            });
        }

        match spec.program.as_str() {
            "which" | "where" => {
                if self.broken_lookup {
                    return Err(Self::not_found(&spec.program));
                }
                let found = spec
                    .args
                    .first()
                    .map(|name| self.installed.contains(name))
                    .unwrap_or(false);
                Ok(CommandOutput {
                    success: found,
                    code: Some(if found { 0 } else { 1 }),
                    ..Default::default()
                })
            }
            "flatpak" if spec.args.first().map(String::as_str) == Some("list") => {
                match &self.flatpak_list {
                    Some(listing) => Ok(CommandOutput {
                        success: true,
                        code: Some(0),
                        stdout: listing.clone(),
                        stderr: String::new(),
                    }),
                    None => Err(Self::not_found("flatpak")),
                }
            }
            _ => Ok(CommandOutput {
                success: true,
                code: Some(0),
                ..Default::default()
            }),
        }
    }

    async fn launch(&self, spec: &CommandSpec) -> Result<(), ExecutorError> {
        self.record(CallKind::Launch, spec);

        match self.failing.get(&spec.program) {
            Some(stderr) => Err(ExecutorError::NonZeroExit {
                program: spec.program.clone(),
                code: Some(1),
                stderr: stderr.clone(),
            }),
            None => Ok(()),
        }
    }

    async fn spawn(&self, spec: &CommandSpec) -> Result<(), ExecutorError> {
        self.record(CallKind::Spawn, spec);

        if self.unspawnable.contains(&spec.program) {
            return Err(Self::not_found(&spec.program));
        }
        Ok(())
    }
}
