//! Bounded external command execution.
//!
//! Executors never fail: a missing program, a spawn error and a timeout all
//! come back as an [`ExecResult`] so checks have a single value to interpret.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

pub const TIMEOUT_MESSAGE: &str = "Command timed out";

const POLL_INTERVAL: Duration = Duration::from_millis(10);
/// How long output readers may lag behind process exit before being abandoned.
const DRAIN_GRACE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Exited,
    NotFound,
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub termination: Termination,
}

impl ExecResult {
    pub fn exited(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
            termination: Termination::Exited,
        }
    }

    pub fn not_found(program: &str) -> Self {
        Self {
            exit_code: 1,
            stdout: String::new(),
            stderr: format!("Command not found: {program}"),
            termination: Termination::NotFound,
        }
    }

    pub fn timed_out() -> Self {
        Self {
            exit_code: 1,
            stdout: String::new(),
            stderr: TIMEOUT_MESSAGE.to_string(),
            termination: Termination::TimedOut,
        }
    }

    pub fn success(&self) -> bool {
        self.termination == Termination::Exited && self.exit_code == 0
    }

    pub fn is_not_found(&self) -> bool {
        self.termination == Termination::NotFound
    }

    pub fn is_timed_out(&self) -> bool {
        self.termination == Termination::TimedOut
    }

    /// Trimmed stderr, else trimmed stdout, else `fallback`.
    pub fn diagnostic(&self, fallback: &str) -> String {
        [self.stderr.trim(), self.stdout.trim()]
            .into_iter()
            .find(|text| !text.is_empty())
            .unwrap_or(fallback)
            .to_string()
    }
}

pub trait CommandExecutor: Send + Sync {
    fn execute(&self, argv: &[&str], working_dir: Option<&Path>, timeout: Duration) -> ExecResult;
}

/// Runs commands as real child processes.
///
/// The child is always reaped before `execute` returns, including after a
/// timeout kill.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl CommandExecutor for SystemExecutor {
    fn execute(&self, argv: &[&str], working_dir: Option<&Path>, timeout: Duration) -> ExecResult {
        let Some((program, args)) = argv.split_first() else {
            return ExecResult::not_found("");
        };

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = working_dir {
            command.current_dir(dir);
        }

        // `None` when the bound is too large to represent; such a wait is unbounded.
        let deadline = Instant::now().checked_add(timeout);
        debug!(target: "checklist.exec", command = %argv.join(" "), timeout_secs = timeout.as_secs(), "spawning");
        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(target: "checklist.exec", program, "program not found");
                return ExecResult::not_found(program);
            }
            Err(err) => {
                return ExecResult::exited(1, "", format!("failed to start {program}: {err}"));
            }
        };

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break Some(status),
                Ok(None) if deadline.is_some_and(|d| Instant::now() >= d) => break None,
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(err) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return ExecResult::exited(1, "", format!("failed to wait for {program}: {err}"));
                }
            }
        };

        match status {
            Some(status) => {
                let exit_code = status.code().unwrap_or(-1);
                debug!(target: "checklist.exec", program, exit_code, "exited");
                ExecResult::exited(exit_code, collect(stdout), collect(stderr))
            }
            None => {
                let _ = child.kill();
                let _ = child.wait();
                warn!(target: "checklist.exec", program, timeout_secs = timeout.as_secs(), "killed after timeout");
                ExecResult::timed_out()
            }
        }
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<Receiver<Vec<u8>>> {
    let mut pipe = pipe?;
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        let _ = tx.send(buf);
    });
    Some(rx)
}

// A grandchild that inherited the pipe can keep it open past the child's
// exit; in that case whatever was not read in time is dropped.
fn collect(rx: Option<Receiver<Vec<u8>>>) -> String {
    rx.and_then(|rx| rx.recv_timeout(DRAIN_GRACE).ok())
        .map(|buf| String::from_utf8_lossy(&buf).into_owned())
        .unwrap_or_default()
}

/// One recorded call to a [`ScriptedExecutor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub argv: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub timeout: Duration,
}

/// Executor returning canned results keyed by the space-joined command line.
///
/// Unscripted commands behave like a missing program.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    responses: HashMap<String, ExecResult>,
    calls: Mutex<Vec<Invocation>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, command_line: &str, result: ExecResult) -> Self {
        self.responses.insert(command_line.to_string(), result);
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CommandExecutor for ScriptedExecutor {
    fn execute(&self, argv: &[&str], working_dir: Option<&Path>, timeout: Duration) -> ExecResult {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Invocation {
                argv: argv.iter().map(|arg| arg.to_string()).collect(),
                working_dir: working_dir.map(Path::to_path_buf),
                timeout,
            });
        let key = argv.join(" ");
        match self.responses.get(&key) {
            Some(result) => result.clone(),
            None => ExecResult::not_found(argv.first().copied().unwrap_or_default()),
        }
    }
}
