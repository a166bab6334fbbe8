use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;

use crate::error::{ChecklistError, Result};
use crate::exec::{CommandExecutor, ExecResult};

/// Absolute form of the requested project directory; a missing path is a
/// usage error and no check may run.
pub fn resolve_project_path(path: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(path).map_err(|_| {
        let shown = std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf());
        ChecklistError::ProjectNotFound(shown)
    })
}

/// Read-only inputs shared by every check in one invocation.
#[derive(Debug, Clone)]
pub struct Context {
    pub project_path: PathBuf,
    pub url: Option<String>,
    pub command_timeout: Duration,
}

impl Context {
    pub fn new(project_path: impl Into<PathBuf>, url: Option<String>, command_timeout: Duration) -> Self {
        Self {
            project_path: project_path.into(),
            url,
            command_timeout,
        }
    }

    pub fn has_file(&self, relative: impl AsRef<Path>) -> bool {
        self.project_path.join(relative).exists()
    }

    /// Runs `argv` inside the project directory with the invocation's timeout.
    pub fn run(&self, exec: &dyn CommandExecutor, argv: &[&str]) -> ExecResult {
        exec.execute(argv, Some(self.project_path.as_path()), self.command_timeout)
    }
}

/// Coarse ordering bucket. Registries list tiers in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityTier {
    Security,
    Quality,
    Extended,
    Network,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

impl CheckStatus {
    pub fn passed(self) -> bool {
        self != CheckStatus::Fail
    }
}

/// What a check reports back before the orchestrator stamps it with a name
/// and duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub status: CheckStatus,
    pub message: String,
}

impl Outcome {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Pass,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Fail,
            message: message.into(),
        }
    }

    pub fn skipped(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Skipped,
            message: message.into(),
        }
    }

    /// Shared interpretation for command-backed checks: a missing tool is a
    /// skip, a timeout is a failure, otherwise exit status decides.
    pub fn from_command(
        result: &ExecResult,
        tool: &str,
        passed: &str,
        failed: &str,
    ) -> Self {
        if result.is_not_found() {
            Outcome::skipped(format!("Skipped ({tool} not available)"))
        } else if result.is_timed_out() {
            Outcome::fail(result.stderr.clone())
        } else if result.success() {
            Outcome::pass(passed)
        } else {
            Outcome::fail(result.diagnostic(failed))
        }
    }
}

/// One validation concern.
///
/// `is_applicable` is asked first; when it answers `false` the check resolves
/// to a skipped pass carrying `skip_reason` and `evaluate` is never called.
pub trait Check: Send + Sync {
    fn is_applicable(&self, ctx: &Context) -> bool;

    fn skip_reason(&self) -> String {
        "Skipped (not applicable)".to_string()
    }

    fn evaluate(&self, ctx: &Context, exec: &dyn CommandExecutor) -> anyhow::Result<Outcome>;
}

pub struct CheckDescriptor {
    pub name: String,
    pub tier: PriorityTier,
    pub check: Box<dyn Check>,
}

impl CheckDescriptor {
    pub fn new(name: impl Into<String>, tier: PriorityTier, check: impl Check + 'static) -> Self {
        Self {
            name: name.into(),
            tier,
            check: Box::new(check),
        }
    }

    /// Applicability probe followed by evaluation. Errors are left for the
    /// orchestrator to fold into a failed result.
    pub fn run(&self, ctx: &Context, exec: &dyn CommandExecutor) -> anyhow::Result<Outcome> {
        if !self.check.is_applicable(ctx) {
            return Ok(Outcome::skipped(self.check.skip_reason()));
        }
        self.check.evaluate(ctx, exec)
    }
}

impl std::fmt::Debug for CheckDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckDescriptor")
            .field("name", &self.name)
            .field("tier", &self.tier)
            .finish_non_exhaustive()
    }
}
