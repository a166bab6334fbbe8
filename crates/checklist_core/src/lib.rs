//! Project-validation engine: a fixed, prioritized list of independent checks
//! run sequentially, each isolated from the others' faults, and folded into a
//! single verdict and exit code.

pub mod check;
pub mod checks;
pub mod config;
pub mod error;
pub mod exec;
pub mod orchestrator;
pub mod profile;
pub mod registry;
pub mod report;
pub mod reporter;

pub use check::{resolve_project_path, Check, CheckDescriptor, CheckStatus, Context, Outcome, PriorityTier};
pub use config::ChecklistConfig;
pub use error::{ChecklistError, Result};
pub use exec::{CommandExecutor, ExecResult, ScriptedExecutor, SystemExecutor, Termination};
pub use orchestrator::{Orchestrator, RunObserver};
pub use profile::Profile;
pub use registry::{CheckId, Registry};
pub use report::{Aggregate, AggregationPolicy, CheckResult, ReportDocument, RunReport, Verdict};
pub use reporter::Reporter;
