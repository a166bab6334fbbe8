//! Shared entry for the `checklist` and `verify-all` binaries. The two differ
//! only in the [`Profile`] they pass to [`execute`].

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use checklist_core::{
    resolve_project_path, ChecklistConfig, Context, Orchestrator, Profile, ReportDocument,
    Reporter, SystemExecutor,
};
use clap::Args;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "CHECKLIST_LOG";

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Project directory to validate.
    #[arg(default_value = ".")]
    pub path: PathBuf,
    /// Config file; defaults to <path>/checklist.toml when present.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Also write the finished report as JSON to this file.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .ok();
}

/// Runs one profile end to end and returns the process exit code.
pub fn execute(profile: Profile, args: CommonArgs, url: Option<String>) -> Result<i32> {
    let project_path = resolve_project_path(&args.path)?;
    let cfg = ChecklistConfig::discover(&project_path, args.config.as_deref())?;
    let registry = profile.registry(&cfg)?;
    let ctx = Context::new(project_path, url, profile.command_timeout(&cfg));
    info!(target: "checklist.cli", ?profile, checks = registry.len(), project = %ctx.project_path.display(), "starting run");

    let (report, aggregate) = {
        let mut reporter = Reporter::new(
            io::stdout().lock(),
            profile.title(),
            profile.policy(&cfg),
            profile.message_limit(),
        )
        .with_failure_hint(profile.failure_hint());
        reporter.header(&ctx).context("failed to write header")?;
        let report = Orchestrator::new(&SystemExecutor).run_observed(&registry, &ctx, &mut reporter);
        let aggregate = reporter.finish(&report).context("failed to write summary")?;
        (report, aggregate)
    };

    let report_path = args
        .report
        .or_else(|| cfg.report.as_ref().map(|r| r.path.clone()));
    if let Some(path) = report_path {
        let written = ReportDocument::new(
            profile,
            &ctx.project_path,
            ctx.url.as_deref(),
            &report,
            aggregate,
        )
        .write(&path)?;
        println!("Report written to {}", written.display());
    }

    Ok(aggregate.exit_code)
}

/// Maps the outcome of [`execute`] to a process exit status; fatal errors
/// exit 1.
pub fn exit_status(outcome: Result<i32>) -> ExitCode {
    match outcome {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(1)
        }
    }
}
