use std::process::ExitCode;

use checklist_cli::{execute, exit_status, init_tracing, CommonArgs};
use checklist_core::Profile;
use clap::Parser;

#[derive(Parser)]
#[command(version, about = "Full pre-deployment verification, including URL-dependent checks")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
    /// Live URL for the Lighthouse and E2E checks.
    #[arg(long)]
    url: Option<String>,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    exit_status(execute(Profile::Full, cli.common, cli.url))
}
