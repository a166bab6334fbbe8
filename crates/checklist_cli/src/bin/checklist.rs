use std::process::ExitCode;

use checklist_cli::{execute, exit_status, init_tracing, CommonArgs};
use checklist_core::Profile;
use clap::Parser;

#[derive(Parser)]
#[command(version, about = "Run the priority-ordered quick validation checklist")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    exit_status(execute(Profile::Quick, cli.common, None))
}
