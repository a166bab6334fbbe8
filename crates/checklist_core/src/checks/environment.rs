use std::fs;

use crate::check::{Check, Context, Outcome};
use crate::exec::CommandExecutor;

pub const ENV_FILES: &[&str] = &[".env", ".env.local", ".env.production"];
const IGNORE_FILE: &str = ".gitignore";

/// Flags environment files that exist but are not listed in `.gitignore`.
///
/// The ignore list is matched by literal substring, not by glob semantics.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentCheck;

impl Check for EnvironmentCheck {
    fn is_applicable(&self, ctx: &Context) -> bool {
        ENV_FILES.iter().any(|file| ctx.has_file(file))
    }

    fn skip_reason(&self) -> String {
        "No environment files found (skipped)".to_string()
    }

    fn evaluate(&self, ctx: &Context, _exec: &dyn CommandExecutor) -> anyhow::Result<Outcome> {
        let ignore_path = ctx.project_path.join(IGNORE_FILE);
        let ignore_list = if ignore_path.is_file() {
            Some(fs::read_to_string(&ignore_path)?)
        } else {
            None
        };

        let issues: Vec<String> = ENV_FILES
            .iter()
            .filter(|file| ctx.has_file(file))
            .filter_map(|file| match &ignore_list {
                None => Some(format!("No .gitignore found, {file} may be exposed")),
                Some(content) if !content.contains(file) => Some(format!("{file} not in .gitignore")),
                Some(_) => None,
            })
            .collect();

        if issues.is_empty() {
            Ok(Outcome::pass("Environment files properly ignored"))
        } else {
            Ok(Outcome::fail(issues.join("\n")))
        }
    }
}
