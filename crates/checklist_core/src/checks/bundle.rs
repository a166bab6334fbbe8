use std::path::PathBuf;

use crate::check::{Check, Context, Outcome};
use crate::exec::CommandExecutor;

const BUILD_DIRS: &[&str] = &[".next", "dist"];

/// Reports the size of the first build output directory found. Informational
/// only: it never fails on size.
#[derive(Debug, Clone, Default)]
pub struct BundleSizeCheck;

impl BundleSizeCheck {
    fn build_dir(ctx: &Context) -> Option<PathBuf> {
        BUILD_DIRS
            .iter()
            .map(|dir| ctx.project_path.join(dir))
            .find(|path| path.is_dir())
    }
}

impl Check for BundleSizeCheck {
    fn is_applicable(&self, ctx: &Context) -> bool {
        ctx.has_file("package.json") && Self::build_dir(ctx).is_some()
    }

    fn skip_reason(&self) -> String {
        "Skipped (no build found)".to_string()
    }

    fn evaluate(&self, ctx: &Context, exec: &dyn CommandExecutor) -> anyhow::Result<Outcome> {
        let Some(build_dir) = Self::build_dir(ctx) else {
            return Ok(Outcome::skipped(self.skip_reason()));
        };
        let target = build_dir.to_string_lossy().into_owned();
        let result = ctx.run(exec, &["du", "-sh", target.as_str()]);
        if result.is_not_found() || result.is_timed_out() {
            return Ok(Outcome::from_command(&result, "du", "", ""));
        }
        // `du -sh` prints "<size>\t<path>".
        let size = result
            .stdout
            .split_whitespace()
            .next()
            .unwrap_or("unknown");
        Ok(Outcome::pass(format!("Build size: {size}")))
    }
}
