use crate::check::{Check, Context, Outcome};
use crate::exec::CommandExecutor;

/// A check that runs one tool when any of its marker files is present and
/// passes on a zero exit.
#[derive(Debug, Clone)]
pub struct ToolCheck {
    markers: &'static [&'static str],
    argv: &'static [&'static str],
    tool: &'static str,
    passed: &'static str,
    failed: &'static str,
    skip_reason: &'static str,
}

impl ToolCheck {
    pub fn lint() -> Self {
        Self {
            markers: &["package.json"],
            argv: &["npm", "run", "lint"],
            tool: "npm",
            passed: "Lint passed",
            failed: "Lint failed",
            skip_reason: "No lint configuration found (skipped)",
        }
    }

    pub fn typescript() -> Self {
        Self {
            markers: &["tsconfig.json"],
            argv: &["npx", "tsc", "--noEmit"],
            tool: "npx",
            passed: "TypeScript check passed",
            failed: "Type errors found",
            skip_reason: "No TypeScript configuration found (skipped)",
        }
    }

    pub fn tests() -> Self {
        Self {
            markers: &["package.json"],
            argv: &["npm", "test", "--", "--passWithNoTests"],
            tool: "npm",
            passed: "Tests passed",
            failed: "Tests failed",
            skip_reason: "No test configuration found (skipped)",
        }
    }

    pub fn playwright() -> Self {
        Self {
            markers: &["playwright.config.ts", "playwright.config.js"],
            argv: &["npx", "playwright", "test"],
            tool: "npx",
            passed: "E2E tests passed",
            failed: "E2E tests failed",
            skip_reason: "Skipped (no Playwright config)",
        }
    }
}

impl Check for ToolCheck {
    fn is_applicable(&self, ctx: &Context) -> bool {
        self.markers.iter().any(|marker| ctx.has_file(marker))
    }

    fn skip_reason(&self) -> String {
        self.skip_reason.to_string()
    }

    fn evaluate(&self, ctx: &Context, exec: &dyn CommandExecutor) -> anyhow::Result<Outcome> {
        let result = ctx.run(exec, self.argv);
        Ok(Outcome::from_command(&result, self.tool, self.passed, self.failed))
    }
}
