use crate::check::{Check, Context, Outcome};
use crate::checks::{read_text, source_files};
use crate::exec::CommandExecutor;

const MARKUP_EXTENSIONS: &[&str] = &["tsx", "jsx"];
const ARIA_MARKER: &str = "aria-label";

/// Basic heuristic: counts `aria-label` usages in component sources.
#[derive(Debug, Clone)]
pub struct AccessibilityCheck {
    exclude_dirs: Vec<String>,
}

impl AccessibilityCheck {
    pub fn new(exclude_dirs: Vec<String>) -> Self {
        Self { exclude_dirs }
    }
}

impl Check for AccessibilityCheck {
    fn is_applicable(&self, _ctx: &Context) -> bool {
        true
    }

    fn evaluate(&self, ctx: &Context, _exec: &dyn CommandExecutor) -> anyhow::Result<Outcome> {
        let extensions: Vec<String> = MARKUP_EXTENSIONS.iter().map(|ext| ext.to_string()).collect();
        let mut usages = 0;
        for path in source_files(&ctx.project_path, &extensions, &self.exclude_dirs) {
            if let Some(text) = read_text(&path) {
                usages += text.lines().filter(|line| line.contains(ARIA_MARKER)).count();
            }
        }

        if usages > 0 {
            Ok(Outcome::pass(format!("Found {usages} aria-label usages")))
        } else {
            Ok(Outcome::pass("No accessibility issues detected (basic check)"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::ScriptedExecutor;
    use std::fs;
    use std::time::Duration;

    #[test]
    fn counts_lines_with_aria_labels() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("components")).unwrap();
        fs::write(
            dir.path().join("components/Button.tsx"),
            "<button aria-label=\"close\" />\n<div />\n<a aria-label=\"home\" />\n",
        )
        .unwrap();
        fs::write(dir.path().join("components/Nav.jsx"), "<nav aria-label=\"main\" />\n").unwrap();
        fs::write(dir.path().join("notes.ts"), "aria-label").unwrap();

        let ctx = Context::new(dir.path(), None, Duration::from_secs(1));
        let check = AccessibilityCheck::new(vec!["node_modules".into()]);
        let outcome = check.evaluate(&ctx, &ScriptedExecutor::new()).unwrap();
        assert_eq!(outcome, Outcome::pass("Found 3 aria-label usages"));
    }

    #[test]
    fn nothing_found_still_passes() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::new(dir.path(), None, Duration::from_secs(1));
        let check = AccessibilityCheck::new(vec![]);
        let outcome = check.evaluate(&ctx, &ScriptedExecutor::new()).unwrap();
        assert_eq!(outcome, Outcome::pass("No accessibility issues detected (basic check)"));
    }
}
