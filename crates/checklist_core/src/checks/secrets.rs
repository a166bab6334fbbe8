use std::path::{Path, PathBuf};

use regex::Regex;

use crate::check::{Check, Context, Outcome};
use crate::checks::{read_text, relative_display, source_files};
use crate::config::SecretsConfig;
use crate::error::{ChecklistError, Result};
use crate::exec::CommandExecutor;

/// Line-oriented regex scan for credentials committed to source files.
#[derive(Debug)]
pub struct SecretsCheck {
    patterns: Vec<Regex>,
    extensions: Vec<String>,
    exclude_dirs: Vec<String>,
}

impl SecretsCheck {
    pub fn new(patterns: &[String], extensions: Vec<String>, exclude_dirs: Vec<String>) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ChecklistError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            patterns,
            extensions,
            exclude_dirs,
        })
    }

    pub fn from_config(cfg: &SecretsConfig) -> Result<Self> {
        Self::new(&cfg.patterns(), cfg.extensions(), cfg.exclude_dirs())
    }

    fn scan(&self, root: &Path, files: impl IntoIterator<Item = PathBuf>) -> Outcome {
        // First file each pattern hit in, indexed like `patterns`.
        let mut first_hits: Vec<Option<String>> = vec![None; self.patterns.len()];

        for path in files {
            let Some(contents) = read_text(&path) else {
                continue;
            };
            for (pattern, hit) in self.patterns.iter().zip(first_hits.iter_mut()) {
                if hit.is_none() && contents.lines().any(|line| pattern.is_match(line)) {
                    *hit = Some(relative_display(root, &path));
                }
            }
            if first_hits.iter().all(Option::is_some) {
                break;
            }
        }

        let issues: Vec<String> = self
            .patterns
            .iter()
            .zip(&first_hits)
            .filter_map(|(pattern, hit)| {
                hit.as_ref()
                    .map(|file| format!("Potential secret found: {} ({file})", pattern.as_str()))
            })
            .collect();

        if issues.is_empty() {
            Outcome::pass("No exposed secrets found")
        } else {
            Outcome::fail(issues.join("\n"))
        }
    }
}

impl Check for SecretsCheck {
    fn is_applicable(&self, _ctx: &Context) -> bool {
        true
    }

    fn evaluate(&self, ctx: &Context, _exec: &dyn CommandExecutor) -> anyhow::Result<Outcome> {
        let root = &ctx.project_path;
        let files = source_files(root, &self.extensions, &self.exclude_dirs);
        Ok(self.scan(root, files))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::CheckStatus;
    use crate::config::DEFAULT_SECRET_PATTERNS;
    use crate::exec::ScriptedExecutor;
    use std::fs;
    use std::time::Duration;

    fn check() -> SecretsCheck {
        SecretsCheck::from_config(&SecretsConfig::default()).unwrap()
    }

    fn ctx(root: &std::path::Path) -> Context {
        Context::new(root, None, Duration::from_secs(1))
    }

    #[test]
    fn hardcoded_password_fails() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.ts"), "const password = \"abc123\";\n").unwrap();

        let outcome = check().evaluate(&ctx(dir.path()), &ScriptedExecutor::new()).unwrap();
        assert_eq!(outcome.status, CheckStatus::Fail);
        assert_eq!(
            outcome.message,
            format!("Potential secret found: {} (config.ts)", DEFAULT_SECRET_PATTERNS[0])
        );
    }

    #[test]
    fn clean_project_passes() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.js"), "const password = process.env.PASSWORD;\n").unwrap();

        let outcome = check().evaluate(&ctx(dir.path()), &ScriptedExecutor::new()).unwrap();
        assert_eq!(outcome, Outcome::pass("No exposed secrets found"));
    }

    #[test]
    fn one_line_per_pattern_not_per_occurrence() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.py"), "AWS_SECRET=1\nAWS_SECRET=2\n").unwrap();
        fs::write(dir.path().join("b.py"), "AWS_SECRET=3\nPRIVATE_KEY=4\n").unwrap();

        let outcome = check().evaluate(&ctx(dir.path()), &ScriptedExecutor::new()).unwrap();
        assert_eq!(
            outcome.message,
            "Potential secret found: AWS_SECRET (a.py)\nPotential secret found: PRIVATE_KEY (b.py)"
        );
    }

    #[test]
    fn excluded_dirs_and_other_extensions_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("node_modules/lib")).unwrap();
        fs::write(dir.path().join("node_modules/lib/x.js"), "PRIVATE_KEY").unwrap();
        fs::write(dir.path().join("notes.md"), "PRIVATE_KEY").unwrap();

        let outcome = check().evaluate(&ctx(dir.path()), &ScriptedExecutor::new()).unwrap();
        assert!(outcome.status.passed());
    }

    #[test]
    fn unreadable_file_does_not_hide_later_hits() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("z.py"), "PRIVATE_KEY = 1\n").unwrap();
        let files = vec![dir.path().join("vanished.ts"), dir.path().join("z.py")];

        let outcome = check().scan(dir.path(), files);
        assert_eq!(outcome, Outcome::fail("Potential secret found: PRIVATE_KEY (z.py)"));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let err = SecretsCheck::new(&["(unclosed".to_string()], vec![], vec![]).unwrap_err();
        assert!(matches!(err, ChecklistError::InvalidPattern { .. }));
    }
}
