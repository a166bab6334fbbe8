use anyhow::Context as _;
use serde::Deserialize;

use crate::check::{Check, Context, Outcome};
use crate::config::LighthouseConfig;
use crate::exec::CommandExecutor;

/// Performance audit of the live URL. Any non-zero exit means the auditor
/// could not run here and resolves to a skip.
#[derive(Debug, Clone)]
pub struct LighthouseCheck {
    min_performance: f64,
}

impl LighthouseCheck {
    pub fn new(min_performance: f64) -> Self {
        Self { min_performance }
    }

    pub fn from_config(cfg: &LighthouseConfig) -> Self {
        Self::new(cfg.min_performance())
    }
}

#[derive(Debug, Default, Deserialize)]
struct LighthouseReport {
    #[serde(default)]
    categories: Categories,
}

#[derive(Debug, Default, Deserialize)]
struct Categories {
    #[serde(default)]
    performance: Category,
}

#[derive(Debug, Default, Deserialize)]
struct Category {
    #[serde(default)]
    score: Option<f64>,
}

impl Check for LighthouseCheck {
    fn is_applicable(&self, ctx: &Context) -> bool {
        ctx.url.is_some()
    }

    fn skip_reason(&self) -> String {
        "Skipped (no URL provided)".to_string()
    }

    fn evaluate(&self, ctx: &Context, exec: &dyn CommandExecutor) -> anyhow::Result<Outcome> {
        let Some(url) = ctx.url.as_deref() else {
            return Ok(Outcome::skipped(self.skip_reason()));
        };
        let result = ctx.run(
            exec,
            &[
                "npx",
                "lighthouse",
                url,
                "--output=json",
                "--quiet",
                "--chrome-flags=--headless",
            ],
        );
        if result.is_timed_out() {
            return Ok(Outcome::from_command(&result, "Lighthouse", "", ""));
        }
        if !result.success() {
            return Ok(Outcome::skipped("Skipped (Lighthouse not available)"));
        }

        let report: LighthouseReport =
            serde_json::from_str(&result.stdout).context("Lighthouse produced malformed JSON")?;
        // Percent at one decimal; the same value is compared and printed.
        let score = report.categories.performance.score.unwrap_or(0.0);
        let performance = (score * 1000.0).round() / 10.0;
        if performance >= self.min_performance {
            Ok(Outcome::pass(format!("Performance: {performance}%")))
        } else {
            Ok(Outcome::fail(format!(
                "Performance: {performance}% (target: {}%)",
                self.min_performance
            )))
        }
    }
}
