use anyhow::Context as _;
use serde::Deserialize;

use crate::check::{Check, Context, Outcome};
use crate::config::AuditConfig;
use crate::exec::CommandExecutor;

/// `npm audit` with severity thresholds. A non-zero exit alone is not a
/// failure; only critical/high counts above their limits are.
#[derive(Debug, Clone)]
pub struct DependencyAuditCheck {
    max_critical: u64,
    max_high: u64,
}

impl DependencyAuditCheck {
    pub fn new(max_critical: u64, max_high: u64) -> Self {
        Self {
            max_critical,
            max_high,
        }
    }

    pub fn from_config(cfg: &AuditConfig) -> Self {
        Self::new(cfg.max_critical(), cfg.max_high())
    }
}

#[derive(Debug, Default, Deserialize)]
struct AuditReport {
    #[serde(default)]
    metadata: AuditMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct AuditMetadata {
    #[serde(default)]
    vulnerabilities: VulnerabilityCounts,
}

#[derive(Debug, Default, Deserialize)]
struct VulnerabilityCounts {
    #[serde(default)]
    critical: u64,
    #[serde(default)]
    high: u64,
    #[serde(default)]
    moderate: u64,
}

impl Check for DependencyAuditCheck {
    fn is_applicable(&self, ctx: &Context) -> bool {
        ctx.has_file("package.json")
    }

    fn skip_reason(&self) -> String {
        "No package.json found (skipped)".to_string()
    }

    fn evaluate(&self, ctx: &Context, exec: &dyn CommandExecutor) -> anyhow::Result<Outcome> {
        let result = ctx.run(exec, &["npm", "audit", "--json"]);
        if result.is_not_found() || result.is_timed_out() {
            return Ok(Outcome::from_command(&result, "npm", "", ""));
        }
        if result.success() {
            return Ok(Outcome::pass("No vulnerabilities found"));
        }

        let report: AuditReport =
            serde_json::from_str(&result.stdout).context("npm audit produced malformed JSON")?;
        let counts = report.metadata.vulnerabilities;
        if counts.critical > self.max_critical || counts.high > self.max_high {
            Ok(Outcome::fail(format!(
                "Found {} critical, {} high vulnerabilities",
                counts.critical, counts.high
            )))
        } else {
            Ok(Outcome::pass(format!(
                "Found {} moderate vulnerabilities (acceptable)",
                counts.moderate
            )))
        }
    }
}
