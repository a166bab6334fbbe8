use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{ChecklistError, Result};
use crate::registry::CheckId;

pub const CONFIG_FILE_NAME: &str = "checklist.toml";

pub const DEFAULT_TOLERANT_THRESHOLD: f64 = 0.8;
pub const DEFAULT_QUICK_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_FULL_TIMEOUT_SECS: u64 = 600;
/// Upper bound on a configured command timeout (one day).
pub const MAX_TIMEOUT_SECS: u64 = 86_400;
pub const DEFAULT_MAX_CRITICAL: u64 = 0;
pub const DEFAULT_MAX_HIGH: u64 = 0;
pub const DEFAULT_MIN_PERFORMANCE: f64 = 90.0;

pub const DEFAULT_SECRET_PATTERNS: &[&str] = &[
    r#"password\s*=\s*["'][^"']+["']"#,
    r#"api_key\s*=\s*["'][^"']+["']"#,
    r#"secret\s*=\s*["'][^"']+["']"#,
    "AWS_SECRET",
    "PRIVATE_KEY",
];
pub const DEFAULT_SECRET_EXTENSIONS: &[&str] = &["ts", "js", "py"];
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &["node_modules", ".git"];

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ChecklistConfig {
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub lighthouse: LighthouseConfig,
    #[serde(default)]
    pub secrets: SecretsConfig,
    #[serde(default)]
    pub checks: CheckToggles,
    #[serde(default)]
    pub report: Option<ReportConfig>,
}

impl ChecklistConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|source| ChecklistError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: ChecklistConfig =
            toml::from_str(&data).map_err(|source| ChecklistError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// An explicit path must exist; otherwise `<project>/checklist.toml` is
    /// used when present and built-in defaults when not.
    pub fn discover(project_path: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            debug!(target: "checklist.config", path = %path.display(), "loading explicit config");
            return Self::from_path(path);
        }
        let candidate = project_path.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            debug!(target: "checklist.config", path = %candidate.display(), "loading project config");
            return Self::from_path(&candidate);
        }
        debug!(target: "checklist.config", "no config file, using defaults");
        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<()> {
        let threshold = self.policy.tolerant_threshold();
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ChecklistError::InvalidThreshold(threshold));
        }
        for (field, secs) in [
            ("quick_secs", self.timeouts.quick_secs()),
            ("full_secs", self.timeouts.full_secs()),
        ] {
            if !(1..=MAX_TIMEOUT_SECS).contains(&secs) {
                return Err(ChecklistError::InvalidTimeout {
                    field,
                    secs,
                    max: MAX_TIMEOUT_SECS,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct PolicyConfig {
    #[serde(default)]
    pub tolerant_threshold: Option<f64>,
}

impl PolicyConfig {
    pub fn tolerant_threshold(&self) -> f64 {
        self.tolerant_threshold.unwrap_or(DEFAULT_TOLERANT_THRESHOLD)
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct TimeoutConfig {
    #[serde(default)]
    pub quick_secs: Option<u64>,
    #[serde(default)]
    pub full_secs: Option<u64>,
}

impl TimeoutConfig {
    pub fn quick_secs(&self) -> u64 {
        self.quick_secs.unwrap_or(DEFAULT_QUICK_TIMEOUT_SECS)
    }
    pub fn full_secs(&self) -> u64 {
        self.full_secs.unwrap_or(DEFAULT_FULL_TIMEOUT_SECS)
    }
}

/// Vulnerability counts above these limits fail the dependency audit.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct AuditConfig {
    #[serde(default)]
    pub max_critical: Option<u64>,
    #[serde(default)]
    pub max_high: Option<u64>,
}

impl AuditConfig {
    pub fn max_critical(&self) -> u64 {
        self.max_critical.unwrap_or(DEFAULT_MAX_CRITICAL)
    }
    pub fn max_high(&self) -> u64 {
        self.max_high.unwrap_or(DEFAULT_MAX_HIGH)
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LighthouseConfig {
    #[serde(default)]
    pub min_performance: Option<f64>,
}

impl LighthouseConfig {
    pub fn min_performance(&self) -> f64 {
        self.min_performance.unwrap_or(DEFAULT_MIN_PERFORMANCE)
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SecretsConfig {
    #[serde(default)]
    pub patterns: Option<Vec<String>>,
    #[serde(default)]
    pub extensions: Option<Vec<String>>,
    #[serde(default)]
    pub exclude_dirs: Option<Vec<String>>,
}

impl SecretsConfig {
    pub fn patterns(&self) -> Vec<String> {
        self.patterns
            .clone()
            .unwrap_or_else(|| to_owned(DEFAULT_SECRET_PATTERNS))
    }
    pub fn extensions(&self) -> Vec<String> {
        self.extensions
            .clone()
            .unwrap_or_else(|| to_owned(DEFAULT_SECRET_EXTENSIONS))
    }
    pub fn exclude_dirs(&self) -> Vec<String> {
        self.exclude_dirs
            .clone()
            .unwrap_or_else(|| to_owned(DEFAULT_EXCLUDE_DIRS))
    }
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Per-check switches; everything is on unless turned off.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CheckToggles {
    #[serde(default)]
    pub secrets: Option<bool>,
    #[serde(default)]
    pub dependencies: Option<bool>,
    #[serde(default)]
    pub environment: Option<bool>,
    #[serde(default)]
    pub lint: Option<bool>,
    #[serde(default)]
    pub typescript: Option<bool>,
    #[serde(default)]
    pub tests: Option<bool>,
    #[serde(default)]
    pub bundle: Option<bool>,
    #[serde(default)]
    pub accessibility: Option<bool>,
    #[serde(default)]
    pub lighthouse: Option<bool>,
    #[serde(default)]
    pub playwright: Option<bool>,
}

impl CheckToggles {
    pub fn enabled(&self, id: CheckId) -> bool {
        let toggle = match id {
            CheckId::Secrets => self.secrets,
            CheckId::Dependencies => self.dependencies,
            CheckId::Environment => self.environment,
            CheckId::Lint => self.lint,
            CheckId::TypeScript => self.typescript,
            CheckId::Tests => self.tests,
            CheckId::BundleSize => self.bundle,
            CheckId::Accessibility => self.accessibility,
            CheckId::Lighthouse => self.lighthouse,
            CheckId::Playwright => self.playwright,
        };
        toggle.unwrap_or(true)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg: ChecklistConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.policy.tolerant_threshold(), 0.8);
        assert_eq!(cfg.timeouts.quick_secs(), 300);
        assert_eq!(cfg.timeouts.full_secs(), 600);
        assert_eq!(cfg.audit.max_critical(), 0);
        assert_eq!(cfg.audit.max_high(), 0);
        assert_eq!(cfg.lighthouse.min_performance(), 90.0);
        assert_eq!(cfg.secrets.patterns().len(), 5);
        assert!(cfg.checks.enabled(CheckId::Lint));
        assert!(cfg.report.is_none());
    }

    #[test]
    fn overrides_are_read() {
        let cfg: ChecklistConfig = toml::from_str(
            r#"
            [policy]
            tolerant_threshold = 0.5

            [audit]
            max_high = 3

            [checks]
            lighthouse = false

            [report]
            path = "reports/checklist.json"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.policy.tolerant_threshold(), 0.5);
        assert_eq!(cfg.audit.max_high(), 3);
        assert_eq!(cfg.audit.max_critical(), 0);
        assert!(!cfg.checks.enabled(CheckId::Lighthouse));
        assert!(cfg.checks.enabled(CheckId::Playwright));
        assert_eq!(
            cfg.report.unwrap().path,
            PathBuf::from("reports/checklist.json")
        );
    }

    #[test]
    fn threshold_out_of_range_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[policy]\ntolerant_threshold = 1.5\n").unwrap();
        let err = ChecklistConfig::from_path(&path).unwrap_err();
        assert!(matches!(err, ChecklistError::InvalidThreshold(t) if t == 1.5));
    }

    #[test]
    fn zero_or_huge_timeouts_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        fs::write(&path, "[timeouts]\nquick_secs = 0\n").unwrap();
        let err = ChecklistConfig::from_path(&path).unwrap_err();
        assert!(matches!(
            err,
            ChecklistError::InvalidTimeout { field: "quick_secs", secs: 0, .. }
        ));

        fs::write(&path, "[timeouts]\nfull_secs = 9223372036854775807\n").unwrap();
        let err = ChecklistConfig::from_path(&path).unwrap_err();
        assert!(matches!(
            err,
            ChecklistError::InvalidTimeout { field: "full_secs", secs: 9223372036854775807, .. }
        ));

        fs::write(&path, "[timeouts]\nquick_secs = 86400\n").unwrap();
        assert_eq!(ChecklistConfig::from_path(&path).unwrap().timeouts.quick_secs(), 86_400);
    }

    #[test]
    fn discover_prefers_project_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[timeouts]\nquick_secs = 12\n",
        )
        .unwrap();
        let cfg = ChecklistConfig::discover(dir.path(), None).unwrap();
        assert_eq!(cfg.timeouts.quick_secs(), 12);

        let empty = tempfile::tempdir().unwrap();
        let cfg = ChecklistConfig::discover(empty.path(), None).unwrap();
        assert_eq!(cfg.timeouts.quick_secs(), 300);
    }

    #[test]
    fn missing_explicit_config_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = ChecklistConfig::discover(dir.path(), Some(&missing)).unwrap_err();
        assert!(matches!(err, ChecklistError::ConfigRead { .. }));
    }

    #[test]
    fn malformed_config_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[policy\n").unwrap();
        let err = ChecklistConfig::from_path(&path).unwrap_err();
        assert!(matches!(err, ChecklistError::ConfigParse { .. }));
    }
}
