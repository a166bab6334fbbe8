use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;

use crate::check::{CheckStatus, PriorityTier};
use crate::error::{ChecklistError, Result};
use crate::profile::Profile;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub tier: PriorityTier,
    pub status: CheckStatus,
    /// Full diagnostic. Display truncation happens in the reporter.
    pub message: String,
    pub duration_ms: Option<u64>,
}

impl CheckResult {
    pub fn passed(&self) -> bool {
        self.status.passed()
    }
}

/// Results in execution order. Only the orchestrator appends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    results: Vec<CheckResult>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, result: CheckResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    pub fn get(&self, name: &str) -> Option<&CheckResult> {
        self.results.iter().find(|r| r.name == name)
    }

    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }

    pub fn total_count(&self) -> usize {
        self.results.len()
    }
}

impl FromIterator<CheckResult> for RunReport {
    fn from_iter<I: IntoIterator<Item = CheckResult>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AggregationPolicy {
    /// Every check must pass.
    Strict,
    /// A pass ratio at or above `threshold` still exits zero.
    Tolerant { threshold: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    AllPassed,
    ReviewWarnings,
    Failed,
}

impl Verdict {
    pub fn exit_code(self) -> i32 {
        match self {
            Verdict::AllPassed | Verdict::ReviewWarnings => 0,
            Verdict::Failed => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Aggregate {
    pub verdict: Verdict,
    pub passed: usize,
    pub total: usize,
    pub exit_code: i32,
}

impl AggregationPolicy {
    pub fn aggregate(&self, report: &RunReport) -> Aggregate {
        let passed = report.passed_count();
        let total = report.total_count();
        let verdict = if passed == total {
            Verdict::AllPassed
        } else {
            match *self {
                AggregationPolicy::Tolerant { threshold }
                    if passed as f64 >= threshold * total as f64 =>
                {
                    Verdict::ReviewWarnings
                }
                _ => Verdict::Failed,
            }
        };
        Aggregate {
            verdict,
            passed,
            total,
            exit_code: verdict.exit_code(),
        }
    }
}

/// JSON document written when a report path is configured.
#[derive(Debug, Serialize)]
pub struct ReportDocument<'a> {
    pub profile: Profile,
    pub timestamp: String,
    pub project: &'a Path,
    pub url: Option<&'a str>,
    pub aggregate: Aggregate,
    pub checks: &'a [CheckResult],
}

impl<'a> ReportDocument<'a> {
    pub fn new(
        profile: Profile,
        project: &'a Path,
        url: Option<&'a str>,
        report: &'a RunReport,
        aggregate: Aggregate,
    ) -> Self {
        Self {
            profile,
            timestamp: Utc::now().to_rfc3339(),
            project,
            url,
            aggregate,
            checks: report.results(),
        }
    }

    pub fn write(&self, path: &Path) -> Result<PathBuf> {
        let io_err = |source| ChecklistError::ReportWrite {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?).map_err(io_err)?;
        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(passing: usize, failing: usize) -> RunReport {
        let result = |i: usize, status| CheckResult {
            name: format!("check-{i}"),
            tier: PriorityTier::Quality,
            status,
            message: String::new(),
            duration_ms: None,
        };
        (0..passing)
            .map(|i| result(i, CheckStatus::Pass))
            .chain((passing..passing + failing).map(|i| result(i, CheckStatus::Fail)))
            .collect()
    }

    const TOLERANT: AggregationPolicy = AggregationPolicy::Tolerant { threshold: 0.8 };

    #[test]
    fn strict_requires_every_check() {
        assert_eq!(AggregationPolicy::Strict.aggregate(&report(6, 0)).exit_code, 0);
        let one_failure = AggregationPolicy::Strict.aggregate(&report(5, 1));
        assert_eq!(one_failure.verdict, Verdict::Failed);
        assert_eq!(one_failure.exit_code, 1);
    }

    #[test]
    fn tolerant_allows_eighty_percent() {
        insta::assert_json_snapshot!(TOLERANT.aggregate(&report(8, 1)), @r###"
        {
          "verdict": "review_warnings",
          "passed": 8,
          "total": 9,
          "exit_code": 0
        }
        "###);
        insta::assert_json_snapshot!(TOLERANT.aggregate(&report(7, 2)), @r###"
        {
          "verdict": "failed",
          "passed": 7,
          "total": 9,
          "exit_code": 1
        }
        "###);
    }

    #[test]
    fn tolerant_threshold_is_inclusive() {
        let at_threshold = TOLERANT.aggregate(&report(4, 1));
        assert_eq!(at_threshold.verdict, Verdict::ReviewWarnings);
        assert_eq!(at_threshold.exit_code, 0);

        let half = AggregationPolicy::Tolerant { threshold: 0.5 };
        assert_eq!(half.aggregate(&report(1, 1)).exit_code, 0);
        assert_eq!(half.aggregate(&report(2, 3)).exit_code, 1);
    }

    #[test]
    fn full_success_beats_tolerance() {
        let aggregate = TOLERANT.aggregate(&report(9, 0));
        assert_eq!(aggregate.verdict, Verdict::AllPassed);
    }

    #[test]
    fn empty_report_passes() {
        let aggregate = AggregationPolicy::Strict.aggregate(&RunReport::new());
        assert_eq!(aggregate.verdict, Verdict::AllPassed);
        assert_eq!(aggregate.total, 0);
    }

    #[test]
    fn skipped_counts_as_passed() {
        let skipped: RunReport = std::iter::once(CheckResult {
            name: "lint".into(),
            tier: PriorityTier::Quality,
            status: CheckStatus::Skipped,
            message: "skipped".into(),
            duration_ms: Some(1),
        })
        .collect();
        assert_eq!(skipped.passed_count(), 1);
        assert_eq!(AggregationPolicy::Strict.aggregate(&skipped).exit_code, 0);
    }

    #[test]
    fn document_is_written_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/report.json");
        let run = report(1, 1);
        let aggregate = AggregationPolicy::Strict.aggregate(&run);
        ReportDocument::new(Profile::Quick, dir.path(), None, &run, aggregate)
            .write(&target)
            .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
        assert_eq!(value["profile"], "quick");
        assert_eq!(value["aggregate"]["verdict"], "failed");
        assert_eq!(value["checks"].as_array().unwrap().len(), 2);
        assert_eq!(value["checks"][1]["status"], "fail");
    }
}
