use std::io::{self, Write};

use crate::check::{CheckDescriptor, Context};
use crate::orchestrator::RunObserver;
use crate::report::{Aggregate, AggregationPolicy, CheckResult, RunReport, Verdict};

const PASS_MARK: &str = "✓";
const FAIL_MARK: &str = "✗";

/// Human-readable stdout stream: header, live progress, and the summary.
///
/// Write errors during live progress are dropped so a closed stdout cannot
/// interrupt the run; the header and summary propagate them.
pub struct Reporter<W: Write> {
    out: W,
    title: String,
    policy: AggregationPolicy,
    message_limit: usize,
    failure_hint: Option<String>,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, title: impl Into<String>, policy: AggregationPolicy, message_limit: usize) -> Self {
        Self {
            out,
            title: title.into(),
            policy,
            message_limit,
            failure_hint: None,
        }
    }

    /// Text appended to the verdict line of a failed run.
    pub fn with_failure_hint(mut self, hint: Option<&str>) -> Self {
        self.failure_hint = hint.map(str::to_string);
        self
    }

    pub fn header(&mut self, ctx: &Context) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", self.title)?;
        writeln!(self.out)?;
        writeln!(self.out, "Project: {}", ctx.project_path.display())?;
        if let Some(url) = &ctx.url {
            writeln!(self.out, "URL: {url}")?;
        }
        writeln!(self.out)
    }

    /// Prints the summary and returns the aggregate verdict.
    pub fn finish(&mut self, report: &RunReport) -> io::Result<Aggregate> {
        let aggregate = self.policy.aggregate(report);
        let summary = render_summary(
            report,
            &aggregate,
            self.message_limit,
            self.failure_hint.as_deref(),
        );
        writeln!(self.out)?;
        write!(self.out, "{summary}")?;
        self.out.flush()?;
        Ok(aggregate)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RunObserver for Reporter<W> {
    fn check_started(&mut self, descriptor: &CheckDescriptor) {
        let _ = writeln!(self.out, "Running: {}...", descriptor.name);
        let _ = self.out.flush();
    }

    fn check_finished(&mut self, result: &CheckResult) {
        let _ = writeln!(
            self.out,
            "  {} {}",
            mark(result),
            display_message(&result.message, self.message_limit)
        );
    }
}

/// Summary block listing every check, failed or not, then the verdict line.
pub fn render_summary(
    report: &RunReport,
    aggregate: &Aggregate,
    message_limit: usize,
    failure_hint: Option<&str>,
) -> String {
    let mut text = String::from("Summary\n\n");
    for result in report.results() {
        text.push_str(&format!(
            "  {} {}: {}\n",
            mark(result),
            result.name,
            display_message(&result.message, message_limit)
        ));
    }
    text.push('\n');
    let (passed, total) = (aggregate.passed, aggregate.total);
    let verdict = match aggregate.verdict {
        Verdict::AllPassed => format!("All checks passed ({passed}/{total})"),
        Verdict::ReviewWarnings => format!("{passed}/{total} checks passed - Review warnings"),
        Verdict::Failed => match failure_hint {
            Some(hint) => format!("{passed}/{total} checks passed - {hint}"),
            None => format!("{passed}/{total} checks passed"),
        },
    };
    text.push_str(&verdict);
    text.push('\n');
    text
}

fn mark(result: &CheckResult) -> &'static str {
    if result.passed() {
        PASS_MARK
    } else {
        FAIL_MARK
    }
}

/// Single-line form of a message, capped at `limit` characters.
pub fn display_message(message: &str, limit: usize) -> String {
    let flat = message
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("; ");
    if flat.chars().count() <= limit {
        flat
    } else {
        let mut cut: String = flat.chars().take(limit).collect();
        cut.push_str("...");
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{CheckStatus, PriorityTier};
    use std::time::Duration;

    fn result(name: &str, status: CheckStatus, message: &str) -> CheckResult {
        CheckResult {
            name: name.into(),
            tier: PriorityTier::Security,
            status,
            message: message.into(),
            duration_ms: Some(3),
        }
    }

    #[test]
    fn long_messages_are_truncated_for_display_only() {
        let message = "x".repeat(250);
        let shown = display_message(&message, 200);
        assert_eq!(shown.chars().count(), 203);
        assert!(shown.ends_with("..."));
        assert_eq!(message.len(), 250);
    }

    #[test]
    fn multi_line_messages_are_flattened() {
        assert_eq!(display_message("a\n\n b \nc", 100), "a; b; c");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(display_message("ééééé", 3), "ééé...");
    }

    #[test]
    fn summary_lists_failed_checks_too() {
        let report: RunReport = vec![
            result("Security: Secrets", CheckStatus::Pass, "No exposed secrets found"),
            result("Quality: Lint", CheckStatus::Fail, "3 problems\n2 errors"),
            result("Quality: Tests", CheckStatus::Skipped, "No test configuration found (skipped)"),
        ]
        .into_iter()
        .collect();
        let aggregate = AggregationPolicy::Strict.aggregate(&report);

        assert_eq!(
            render_summary(&report, &aggregate, 200, None),
            "Summary\n\n  \
             ✓ Security: Secrets: No exposed secrets found\n  \
             ✗ Quality: Lint: 3 problems; 2 errors\n  \
             ✓ Quality: Tests: No test configuration found (skipped)\n\
             \n2/3 checks passed\n"
        );
    }

    #[test]
    fn failure_hint_is_appended_only_on_failure() {
        let failed: RunReport = vec![
            result("Quality: Lint", CheckStatus::Fail, "bad"),
            result("Quality: Tests", CheckStatus::Pass, "Tests passed"),
        ]
        .into_iter()
        .collect();
        let aggregate = AggregationPolicy::Strict.aggregate(&failed);
        let hint = Some("Fix issues before deploy");
        assert!(render_summary(&failed, &aggregate, 100, hint)
            .ends_with("\n1/2 checks passed - Fix issues before deploy\n"));

        let passed: RunReport = std::iter::once(result("Quality: Tests", CheckStatus::Pass, "ok")).collect();
        let aggregate = AggregationPolicy::Strict.aggregate(&passed);
        assert!(render_summary(&passed, &aggregate, 100, hint).ends_with("\nAll checks passed (1/1)\n"));
    }

    #[test]
    fn reporter_streams_progress_and_summary() {
        let ctx = Context::new("/srv/app", Some("http://localhost:3000".into()), Duration::from_secs(1));
        let mut reporter = Reporter::new(Vec::new(), "Full Verification", AggregationPolicy::Strict, 100);
        reporter.header(&ctx).unwrap();
        let done = result("Accessibility", CheckStatus::Pass, "Found 2 aria-label usages");
        reporter.check_finished(&done);
        let report: RunReport = std::iter::once(done).collect();
        let aggregate = reporter.finish(&report).unwrap();

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(aggregate.exit_code, 0);
        assert!(text.contains("Project: /srv/app\nURL: http://localhost:3000\n"));
        assert!(text.contains("  ✓ Found 2 aria-label usages\n"));
        assert!(text.ends_with("All checks passed (1/1)\n"));
    }
}
