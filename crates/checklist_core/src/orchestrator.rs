//! Sequential, failure-isolated check execution.
//!
//! Every descriptor yields exactly one result. An `Err` or a panic from a
//! check becomes a failed result and the run moves on; there is no
//! short-circuiting and no retry.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use tracing::{info, warn};

use crate::check::{CheckDescriptor, CheckStatus, Context, Outcome};
use crate::exec::CommandExecutor;
use crate::registry::Registry;
use crate::report::{CheckResult, RunReport};

/// Receives progress as the run streams results.
pub trait RunObserver {
    fn check_started(&mut self, _descriptor: &CheckDescriptor) {}
    fn check_finished(&mut self, _result: &CheckResult) {}
}

impl RunObserver for () {}

pub struct Orchestrator<'a> {
    exec: &'a dyn CommandExecutor,
}

impl<'a> Orchestrator<'a> {
    pub fn new(exec: &'a dyn CommandExecutor) -> Self {
        Self { exec }
    }

    pub fn run(&self, registry: &Registry, ctx: &Context) -> RunReport {
        self.run_observed(registry, ctx, &mut ())
    }

    pub fn run_observed(
        &self,
        registry: &Registry,
        ctx: &Context,
        observer: &mut dyn RunObserver,
    ) -> RunReport {
        let mut report = RunReport::new();
        for descriptor in registry.descriptors() {
            observer.check_started(descriptor);
            let result = self.run_isolated(descriptor, ctx);
            observer.check_finished(&result);
            report.push(result);
        }
        info!(
            target: "checklist.orchestrator",
            passed = report.passed_count(),
            total = report.total_count(),
            "run complete"
        );
        report
    }

    fn run_isolated(&self, descriptor: &CheckDescriptor, ctx: &Context) -> CheckResult {
        let started = Instant::now();
        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| descriptor.run(ctx, self.exec))) {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(err)) => {
                warn!(target: "checklist.orchestrator", check = %descriptor.name, error = %format!("{err:#}"), "check errored");
                Outcome::fail(format!("Error: {err:#}"))
            }
            Err(payload) => {
                let payload = panic_message(payload.as_ref());
                warn!(target: "checklist.orchestrator", check = %descriptor.name, %payload, "check panicked");
                Outcome::fail(format!("Error: check panicked: {payload}"))
            }
        };
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        if outcome.status == CheckStatus::Fail {
            info!(target: "checklist.orchestrator", check = %descriptor.name, duration_ms, "failed");
        }
        CheckResult {
            name: descriptor.name.clone(),
            tier: descriptor.tier,
            status: outcome.status,
            message: outcome.message,
            duration_ms: Some(duration_ms),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
