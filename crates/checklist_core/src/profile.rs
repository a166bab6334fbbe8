use std::time::Duration;

use serde::Serialize;

use crate::config::ChecklistConfig;
use crate::error::Result;
use crate::registry::Registry;
use crate::report::AggregationPolicy;

/// Which entry point is running. Everything that differs between the quick
/// checklist and full verification is derived from here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Quick,
    Full,
}

impl Profile {
    pub fn title(self) -> &'static str {
        match self {
            Profile::Quick => "Validation Checklist",
            Profile::Full => "Full Verification",
        }
    }

    pub fn registry(self, cfg: &ChecklistConfig) -> Result<Registry> {
        match self {
            Profile::Quick => Registry::quick(cfg),
            Profile::Full => Registry::full(cfg),
        }
    }

    pub fn policy(self, cfg: &ChecklistConfig) -> AggregationPolicy {
        match self {
            Profile::Quick => AggregationPolicy::Strict,
            Profile::Full => AggregationPolicy::Tolerant {
                threshold: cfg.policy.tolerant_threshold(),
            },
        }
    }

    pub fn command_timeout(self, cfg: &ChecklistConfig) -> Duration {
        let secs = match self {
            Profile::Quick => cfg.timeouts.quick_secs(),
            Profile::Full => cfg.timeouts.full_secs(),
        };
        Duration::from_secs(secs)
    }

    /// Suffix for the verdict line when the run fails.
    pub fn failure_hint(self) -> Option<&'static str> {
        match self {
            Profile::Quick => None,
            Profile::Full => Some("Fix issues before deploy"),
        }
    }

    /// Display cap for a check's message in progress and summary lines.
    pub fn message_limit(self) -> usize {
        match self {
            Profile::Quick => 200,
            Profile::Full => 100,
        }
    }
}
