use std::path::PathBuf;

use thiserror::Error;

/// Faults that stop an invocation before (or after) the checks run.
///
/// Anything that goes wrong inside a check is not represented here; the
/// orchestrator folds those into a failed `CheckResult` instead.
#[derive(Debug, Error)]
pub enum ChecklistError {
    #[error("Path does not exist: {}", .0.display())]
    ProjectNotFound(PathBuf),

    #[error("failed to read config {}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid secret pattern `{pattern}`")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("tolerant threshold must be within 0.0..=1.0, got {0}")]
    InvalidThreshold(f64),

    #[error("timeout `{field}` must be within 1..={max} seconds, got {secs}")]
    InvalidTimeout {
        field: &'static str,
        secs: u64,
        max: u64,
    },

    #[error("check `{0}` is registered twice")]
    DuplicateCheck(String),

    #[error("failed to write report {}", .path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode report")]
    ReportEncode(#[from] serde_json::Error),
}

pub type Result<T, E = ChecklistError> = std::result::Result<T, E>;
