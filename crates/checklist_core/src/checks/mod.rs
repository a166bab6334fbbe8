//! Concrete checks. Everything tool-specific lives here; the orchestrator
//! only ever sees the [`Check`](crate::check::Check) contract.

pub mod accessibility;
pub mod bundle;
pub mod dependencies;
pub mod environment;
pub mod lighthouse;
pub mod secrets;
pub mod tool;

use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::{DirEntry, WalkDir};

pub use accessibility::AccessibilityCheck;
pub use bundle::BundleSizeCheck;
pub use dependencies::DependencyAuditCheck;
pub use environment::EnvironmentCheck;
pub use lighthouse::LighthouseCheck;
pub use secrets::SecretsCheck;
pub use tool::ToolCheck;

/// Files under `root` with one of `extensions`, skipping any directory whose
/// name is in `exclude_dirs`. Sorted so repeated runs visit the same order.
///
/// Entries that cannot be read are logged and left out of the result.
pub(crate) fn source_files(root: &Path, extensions: &[String], exclude_dirs: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_excluded(e, exclude_dirs))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(target: "checklist.scan", error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.iter().any(|wanted| wanted == ext));
        if matches {
            files.push(entry.into_path());
        }
    }
    files
}

fn is_excluded(entry: &DirEntry, exclude_dirs: &[String]) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| exclude_dirs.iter().any(|dir| dir == name))
}

/// Lossy read so binary or mis-encoded files never abort a scan. `None`
/// (after a warning) when the file cannot be read at all.
pub(crate) fn read_text(path: &Path) -> Option<String> {
    match std::fs::read(path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(err) => {
            warn!(target: "checklist.scan", path = %path.display(), error = %err, "skipping unreadable file");
            None
        }
    }
}

pub(crate) fn relative_display(root: &Path, path: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}
