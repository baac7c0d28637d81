//! Periodic deletion of stale files from upload and output storage.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::error::Result;

/// Files older than this are eligible for deletion.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(30 * 60);

/// What a sweep did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    pub removed: Vec<PathBuf>,
    /// Files that were stale but could not be deleted.
    pub failed: Vec<PathBuf>,
}

/// Deletes regular files in `dir` whose modification time is more than
/// `max_age` in the past. Subdirectories are left alone.
///
/// Failing to read the directory itself is an error. Failures on individual
/// files are logged and recorded in the report, and the sweep carries on.
pub fn sweep_stale_files(dir: &Path, max_age: Duration) -> Result<SweepReport> {
    let now = SystemTime::now();
    let mut report = SweepReport::default();

    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("skipping unreadable entry in '{}': {}", dir.display(), e);
                continue;
            }
        };
        let path = entry.path();
        let metadata = match entry.metadata() {
            Ok(m) if m.is_file() => m,
            Ok(_) => continue,
            Err(e) => {
                log::warn!("cannot stat '{}': {}", path.display(), e);
                continue;
            }
        };

        // A modification time in the future counts as age zero.
        let age = metadata
            .modified()
            .ok()
            .and_then(|mtime| now.duration_since(mtime).ok())
            .unwrap_or_default();
        if age <= max_age {
            continue;
        }

        match fs::remove_file(&path) {
            Ok(()) => report.removed.push(path),
            Err(e) => {
                log::warn!("error deleting old file '{}': {}", path.display(), e);
                report.failed.push(path);
            }
        }
    }

    if !report.removed.is_empty() {
        log::info!(
            "swept {} stale file(s) from '{}'",
            report.removed.len(),
            dir.display()
        );
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    fn touch_with_age(path: &Path, age: Duration) {
        let file = File::create(path).unwrap();
        file.set_modified(SystemTime::now() - age).unwrap();
    }

    #[test]
    fn test_only_stale_files_are_removed() {
        let dir = tempdir().unwrap();
        let old = dir.path().join("old.jpg");
        let fresh = dir.path().join("fresh.jpg");
        touch_with_age(&old, Duration::from_secs(3600));
        touch_with_age(&fresh, Duration::from_secs(10));

        let report = sweep_stale_files(dir.path(), DEFAULT_MAX_AGE).unwrap();

        assert_eq!(report.removed, vec![old.clone()]);
        assert!(report.failed.is_empty());
        assert!(!old.exists());
        assert!(fresh.exists());
    }

    #[test]
    fn test_subdirectories_are_left_alone() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("nested");
        fs::create_dir(&sub).unwrap();
        touch_with_age(&sub.join("old.png"), Duration::from_secs(7200));

        let report = sweep_stale_files(dir.path(), Duration::ZERO).unwrap();

        assert!(report.removed.is_empty());
        assert!(sub.join("old.png").exists());
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(sweep_stale_files(&dir.path().join("absent"), DEFAULT_MAX_AGE).is_err());
    }
}
