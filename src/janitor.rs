//! Background removal of stale scratch files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use log::{debug, error, info, warn};
use tokio::task::JoinHandle;

use crate::config::AppConfig;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    pub removed: Vec<PathBuf>,
    pub failures: usize,
}

/// Deletes regular files in `dirs` last modified more than `max_age` before
/// `now`. Problems with individual entries are logged and skipped.
pub fn sweep(dirs: &[PathBuf], max_age: Duration, now: SystemTime) -> SweepReport {
    let mut report = SweepReport::default();
    for dir in dirs {
        sweep_dir(dir, max_age, now, &mut report);
    }
    report
}

fn sweep_dir(dir: &Path, max_age: Duration, now: SystemTime, report: &mut SweepReport) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cleanup skipped {}: {}", dir.display(), e);
            report.failures += 1;
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Cleanup could not read an entry in {}: {}", dir.display(), e);
                report.failures += 1;
                continue;
            }
        };
        let path = entry.path();

        let modified = match entry.metadata() {
            Ok(meta) if meta.is_file() => meta.modified(),
            Ok(_) => continue,
            Err(e) => Err(e),
        };
        let age = match modified {
            // A timestamp in the future counts as fresh.
            Ok(mtime) => now.duration_since(mtime).unwrap_or_default(),
            Err(e) => {
                warn!("Cleanup could not stat {}: {}", path.display(), e);
                report.failures += 1;
                continue;
            }
        };

        if age <= max_age {
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed stale file {}", path.display());
                report.removed.push(path);
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                error!("Cleanup error for {}: {}", path.display(), e);
                report.failures += 1;
            }
        }
    }
}

/// Starts the cleanup loop on the current tokio runtime. The first sweep
/// runs immediately.
pub fn spawn(config: &AppConfig) -> JoinHandle<()> {
    let dirs = config.scratch_dirs();
    let max_age = config.file_retention;
    let period = config.cleanup_interval;

    info!(
        "Starting cleanup task: every {}s, removing files older than {}s",
        period.as_secs(),
        max_age.as_secs()
    );

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let dirs = dirs.clone();
            let result =
                tokio::task::spawn_blocking(move || sweep(&dirs, max_age, SystemTime::now())).await;
            match result {
                Ok(report) if !report.removed.is_empty() => {
                    info!("Cleanup removed {} stale file(s)", report.removed.len())
                }
                Ok(_) => debug!("Cleanup found nothing to remove"),
                Err(e) => error!("Cleanup task panicked: {}", e),
            }
        }
    })
}
