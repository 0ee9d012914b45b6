use crate::config::{Configuration, ServerSpec};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct PurgeCandidate {
    pub path: PathBuf,
    pub age_hours: f64,
}

/// Lists the files in `dir` whose last modification is strictly older than
/// `retention_hours` relative to `now`. A missing or unreadable directory
/// has nothing to purge.
pub fn evaluate_directory(dir: &Path, retention_hours: u64, now: SystemTime) -> Vec<PurgeCandidate> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Nothing to purge in {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let threshold = Duration::from_secs(retention_hours.saturating_mul(3600));
    let mut candidates = Vec::new();

    for entry in entries.flatten() {
        let path = entry.path();
        let modified = match entry.metadata().and_then(|m| {
            if m.is_file() {
                m.modified().map(Some)
            } else {
                Ok(None)
            }
        }) {
            Ok(Some(modified)) => modified,
            Ok(None) => continue,
            Err(e) => {
                warn!("Cannot read metadata of {}: {}", path.display(), e);
                continue;
            }
        };

        // future timestamps count as fresh
        let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
        if age > threshold {
            candidates.push(PurgeCandidate {
                path,
                age_hours: age.as_secs_f64() / 3600.0,
            });
        }
    }

    candidates.sort_by(|a, b| a.path.cmp(&b.path));
    candidates
}

/// Evaluates every database directory of `server` and, when the policy
/// allows it, removes the expired dumps.
pub fn purge_server(config: &Configuration, server: &ServerSpec) -> Vec<PurgeCandidate> {
    let now = SystemTime::now();
    let mut all = Vec::new();

    for database in &server.databases {
        let dir = server.database_dir(&config.dump_root_path, database);
        for candidate in evaluate_directory(&dir, config.retention_hours, now) {
            info!(
                "purge candidate {} is {:.2} hours old",
                candidate.path.display(),
                candidate.age_hours
            );
            if config.purge.delete_expired {
                match fs::remove_file(&candidate.path) {
                    Ok(()) => info!("Removed {}", candidate.path.display()),
                    Err(e) => error!("Failed to remove {}: {}", candidate.path.display(), e),
                }
            }
            all.push(candidate);
        }
    }

    info!(
        "Purge of {} finished: {} candidate(s), retention {} hour(s)",
        server.label(),
        all.len(),
        config.retention_hours
    );
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::testing::server;
    use std::fs::File;
    use std::time::UNIX_EPOCH;
    use tempfile::tempdir;

    const HOUR: u64 = 3600;

    fn touch(path: &Path, modified: SystemTime) {
        let file = File::create(path).unwrap();
        file.set_modified(modified).unwrap();
    }

    fn fixed_now() -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(1_700_000_000)
    }

    #[test]
    fn test_missing_directory_has_no_candidates() {
        let dir = tempdir().unwrap();
        let candidates = evaluate_directory(&dir.path().join("absent"), 48, fixed_now());
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_empty_directory_has_no_candidates() {
        let dir = tempdir().unwrap();
        assert!(evaluate_directory(dir.path(), 48, fixed_now()).is_empty());
    }

    #[test]
    fn test_retention_boundary_is_exclusive() {
        let dir = tempdir().unwrap();
        let now = fixed_now();
        let exact = dir.path().join("app-exact.sql");
        let older = dir.path().join("app-older.sql");
        touch(&exact, now - Duration::from_secs(48 * HOUR));
        touch(&older, now - Duration::from_secs(48 * HOUR + 1));

        let candidates = evaluate_directory(dir.path(), 48, now);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].path, older);
    }

    #[test]
    fn test_future_and_fresh_files_are_kept() {
        let fresh_dir = tempdir().unwrap();
        let future_dir = tempdir().unwrap();
        let now = fixed_now();
        touch(&fresh_dir.path().join("fresh.sql"), now - Duration::from_secs(HOUR));
        touch(&future_dir.path().join("future.sql"), now + Duration::from_secs(HOUR));

        assert!(evaluate_directory(fresh_dir.path(), 48, now).is_empty());
        // age zero is never strictly greater, even with no retention at all
        assert!(evaluate_directory(future_dir.path(), 0, now).is_empty());
    }

    #[test]
    fn test_subdirectories_are_ignored() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let later = SystemTime::now() + Duration::from_secs(1000 * HOUR);
        assert!(evaluate_directory(dir.path(), 1, later).is_empty());
    }

    #[test]
    fn test_purge_server_reports_old_dump_without_deleting() {
        let dir = tempdir().unwrap();
        let db1 = server("db1", 3306, &["app"]);
        let config = Configuration {
            dump_root_path: dir.path().to_path_buf(),
            retention_hours: 48,
            servers: vec![db1.clone()],
            ..Configuration::default()
        };
        let app_dir = db1.database_dir(dir.path(), "app");
        fs::create_dir_all(&app_dir).unwrap();
        let old = app_dir.join("app-01012024-0000.sql");
        let recent = app_dir.join("app-02012024-0000.sql");
        touch(&old, SystemTime::now() - Duration::from_secs(50 * HOUR));
        touch(&recent, SystemTime::now() - Duration::from_secs(HOUR));

        let candidates = purge_server(&config, &db1);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].path, old);
        assert!(candidates[0].age_hours > 49.9 && candidates[0].age_hours < 50.1);
        assert!(old.exists());
        assert!(recent.exists());
    }

    #[test]
    fn test_purge_server_deletes_when_enabled() {
        let dir = tempdir().unwrap();
        let db1 = server("db1", 3306, &["app", "never-dumped"]);
        let mut config = Configuration {
            dump_root_path: dir.path().to_path_buf(),
            retention_hours: 48,
            servers: vec![db1.clone()],
            ..Configuration::default()
        };
        config.purge.delete_expired = true;
        let app_dir = db1.database_dir(dir.path(), "app");
        fs::create_dir_all(&app_dir).unwrap();
        let old = app_dir.join("app-01012024-0000.sql");
        let recent = app_dir.join("app-02012024-0000.sql");
        touch(&old, SystemTime::now() - Duration::from_secs(50 * HOUR));
        touch(&recent, SystemTime::now() - Duration::from_secs(HOUR));

        let candidates = purge_server(&config, &db1);

        assert_eq!(candidates.len(), 1);
        assert!(!old.exists());
        assert!(recent.exists());
    }
}
