use crate::backup::fs::ensure_directory;
use crate::config::{Configuration, ServerSpec};
use crate::database::DumpTool;
use crate::error::Result;
use chrono::{DateTime, Local};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{error, info, warn};

/// `{database}-{DDMMYYYY-HHmm}.sql`. Two dumps of the same database within
/// one minute map to the same name and the later one wins.
pub fn dump_file_name(database: &str, at: &DateTime<Local>) -> String {
    format!("{}-{}.sql", database, at.format("%d%m%Y-%H%M"))
}

fn write_dump(path: &Path, payload: &[u8]) -> Result<()> {
    if let Err(e) = fs::write(path, payload) {
        let _ = fs::remove_file(path);
        return Err(e.into());
    }
    Ok(())
}

/// Dumps one database and stores it under the server's directory tree.
/// Returns whether a file was written; failures are only logged.
pub async fn dump_one_database(
    tool: &dyn DumpTool,
    config: &Configuration,
    server: &ServerSpec,
    database: &str,
) -> bool {
    let began = Instant::now();

    let payload = match tool.dump(server, database).await {
        Ok(payload) => payload,
        Err(e) => {
            error!(
                "dump {} on {} via {} failed: {} (cmd: {})",
                database,
                server.host,
                tool.name(),
                e,
                tool.describe(server, database)
            );
            return false;
        }
    };

    let dir = server.database_dir(&config.dump_root_path, database);
    if let Err(e) = ensure_directory(&dir) {
        error!(
            "dump {} on {} failed: cannot create {}: {}",
            database,
            server.host,
            dir.display(),
            e
        );
        return false;
    }

    let path = dir.join(dump_file_name(database, &Local::now()));
    if let Err(e) = write_dump(&path, &payload) {
        error!(
            "dump {} on {} failed: cannot write {}: {}",
            database,
            server.host,
            path.display(),
            e
        );
        return false;
    }

    info!("dump {} on {} in {:?}", database, server.host, began.elapsed());
    true
}

/// Dumps every database of `server` in configured order, one at a time.
pub async fn dump_server(
    tool: &dyn DumpTool,
    config: &Configuration,
    server: &ServerSpec,
    shutdown: &AtomicUsize,
) {
    let mut succeeded = 0usize;

    for database in &server.databases {
        if shutdown.load(Ordering::Relaxed) > 0 {
            warn!(
                "Shutdown requested, not starting remaining dumps on {}",
                server.label()
            );
            break;
        }
        if dump_one_database(tool, config, server, database).await {
            succeeded += 1;
        }
    }

    info!(
        "Server {} finished: {}/{} databases dumped",
        server.label(),
        succeeded,
        server.databases.len()
    );
}
