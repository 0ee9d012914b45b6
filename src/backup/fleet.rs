use crate::backup::dump::dump_server;
use crate::backup::purge::purge_server;
use crate::config::Configuration;
use crate::database::DumpTool;
use futures::future::join_all;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Neither,
    Purge,
    Dump,
    Both,
}

impl Mode {
    pub fn from_flags(dump: bool, purge: bool) -> Self {
        match (dump, purge) {
            (true, true) => Mode::Both,
            (true, false) => Mode::Dump,
            (false, true) => Mode::Purge,
            (false, false) => Mode::Neither,
        }
    }

    pub fn includes_dump(&self) -> bool {
        matches!(self, Mode::Dump | Mode::Both)
    }

    pub fn includes_purge(&self) -> bool {
        matches!(self, Mode::Purge | Mode::Both)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Neither => write!(f, "nothing"),
            Mode::Purge => write!(f, "purge"),
            Mode::Dump => write!(f, "dump"),
            Mode::Both => write!(f, "purge then dump"),
        }
    }
}

async fn join_units(phase: &str, units: Vec<(String, JoinHandle<()>)>) {
    let (labels, handles): (Vec<_>, Vec<_>) = units.into_iter().unzip();
    for (label, result) in labels.iter().zip(join_all(handles).await) {
        if let Err(e) = result {
            error!("{} unit for {} aborted: {}", phase, label, e);
        }
    }
}

async fn run_purge_phase(config: &Arc<Configuration>) {
    let started = Instant::now();
    let units = config
        .servers
        .iter()
        .map(|server| {
            let config = Arc::clone(config);
            let server = server.clone();
            let label = server.label();
            let handle = tokio::task::spawn_blocking(move || {
                purge_server(&config, &server);
            });
            (label, handle)
        })
        .collect();

    join_units("purge", units).await;
    info!("Purge phase finished in {:?}", started.elapsed());
}

async fn run_dump_phase(
    config: &Arc<Configuration>,
    tool: &Arc<dyn DumpTool>,
    shutdown: &Arc<AtomicUsize>,
) {
    let started = Instant::now();
    let units = config
        .servers
        .iter()
        .map(|server| {
            let config = Arc::clone(config);
            let tool = Arc::clone(tool);
            let shutdown = Arc::clone(shutdown);
            let server = server.clone();
            let label = server.label();
            let handle = tokio::spawn(async move {
                dump_server(tool.as_ref(), &config, &server, &shutdown).await;
            });
            (label, handle)
        })
        .collect();

    join_units("dump", units).await;
    info!("Dump phase finished in {:?}", started.elapsed());
}

/// Runs the requested phases across every configured server. Each phase
/// starts one unit per server and waits for all of them; purge always
/// completes before dump begins.
pub async fn run_fleet(
    config: Arc<Configuration>,
    tool: Arc<dyn DumpTool>,
    mode: Mode,
    shutdown: Arc<AtomicUsize>,
) {
    if mode == Mode::Neither {
        info!("Neither dump nor purge requested, nothing to do");
        return;
    }

    info!("Running {} on {} server(s)", mode, config.servers.len());

    if mode.includes_purge() {
        run_purge_phase(&config).await;
    }

    if mode.includes_dump() {
        if shutdown.load(Ordering::Relaxed) > 0 {
            warn!("Shutdown requested, skipping dump phase");
            return;
        }
        run_dump_phase(&config, &tool, &shutdown).await;
    }
}
