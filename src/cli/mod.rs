use crate::backup::{run_fleet, Mode};
use crate::config;
use crate::database::create_tool;
use crate::error::Result;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tracing::info;

/// Dumps MySQL databases of a fleet of servers and reports expired dumps.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Configuration file (JSON, or TOML with a .toml extension)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Dump every configured database
    #[arg(short, long)]
    pub dump: bool,

    /// Report (or delete, if enabled) dumps older than the retention window
    #[arg(short, long)]
    pub purge: bool,
}

impl Args {
    pub fn mode(&self) -> Mode {
        Mode::from_flags(self.dump, self.purge)
    }
}

fn print_usage() {
    let _ = Args::command().print_help();
}

/// Loads the configuration and runs the requested phases. Only a
/// configuration failure is returned as an error.
pub async fn run(args: Args, shutdown: Arc<AtomicUsize>) -> Result<()> {
    let Some(config_path) = args.config.as_deref() else {
        print_usage();
        return Ok(());
    };

    let config = Arc::new(config::load_from(config_path)?);

    let mode = args.mode();
    if mode == Mode::Neither {
        print_usage();
        return Ok(());
    }

    let tool = create_tool(&config.dump_tool);
    info!("Using {} for dumps into {}", tool.name(), config.dump_root_path.display());

    run_fleet(config, tool, mode, shutdown).await;
    Ok(())
}
