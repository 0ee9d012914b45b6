mod backup;
mod cli;
mod config;
mod database;
mod error;
mod log;

use clap::Parser;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    log::init();

    let args = cli::Args::parse();

    let shutdown = Arc::new(AtomicUsize::new(0));
    let shutdown_clone = shutdown.clone();

    if let Err(e) = ctrlc::set_handler(move || {
        let count = shutdown_clone.fetch_add(1, Ordering::SeqCst);

        if count == 0 {
            println!("\n\nShutdown signal received. Running dumps will finish; press Ctrl+C again to force exit...");
        } else {
            println!("\nForce exiting...");
            std::process::exit(130);
        }
    }) {
        error!("Could not install Ctrl-C handler: {}", e);
    }

    match cli::run(args, shutdown).await {
        Ok(_) => {
            info!("Finished");
        }
        Err(e) => {
            // 2 is taken by clap for usage errors
            eprintln!("Error: {}", e);
            std::process::exit(3);
        }
    }
}
