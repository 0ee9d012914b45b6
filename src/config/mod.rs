mod types;

pub use types::*;

use crate::error::{BackupError, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

fn is_toml(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false)
}

/// Reads a JSON (or `.toml`) configuration file and validates it.
pub fn load_from(path: &Path) -> Result<Configuration> {
    if !path.exists() {
        return Err(BackupError::Config(format!(
            "config file not found at {}",
            path.display()
        )));
    }

    info!("Loading configuration from {:?}", path);
    let contents = fs::read_to_string(path)?;
    let config: Configuration = if is_toml(path) {
        toml::from_str(&contents)?
    } else {
        serde_json::from_str(&contents)?
    };
    config.validate()?;

    debug!(
        "Configuration loaded: {} server(s), retention {} hour(s)",
        config.servers.len(),
        config.retention_hours
    );
    for server in config.servers.iter().filter(|s| s.databases.is_empty()) {
        warn!("Server {} has no databases configured", server.label());
    }

    Ok(config)
}
