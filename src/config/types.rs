use crate::error::{BackupError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSpec {
    #[serde(alias = "Host")]
    pub host: String,
    #[serde(alias = "Port")]
    pub port: u16,
    #[serde(alias = "Db", alias = "db", alias = "DB")]
    pub databases: Vec<String>,
    #[serde(alias = "Login")]
    pub login: String,
    #[serde(alias = "Password", default)]
    pub password: String,
}

impl ServerSpec {
    /// Directory name shared by every database of this server, `{host}-{port}`.
    pub fn label(&self) -> String {
        format!("{}-{}", self.host, self.port)
    }

    pub fn database_dir(&self, root: &Path, database: &str) -> PathBuf {
        root.join(self.label()).join(database)
    }
}

impl Default for ServerSpec {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            databases: Vec::new(),
            login: "root".to_string(),
            password: String::new(),
        }
    }
}
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DumpToolConfig {
    #[serde(default = "default_program")]
    pub program: String,
    #[serde(default)]
    pub extra_args: Vec<String>,
}

fn default_program() -> String {
    "mysqldump".to_string()
}

impl Default for DumpToolConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            extra_args: Vec::new(),
        }
    }
}
/// Expired dumps are only reported unless `delete_expired` is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PurgePolicy {
    #[serde(default)]
    pub delete_expired: bool,
}
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Configuration {
    #[serde(alias = "Dumpdata", alias = "dumpdata", alias = "DumpData")]
    pub dump_root_path: PathBuf,
    #[serde(alias = "Every", alias = "every")]
    pub retention_hours: u64,
    #[serde(alias = "Server", alias = "server", default)]
    pub servers: Vec<ServerSpec>,
    #[serde(default)]
    pub dump_tool: DumpToolConfig,
    #[serde(default)]
    pub purge: PurgePolicy,
}

impl Configuration {
    pub fn validate(&self) -> Result<()> {
        if self.dump_root_path.as_os_str().is_empty() {
            return Err(BackupError::Config("dump_root_path must not be empty".to_string()));
        }
        if self.dump_tool.program.trim().is_empty() {
            return Err(BackupError::Config("dump_tool.program must not be empty".to_string()));
        }

        for (index, server) in self.servers.iter().enumerate() {
            if server.host.trim().is_empty() {
                return Err(BackupError::Config(format!("server #{} has an empty host", index)));
            }
            if server.port == 0 {
                return Err(BackupError::Config(format!(
                    "server {} has an invalid port 0",
                    server.host
                )));
            }
            if let Some(position) = server.databases.iter().position(|db| db.trim().is_empty()) {
                return Err(BackupError::Config(format!(
                    "server {} has an empty database name at position {}",
                    server.label(),
                    position
                )));
            }
        }

        Ok(())
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            dump_root_path: PathBuf::from("backups"),
            retention_hours: 48,
            servers: Vec::new(),
            dump_tool: DumpToolConfig::default(),
            purge: PurgePolicy::default(),
        }
    }
}
