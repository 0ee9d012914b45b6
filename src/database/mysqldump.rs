use super::driver::DumpTool;
use crate::config::{DumpToolConfig, ServerSpec};
use crate::error::{BackupError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;
pub struct MysqldumpTool {
    program: String,
    extra_args: Vec<String>,
}

impl MysqldumpTool {
    pub fn new(config: &DumpToolConfig) -> Self {
        Self {
            program: config.program.clone(),
            extra_args: config.extra_args.clone(),
        }
    }
    fn command_args(&self, server: &ServerSpec, database: &str, redact: bool) -> Vec<String> {
        let mut args = vec![
            "-h".to_string(),
            server.host.clone(),
            "-P".to_string(),
            server.port.to_string(),
            "-u".to_string(),
            server.login.clone(),
        ];
        // A bare `-p` would make mysqldump prompt on the terminal.
        if !server.password.is_empty() {
            if redact {
                args.push("-p****".to_string());
            } else {
                args.push(format!("-p{}", server.password));
            }
        }
        args.extend(self.extra_args.iter().cloned());
        args.push(database.to_string());
        args
    }
}

#[async_trait]
impl DumpTool for MysqldumpTool {
    async fn dump(&self, server: &ServerSpec, database: &str) -> Result<Vec<u8>> {
        debug!("Running {}", self.describe(server, database));

        let mut command = Command::new(&self.program);
        command
            .args(self.command_args(server, database, false))
            .stdin(Stdio::null());
        // Own process group, so a terminal Ctrl+C does not kill the running dump.
        #[cfg(unix)]
        command.process_group(0);

        let output = command
            .output()
            .await
            .map_err(|e| BackupError::DumpTool(format!("failed to start {}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BackupError::DumpTool(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        Ok(output.stdout)
    }

    fn describe(&self, server: &ServerSpec, database: &str) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.command_args(server, database, true));
        parts.join(" ")
    }

    fn name(&self) -> &'static str {
        "mysqldump"
    }
}
