use crate::config::ServerSpec;
use crate::database::DumpTool;
use crate::error::{BackupError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Returns a canned payload per database name; unknown databases fail.
#[derive(Default)]
pub struct FakeTool {
    payloads: HashMap<String, Vec<u8>>,
    calls: Mutex<Vec<String>>,
}

impl FakeTool {
    pub fn with(mut self, database: &str, payload: &[u8]) -> Self {
        self.payloads.insert(database.to_string(), payload.to_vec());
        self
    }

    /// Invocations so far as `{host}-{port}/{database}`, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DumpTool for FakeTool {
    async fn dump(&self, server: &ServerSpec, database: &str) -> Result<Vec<u8>> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{}/{}", server.label(), database));
        self.payloads
            .get(database)
            .cloned()
            .ok_or_else(|| BackupError::DumpTool(format!("access denied to {}", database)))
    }

    fn describe(&self, server: &ServerSpec, database: &str) -> String {
        format!("fake {} {}", server.label(), database)
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

pub fn server(host: &str, port: u16, databases: &[&str]) -> ServerSpec {
    ServerSpec {
        host: host.to_string(),
        port,
        databases: databases.iter().map(|d| d.to_string()).collect(),
        login: "backup".to_string(),
        password: "secret".to_string(),
    }
}
