use crate::config::ServerSpec;
use crate::error::Result;
use async_trait::async_trait;
/// Produces the full dump of one database as bytes.
///
/// Every failure mode (unreachable host, bad credentials, tool missing,
/// non-zero exit) is reported the same way, as an `Err`.
#[async_trait]
pub trait DumpTool: Send + Sync {
    async fn dump(&self, server: &ServerSpec, database: &str) -> Result<Vec<u8>>;
    /// Command line with credentials masked, for log lines.
    fn describe(&self, server: &ServerSpec, database: &str) -> String;
    fn name(&self) -> &'static str;
}
