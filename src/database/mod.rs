mod driver;
mod mysqldump;

pub use driver::DumpTool;
pub use mysqldump::MysqldumpTool;

use crate::config::DumpToolConfig;
use std::sync::Arc;
pub fn create_tool(config: &DumpToolConfig) -> Arc<dyn DumpTool> {
    Arc::new(MysqldumpTool::new(config))
}
