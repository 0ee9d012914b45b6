use crate::error::Result;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

pub fn path_exists(path: &Path) -> Result<bool> {
    match fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Creates `path` and any missing parents with mode 0755.
pub fn ensure_directory(path: &Path) -> Result<()> {
    if path_exists(path)? && path.is_dir() {
        return Ok(());
    }

    debug!("Creating directory {}", path.display());
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(path)?;
    Ok(())
}
