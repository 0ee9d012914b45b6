use std::fmt;
use std::io;
#[derive(Debug)]
pub enum BackupError {
    Config(String),
    DumpTool(String),
    Io(io::Error),
    Serialization(String),
}

impl fmt::Display for BackupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackupError::Config(msg) => write!(f, "Configuration error: {}", msg),
            BackupError::DumpTool(msg) => write!(f, "Dump tool error: {}", msg),
            BackupError::Io(err) => write!(f, "IO error: {}", err),
            BackupError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for BackupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BackupError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for BackupError {
    fn from(err: io::Error) -> Self {
        BackupError::Io(err)
    }
}

impl From<toml::de::Error> for BackupError {
    fn from(err: toml::de::Error) -> Self {
        BackupError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for BackupError {
    fn from(err: serde_json::Error) -> Self {
        BackupError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BackupError>;
