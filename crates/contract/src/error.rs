use std::path::PathBuf;
use thiserror::Error;

/// Result type for contract loading
pub type Result<T> = std::result::Result<T, ContractError>;

/// Errors raised while reading contract documents
#[derive(Error, Debug)]
pub enum ContractError {
    /// The document could not be read
    #[error("Failed to read contract {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The contracts directory does not exist or is not a directory
    #[error("Invalid contracts directory: {0}")]
    InvalidPath(String),

    /// Another document already declared this contract name
    #[error("Duplicate contract name `{name}` in {path}")]
    DuplicateName { name: String, path: PathBuf },
}

impl ContractError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
