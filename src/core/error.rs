use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal failures. Everything tolerated per file is a value (see `reader::ParseFailure`,
/// `scan::ScanFailure`), never one of these.
#[derive(Error, Debug)]
pub enum SpecError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("Specification root is not readable: {path}: {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Output directory cannot be prepared: {path}: {source}")]
    OutputUnwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
