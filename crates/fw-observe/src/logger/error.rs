use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Failed to read the config file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to open the log file {path}: {source}")]
    InitFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Logger already initialized")]
    AlreadyInitialized,

    #[error("Invalid log level: {0} (expected: error|warning|info|debug)")]
    InvalidLevel(String),
}

pub type LoggerResult<T> = Result<T, LoggerError>;
