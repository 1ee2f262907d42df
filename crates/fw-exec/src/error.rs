use std::io;

use thiserror::Error;

use fw_model::ChildId;

/// Process creation failed; no child exists.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to create process for '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Reaping a child failed.
#[derive(Debug, Error)]
pub enum WaitError {
    #[error("failed to wait for {child}: {source}")]
    Io {
        child: ChildId,
        #[source]
        source: io::Error,
    },

    #[error("wait task failed: {0}")]
    Join(String),
}
