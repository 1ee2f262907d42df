use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("launch path is empty")]
    EmptyPath,

    #[error("embedded NUL byte in {field}: {value:?}")]
    EmbeddedNul { field: &'static str, value: String },

    #[error("invalid task line: {0}")]
    InvalidTaskLine(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
