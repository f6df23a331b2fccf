use thiserror::Error;

#[derive(Debug, Error)]
pub enum XwalkError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid column selection: {0}")]
    InvalidSelection(String),
    #[error("mismatched column lengths: {0}")]
    LengthMismatch(String),
    #[error("unsupported session version {found}, expected {expected}")]
    SchemaVersion { found: u32, expected: u32 },
    #[error("invalid match key '{0}'")]
    InvalidMatchKey(String),
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, XwalkError>;
