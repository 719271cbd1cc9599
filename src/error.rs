use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubsyncError {
    #[error("Transcript unavailable: {0}")]
    TranscriptUnavailable(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SubsyncError>;
