use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("text recognition failed: {0}")]
    Recognition(#[from] RecognitionError),

    #[error("invalid option: {0}")]
    InvalidOption(String),
}

#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("failed to stage image for recognition: {0}")]
    Staging(#[from] io::Error),

    #[error("recognition engine '{engine}' could not be started: {source}")]
    EngineUnavailable {
        engine: String,
        #[source]
        source: io::Error,
    },

    #[error("recognition engine exited with {status}: {stderr}")]
    EngineFailed { status: String, stderr: String },

    #[error("malformed recognition output: {0}")]
    MalformedOutput(String),

    #[error("remote recognition service failed: {0}")]
    Remote(String),
}
