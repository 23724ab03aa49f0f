use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BenchError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Benchmark file not found: {0}")]
    BenchmarkFileNotFound(PathBuf),

    #[error("Malformed benchmark file: {0}")]
    MalformedBenchmarkFile(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BenchError>;
