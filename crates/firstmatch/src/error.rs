use firstmatch_core::ClauseError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read input '{path}'")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse record on line {line}")]
    ParseRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Clause evaluation failed for record on line {line}")]
    Clause {
        line: usize,
        #[source]
        source: ClauseError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
