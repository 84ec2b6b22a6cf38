use std::collections::TryReserveError;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TagsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to open output {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Tag buffer allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Language not supported: {0}")]
    UnsupportedLanguage(String),

    #[error("Invalid source pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Config error in {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("Malformed TAGS data at byte {position}: {message}")]
    Format { position: usize, message: String },
}

pub type Result<T> = std::result::Result<T, TagsError>;
