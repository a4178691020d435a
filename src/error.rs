//! Error types for NovelReader

use std::io;
use thiserror::Error;

/// Main error type for NovelReader
#[derive(Error, Debug)]
pub enum NovelReaderError {
    /// Missing or unreadable manuscript, missing `--file`
    #[error("Input error: {0}")]
    Input(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Remote backend failure (network, HTTP status, empty response)
    #[error("Speech synthesis error: {0}")]
    Synthesis(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Audio error: {0}")]
    Audio(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("INI parse error: {0}")]
    IniParse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for NovelReader operations
pub type Result<T> = std::result::Result<T, NovelReaderError>;

impl From<String> for NovelReaderError {
    fn from(s: String) -> Self {
        NovelReaderError::Other(s)
    }
}

impl From<&str> for NovelReaderError {
    fn from(s: &str) -> Self {
        NovelReaderError::Other(s.to_string())
    }
}

impl From<hound::Error> for NovelReaderError {
    fn from(e: hound::Error) -> Self {
        NovelReaderError::Audio(format!("WAV error: {}", e))
    }
}
