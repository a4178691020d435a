//! NovelReader - novels read aloud
//!
//! Splits a manuscript into narration and dialogue, works out who is
//! speaking, and gives every character a voice of their own.

pub mod app;
pub mod audio;
pub mod cli;
pub mod config;
pub mod error;
pub mod reader;
pub mod speech;
pub mod text;
pub mod voices;

pub use error::{NovelReaderError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
