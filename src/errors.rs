//! The tagged error type shared by every core module.

use std::path::PathBuf;

/// Result alias used throughout the core modules.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the patch-and-preview core.
///
/// The Controller is the sole place that turns one of these into
/// user-visible output; every other module just propagates it with `?`.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("malformed fixes file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("edit at offset {offset}+{length} exceeds {path} ({available} bytes available)")]
    OutOfRange {
        path: PathBuf,
        offset: usize,
        length: usize,
        available: usize,
    },

    #[error("offset or line/column out of range")]
    NotFound,

    #[error("linter `{0}` not found on PATH")]
    LinterMissing(String),

    #[error("{0}")]
    Cli(String),
}
