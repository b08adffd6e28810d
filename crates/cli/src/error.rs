//! CLI error types.

use thiserror::Error;

/// CLI errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Configuration is invalid or unreadable.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// The catalog file could not be loaded.
    #[error(transparent)]
    Store(#[from] store::Error),

    /// An error surfaced from the conversation runtime.
    #[error(transparent)]
    Runtime(#[from] runtime::Error),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
