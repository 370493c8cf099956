//! Error taxonomy for generation.
//!
//! Every variant is fatal: generation is deterministic, so retrying the same
//! input cannot change the outcome.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or missing input, detected before any synthesis runs.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal structural fault while assembling the generated items.
    #[error("synthesis error: {0}")]
    Synthesis(String),

    /// The destination could not be created or written.
    #[error("cannot write {}: {source}", path.display())]
    Emission {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Check mode found a destination that differs from the generated text.
    #[error("{} is out of date", path.display())]
    Stale { path: PathBuf },
}

impl Error {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }

    pub(crate) fn synthesis(msg: impl Into<String>) -> Self {
        Error::Synthesis(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
