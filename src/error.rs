//! Error taxonomy for the harness binary.
//!
//! Fingerprint collisions are deliberately absent from this enum: they are
//! logged (`log::warn!`) and counted in `EngineStats`, never propagated as
//! an `Err`, because a collision is a diagnostic about match quality, not a
//! reason to abort a run.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dictionary {path} produced no usable patterns")]
    EmptyDictionary { path: PathBuf },

    #[error("unknown algorithm {name:?}; known algorithms: {known}")]
    UnknownAlgo { name: String, known: String },

    #[error("{flag} is required")]
    MissingFlag { flag: &'static str },

    #[error("{flag} may be given at most once")]
    DuplicateFlag { flag: &'static str },

    #[error("engine contract violated: {0}")]
    ContractViolation(&'static str),
}

pub type Result<T> = std::result::Result<T, HarnessError>;
