//! Error types for trace ingestion and reconstruction
//!
//! Per-line problems (unrecognized or partially malformed lines) are never
//! errors: they are dropped or degrade to missing fields. Only the conditions
//! below stop a run.

use std::path::PathBuf;
use thiserror::Error;

use crate::event::Tick;

/// Errors that abort a trace analysis run
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Trace file not found: {}", path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration in {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid tick range: xmax ({xmax}) is before xmin ({xmin})")]
    InvalidBounds { xmin: Tick, xmax: Tick },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TraceError {
    /// Wrap an IO error raised while opening `path`, mapping not-found to
    /// [`TraceError::InputNotFound`]
    pub fn from_open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            TraceError::InputNotFound {
                path: path.into(),
                source,
            }
        } else {
            TraceError::Io(source)
        }
    }
}

/// Result type for trace operations
pub type Result<T> = std::result::Result<T, TraceError>;
