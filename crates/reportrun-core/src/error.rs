//! Error types for the run pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for run pipeline operations.
pub type RunResult<T> = Result<T, RunError>;

/// Errors that can occur while orchestrating a run.
///
/// Generator exit statuses are not errors; they are classified outcomes
/// (see [`crate::outcome`]). The variants here cover the orchestrator's
/// own failure modes.
#[derive(Debug, Error)]
pub enum RunError {
    /// The generator process could not be started at all.
    #[error("Failed to launch generator '{program}': {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Copying a dated artifact to its latest path failed.
    #[error("Failed to promote {src} to {dest}: {source}")]
    Promotion {
        src: PathBuf,
        dest: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The run log could not be opened or appended to. This is the only
    /// fatal condition: it breaks the audit guarantee.
    #[error("Failed to append to run log {path}: {source}")]
    AuditLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Another run holds the lock file for this output directory.
    #[error("Another run is in progress (lock held at {path})")]
    LockHeld { path: PathBuf },

    /// The lock file could not be created or opened.
    #[error("Failed to open lock file {path}: {source}")]
    LockIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RunError {
    /// Creates a new spawn failure error.
    pub fn spawn_failed(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::SpawnFailed {
            program: program.into(),
            source,
        }
    }

    /// Creates a new promotion error.
    pub fn promotion(src: impl Into<PathBuf>, dest: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Promotion {
            src: src.into(),
            dest: dest.into(),
            source,
        }
    }

    /// Creates a new audit log error.
    pub fn audit_log(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::AuditLog {
            path: path.into(),
            source,
        }
    }
}
