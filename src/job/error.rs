//! Error types for job state management.
//!
//! Every variant carries the path it concerns so the top-level report tells
//! the user which part of the job directory was involved.

use std::path::PathBuf;

use thiserror::Error;

use crate::lexicon::LexiconError;

/// Errors that can occur while starting or resuming a job.
#[derive(Debug, Error)]
pub enum JobError {
    /// Missing or invalid fresh-run arguments.
    #[error("invalid arguments: {reason}")]
    Validation {
        /// What was wrong with the supplied arguments.
        reason: String,
    },

    /// Fresh-run parameters were supplied together with resume.
    #[error(
        "--resume cannot be combined with {}\n  Suggestion: resume takes its parameters from the job directory; pass only --resume and --directory",
        .flags.join(", ")
    )]
    ConflictingArguments {
        /// The fresh-run flags that were supplied.
        flags: Vec<&'static str>,
    },

    /// The job directory (or its parent) could not be created.
    #[error("failed to create job directory {path}: {source}")]
    DirectoryCreation {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file could not be copied into the job directory.
    #[error("failed to snapshot configuration {from} into {to}: {source}")]
    ConfigSnapshot {
        /// Original configuration path.
        from: PathBuf,
        /// Snapshot destination.
        to: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The run arguments record could not be written or read back.
    #[error("failed to persist run arguments at {path}: {source}")]
    ArgumentPersistence {
        /// Path of the arguments record.
        path: PathBuf,
        /// What went wrong.
        #[source]
        source: PersistError,
    },

    /// A pipeline stage directory already exists or could not be created.
    #[error("failed to create stage directory {path}: {source}")]
    StageDirectory {
        /// The stage directory.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The job directory lacks the state needed to resume.
    #[error(
        "cannot resume: {path} does not exist\n  Suggestion: --directory must point at a job directory created by an earlier run"
    )]
    ResumeStateMissing {
        /// The missing file.
        path: PathBuf,
    },

    /// The configuration snapshot could not be read or decoded.
    #[error(transparent)]
    ConfigLoad(#[from] LexiconError),
}

/// Underlying failure of the arguments record.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The persisted configuration reference is not a bare file name.
    #[error("configuration reference '{0}' is not a file name")]
    InvalidConfigName(String),
}

impl JobError {
    /// Creates a validation error.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Creates an argument persistence error.
    pub fn persistence(path: impl Into<PathBuf>, source: impl Into<PersistError>) -> Self {
        Self::ArgumentPersistence {
            path: path.into(),
            source: source.into(),
        }
    }
}
