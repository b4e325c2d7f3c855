/*!
 * Error types for the talpsplit application.
 *
 * Each stage of the alignment run has its own error type, defined with the
 * thiserror crate. Application-level code propagates them through
 * `anyhow::Error`, and `ErrorCategory` recovers the class of a failure.
 */

use std::path::PathBuf;
use thiserror::Error;

use crate::aligner::AlignmentDirection;

/// Errors in the arguments or configuration of a run, detected before any I/O
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Source, target and output-name lists differ in length
    #[error("Number of source paths ({source_paths}), target paths ({target_paths}) and output names ({output_names}) should be the same")]
    ArgumentCountMismatch {
        source_paths: usize,
        target_paths: usize,
        output_names: usize,
    },

    /// No corpus pair was given
    #[error("At least one source/target pair is required")]
    NoInputPairs,

    /// Augmentation source and target lists differ in length
    #[error("Number of extra source paths ({sources}) and target paths ({targets}) should be the same")]
    AugmentationCountMismatch { sources: usize, targets: usize },

    /// A configuration value is unusable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors in the content of the input corpora
#[derive(Error, Debug)]
pub enum InputError {
    /// A source/target pair does not have the same number of lines
    #[error("Number of lines in {source_path:?}: {source_lines}. Number of lines in {target_path:?}: {target_lines}.")]
    LineCountMismatch {
        source_path: PathBuf,
        source_lines: usize,
        target_path: PathBuf,
        target_lines: usize,
    },

    /// A corpus file could not be read
    #[error("Failed to read corpus file {path:?}: {message}")]
    Unreadable { path: PathBuf, message: String },

    /// The corpus files no longer have the line counts they were validated with
    #[error("Corpus files changed after validation: expected {expected} lines, combined source has {source_lines}, combined target has {target_lines}")]
    ChangedSinceValidation {
        expected: usize,
        source_lines: usize,
        target_lines: usize,
    },
}

/// Errors while producing the aligner's training file
#[derive(Error, Debug)]
pub enum FormatError {
    /// The combined source and target files differ in length
    #[error("Combined source has {source_lines} lines but combined target has {target_lines}")]
    LineCountMismatch {
        source_lines: usize,
        target_lines: usize,
    },
}

/// Errors raised by or about the external aligner
#[derive(Error, Debug)]
pub enum AlignerError {
    /// The aligner process could not be started
    #[error("Failed to execute {program}: {message}")]
    Spawn { program: String, message: String },

    /// The aligner process exited unsuccessfully
    #[error("{program} exited with status {status:?}: {stderr}")]
    ProcessFailed {
        program: String,
        status: Option<i32>,
        stderr: String,
    },

    /// A directional alignment file was not produced
    #[error("Missing {direction} alignment file: {path:?}")]
    MissingOutput {
        direction: AlignmentDirection,
        path: PathBuf,
    },

    /// A directional alignment file exists but cannot be read as text
    #[error("Failed to read {direction} alignment file {path:?}: {message}")]
    UnreadableOutput {
        direction: AlignmentDirection,
        path: PathBuf,
        message: String,
    },

    /// A directional alignment file does not cover the whole training file
    #[error("The {direction} alignment file has {actual} lines, expected {expected}")]
    LineCountMismatch {
        direction: AlignmentDirection,
        expected: usize,
        actual: usize,
    },
}

/// Errors while slicing the combined alignment files
#[derive(Error, Debug)]
pub enum SplitError {
    /// The combined alignment file ends before the last primary slice
    #[error("The {direction} alignment file has {available} lines, but the corpus pairs need {required}")]
    ShortAlignmentFile {
        direction: AlignmentDirection,
        required: usize,
        available: usize,
    },
}

/// Class of a failed run, used to pick the process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Format,
    Aligner,
    Split,
    Other,
}

impl ErrorCategory {
    /// Classify an application error by the typed error it carries
    pub fn of(error: &anyhow::Error) -> Self {
        if error.downcast_ref::<ConfigError>().is_some() {
            Self::Configuration
        } else if error.downcast_ref::<InputError>().is_some() {
            Self::Input
        } else if error.downcast_ref::<FormatError>().is_some() {
            Self::Format
        } else if error.downcast_ref::<AlignerError>().is_some() {
            Self::Aligner
        } else if error.downcast_ref::<SplitError>().is_some() {
            Self::Split
        } else {
            Self::Other
        }
    }

    /// Process exit code for this class of failure
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration => 2,
            Self::Input => 3,
            Self::Format => 4,
            Self::Aligner => 5,
            Self::Split => 6,
            Self::Other => 1,
        }
    }
}
