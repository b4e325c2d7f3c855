/*!
 * # talpsplit - word alignment over multiple parallel corpora
 *
 * A Rust library for aligning several parallel corpora in a single
 * fast_align run and splitting the result back per corpus.
 *
 * ## Features
 *
 * - Validate that every source/target pair has matching line counts
 * - Concatenate any number of corpus pairs, plus an optional augmentation
 *   corpus used for training only
 * - Convert the combined corpus to the `source ||| target` training format
 * - Run fast_align in both directions and symmetrize with atools
 * - Split the forward, reverse and symmetrized alignments into one file per
 *   corpus pair and direction
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `corpus`: Validation, assembly and training-format conversion
 * - `aligner`: External aligner interface and the fast_align implementation
 * - `splitter`: Per-pair redistribution of the alignment files
 * - `workspace`: Temporary directory for intermediate files
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod corpus;
pub mod aligner;
pub mod splitter;
pub mod workspace;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{AlignmentRequest, Controller, RunSummary};
pub use aligner::{Aligner, AlignmentDirection, AlignmentOutputs, SymmetrizationHeuristic};
pub use corpus::{AssemblyPlan, CorpusInputs, CorpusPair};
pub use splitter::{plan_slices, OutputSlice, ResultSplitter};
pub use errors::{AlignerError, ConfigError, ErrorCategory, FormatError, InputError, SplitError};
