/*!
 * Parallel corpus handling.
 *
 * This module turns the caller's path lists into a validated assembly plan
 * and builds the aligner's training input from it:
 * - `validator`: argument cardinality and per-pair line counts
 * - `assembler`: concatenation into one combined source and target file
 * - `format`: conversion of the combined files into training records
 */

use std::path::PathBuf;

pub mod assembler;
pub mod format;
pub mod validator;

pub use assembler::{CombinedStream, CorpusAssembler};
pub use format::{FormatConverter, FIELD_DELIMITER};
pub use validator::CorpusValidator;

/// Path lists describing the corpora of one run, as given by the caller
#[derive(Debug, Clone, Default)]
pub struct CorpusInputs {
    /// Source files of the pairs to align
    pub source_paths: Vec<PathBuf>,
    /// Target files, one per source file
    pub target_paths: Vec<PathBuf>,
    /// Output name of each pair
    pub output_names: Vec<String>,
    /// Source files of the augmentation corpus
    pub augmentation_sources: Vec<PathBuf>,
    /// Target files of the augmentation corpus
    pub augmentation_targets: Vec<PathBuf>,
}

/// A source/target file pair whose alignments are written out
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusPair {
    pub source_path: PathBuf,
    pub target_path: PathBuf,
    pub output_name: String,
    /// Line count shared by the source and target file
    pub line_count: usize,
}

/// A source/target file pair used for training only
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentationPair {
    pub source_path: PathBuf,
    pub target_path: PathBuf,
    pub line_count: usize,
}

/// Validated, ordered description of the combined training stream.
///
/// Primary pairs come first in declared order, then augmentation pairs in
/// declared order. The plan is read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyPlan {
    primary: Vec<CorpusPair>,
    augmentation: Vec<AugmentationPair>,
}

impl AssemblyPlan {
    pub fn new(primary: Vec<CorpusPair>, augmentation: Vec<AugmentationPair>) -> Self {
        Self { primary, augmentation }
    }

    pub fn primary(&self) -> &[CorpusPair] {
        &self.primary
    }

    pub fn augmentation(&self) -> &[AugmentationPair] {
        &self.augmentation
    }

    /// Source files in concatenation order
    pub fn source_paths(&self) -> Vec<PathBuf> {
        self.primary
            .iter()
            .map(|p| p.source_path.clone())
            .chain(self.augmentation.iter().map(|p| p.source_path.clone()))
            .collect()
    }

    /// Target files in concatenation order
    pub fn target_paths(&self) -> Vec<PathBuf> {
        self.primary
            .iter()
            .map(|p| p.target_path.clone())
            .chain(self.augmentation.iter().map(|p| p.target_path.clone()))
            .collect()
    }

    /// Lines contributed by the primary pairs
    pub fn primary_lines(&self) -> usize {
        self.primary.iter().map(|p| p.line_count).sum()
    }

    /// Lines of the whole combined stream
    pub fn total_lines(&self) -> usize {
        self.primary_lines() + self.augmentation.iter().map(|p| p.line_count).sum::<usize>()
    }
}
