/*!
 * External word aligner integration.
 *
 * The aligner is an opaque collaborator: it reads a training file in the
 * `source ||| target` format and writes three directional alignment files
 * with one line per training record. This module contains:
 * - `Aligner`: the collaborator interface
 * - `AlignmentInvoker`: runs an aligner and checks its outputs
 * - `fast_align`: the fast_align/atools implementation
 * - `mock`: a deterministic aligner for tests and benchmarks
 */

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::path::{Path, PathBuf};

use crate::errors::AlignerError;
use crate::file_utils::FileManager;

pub mod fast_align;
pub mod mock;

/// One of the three outputs of a symmetrized aligner run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlignmentDirection {
    /// Source-to-target model
    Forward,
    /// Target-to-source model
    Reverse,
    /// Combination of both models
    Symmetrized,
}

impl AlignmentDirection {
    /// All directions, in the order their outputs are produced
    pub const ALL: [AlignmentDirection; 3] = [Self::Forward, Self::Reverse, Self::Symmetrized];

    /// File name of this direction's alignment file.
    ///
    /// The symmetrized file is named after the heuristic that produced it.
    pub fn file_name(&self, heuristic: SymmetrizationHeuristic) -> String {
        match self {
            Self::Forward => "forward.talp".to_string(),
            Self::Reverse => "reverse.talp".to_string(),
            Self::Symmetrized => format!("{}.talp", heuristic.file_stem()),
        }
    }
}

impl fmt::Display for AlignmentDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Forward => "forward",
            Self::Reverse => "reverse",
            Self::Symmetrized => "symmetrized",
        };
        write!(f, "{}", name)
    }
}

/// Heuristic used by `atools -c` to combine forward and reverse alignments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SymmetrizationHeuristic {
    #[default]
    #[serde(rename = "grow-diag-final-and")]
    GrowDiagFinalAnd,
    #[serde(rename = "grow-diag-final")]
    GrowDiagFinal,
    #[serde(rename = "grow-diag")]
    GrowDiag,
    #[serde(rename = "intersect")]
    Intersect,
    #[serde(rename = "union")]
    Union,
}

impl SymmetrizationHeuristic {
    // @returns: Name understood by atools -c
    pub fn atools_name(&self) -> &'static str {
        match self {
            Self::GrowDiagFinalAnd => "grow-diag-final-and",
            Self::GrowDiagFinal => "grow-diag-final",
            Self::GrowDiag => "grow-diag",
            Self::Intersect => "intersect",
            Self::Union => "union",
        }
    }

    // @returns: Stem of the symmetrized alignment file name
    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::GrowDiagFinalAnd => "grow_diag_final-and",
            Self::GrowDiagFinal => "grow_diag_final",
            Self::GrowDiag => "grow_diag",
            Self::Intersect => "intersect",
            Self::Union => "union",
        }
    }
}

impl fmt::Display for SymmetrizationHeuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.atools_name())
    }
}

/// Paths of the three directional alignment files of one run
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentOutputs {
    pub forward: PathBuf,
    pub reverse: PathBuf,
    pub symmetrized: PathBuf,
    /// Heuristic the symmetrized file was produced with
    pub heuristic: SymmetrizationHeuristic,
}

impl AlignmentOutputs {
    /// Conventional output locations inside `dir`
    pub fn in_dir(dir: &Path, heuristic: SymmetrizationHeuristic) -> Self {
        Self {
            forward: dir.join(AlignmentDirection::Forward.file_name(heuristic)),
            reverse: dir.join(AlignmentDirection::Reverse.file_name(heuristic)),
            symmetrized: dir.join(AlignmentDirection::Symmetrized.file_name(heuristic)),
            heuristic,
        }
    }

    /// Path of the alignment file for a direction
    pub fn path(&self, direction: AlignmentDirection) -> &Path {
        match direction {
            AlignmentDirection::Forward => &self.forward,
            AlignmentDirection::Reverse => &self.reverse,
            AlignmentDirection::Symmetrized => &self.symmetrized,
        }
    }

    /// File name used for a direction's per-pair outputs
    pub fn file_name(&self, direction: AlignmentDirection) -> String {
        direction.file_name(self.heuristic)
    }
}

/// Word aligner collaborator
///
/// Implementations train on `training_file` and write the forward, reverse
/// and symmetrized alignments into `output_dir`, one line per training record.
#[async_trait]
pub trait Aligner: Send + Sync + Debug {
    /// Align the training file and return where the three outputs were written
    async fn align(
        &self,
        training_file: &Path,
        output_dir: &Path,
        heuristic: SymmetrizationHeuristic,
    ) -> Result<AlignmentOutputs, AlignerError>;
}

/// Runs an aligner and checks that its outputs cover the whole training file
#[derive(Debug)]
pub struct AlignmentInvoker {
    aligner: Box<dyn Aligner>,
    heuristic: SymmetrizationHeuristic,
}

impl AlignmentInvoker {
    pub fn new(aligner: Box<dyn Aligner>, heuristic: SymmetrizationHeuristic) -> Self {
        Self { aligner, heuristic }
    }

    pub fn heuristic(&self) -> SymmetrizationHeuristic {
        self.heuristic
    }

    /// Align `training_file`, which holds `expected_lines` records.
    ///
    /// Fails unless all three directional files exist with exactly
    /// `expected_lines` lines each.
    pub async fn invoke(&self, training_file: &Path, output_dir: &Path, expected_lines: usize) -> Result<AlignmentOutputs> {
        let outputs = self.aligner.align(training_file, output_dir, self.heuristic).await?;

        for direction in AlignmentDirection::ALL {
            let path = outputs.path(direction);
            if !FileManager::file_exists(path) {
                return Err(AlignerError::MissingOutput {
                    direction,
                    path: path.to_path_buf(),
                }.into());
            }

            let actual = FileManager::count_lines(path).map_err(|e| AlignerError::UnreadableOutput {
                direction,
                path: path.to_path_buf(),
                message: format!("{:#}", e),
            })?;
            if actual != expected_lines {
                return Err(AlignerError::LineCountMismatch {
                    direction,
                    expected: expected_lines,
                    actual,
                }.into());
            }
            debug!("{} alignments: {:?} ({} lines)", direction, path, actual);
        }

        Ok(outputs)
    }
}
