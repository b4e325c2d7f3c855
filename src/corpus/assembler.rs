use anyhow::Result;
use log::debug;
use std::path::{Path, PathBuf};

use crate::errors::InputError;
use crate::file_utils::FileManager;

use super::AssemblyPlan;

// @module: Concatenation of corpus pairs into one training stream

/// Combined source and target files of one run
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedStream {
    pub source_path: PathBuf,
    pub target_path: PathBuf,
    /// Line count of each combined file
    pub line_count: usize,
}

// @struct: Writes the combined source and target files
pub struct CorpusAssembler;

impl CorpusAssembler {
    /// Concatenate the plan's sources into `source_output` and its targets
    /// into `target_output`, primary pairs first, then augmentation pairs.
    ///
    /// Both outputs must end up with exactly `plan.total_lines()` lines; a
    /// file that changed since validation is reported as an error.
    pub fn assemble(plan: &AssemblyPlan, source_output: &Path, target_output: &Path) -> Result<CombinedStream> {
        let expected = plan.total_lines();

        let source_lines = FileManager::concatenate_files(&plan.source_paths(), source_output)?;
        let target_lines = FileManager::concatenate_files(&plan.target_paths(), target_output)?;

        if source_lines != expected || target_lines != expected {
            return Err(InputError::ChangedSinceValidation {
                expected,
                source_lines,
                target_lines,
            }.into());
        }

        debug!("Combined stream: {} lines ({} from corpus pairs)", expected, plan.primary_lines());

        Ok(CombinedStream {
            source_path: source_output.to_path_buf(),
            target_path: target_output.to_path_buf(),
            line_count: expected,
        })
    }
}
