use anyhow::Result;
use log::{debug, warn};
use std::collections::HashSet;
use std::path::Path;

use crate::errors::{ConfigError, InputError};
use crate::file_utils::FileManager;

use super::{AssemblyPlan, AugmentationPair, CorpusInputs, CorpusPair};

// @module: Input validation for corpus pairs

// @struct: Validates corpus inputs and builds the assembly plan
pub struct CorpusValidator;

impl CorpusValidator {
    /// Check list cardinalities without touching the filesystem.
    pub fn check_arguments(inputs: &CorpusInputs) -> Result<(), ConfigError> {
        let sources = inputs.source_paths.len();
        let targets = inputs.target_paths.len();
        let names = inputs.output_names.len();

        if sources != targets || sources != names {
            return Err(ConfigError::ArgumentCountMismatch {
                source_paths: sources,
                target_paths: targets,
                output_names: names,
            });
        }

        if sources == 0 {
            return Err(ConfigError::NoInputPairs);
        }

        if inputs.augmentation_sources.len() != inputs.augmentation_targets.len() {
            return Err(ConfigError::AugmentationCountMismatch {
                sources: inputs.augmentation_sources.len(),
                targets: inputs.augmentation_targets.len(),
            });
        }

        let mut seen = HashSet::new();
        for name in &inputs.output_names {
            if !seen.insert(name.as_str()) {
                warn!("Output name '{}' is used more than once, later pairs overwrite earlier outputs", name);
            }
        }

        Ok(())
    }

    /// Validate every pair and build the assembly plan.
    ///
    /// Argument cardinality is checked before any file is read. Each pair,
    /// augmentation pairs included, must have equal source and target line
    /// counts.
    pub fn validate(inputs: &CorpusInputs) -> Result<AssemblyPlan> {
        Self::check_arguments(inputs)?;

        let mut primary = Vec::with_capacity(inputs.source_paths.len());
        for ((source_path, target_path), output_name) in inputs
            .source_paths
            .iter()
            .zip(&inputs.target_paths)
            .zip(&inputs.output_names)
        {
            let line_count = Self::paired_line_count(source_path, target_path)?;
            if line_count == 0 {
                warn!("Corpus pair {:?} / {:?} is empty", source_path, target_path);
            }
            primary.push(CorpusPair {
                source_path: source_path.clone(),
                target_path: target_path.clone(),
                output_name: output_name.clone(),
                line_count,
            });
        }

        let mut augmentation = Vec::with_capacity(inputs.augmentation_sources.len());
        for (source_path, target_path) in inputs
            .augmentation_sources
            .iter()
            .zip(&inputs.augmentation_targets)
        {
            let line_count = Self::paired_line_count(source_path, target_path)?;
            augmentation.push(AugmentationPair {
                source_path: source_path.clone(),
                target_path: target_path.clone(),
                line_count,
            });
        }

        Ok(AssemblyPlan::new(primary, augmentation))
    }

    // @returns: Shared line count of a source/target pair
    fn paired_line_count(source_path: &Path, target_path: &Path) -> Result<usize, InputError> {
        let source_lines = Self::count(source_path)?;
        let target_lines = Self::count(target_path)?;

        if source_lines != target_lines {
            return Err(InputError::LineCountMismatch {
                source_path: source_path.to_path_buf(),
                source_lines,
                target_path: target_path.to_path_buf(),
                target_lines,
            });
        }

        debug!("{:?} / {:?}: {} lines", source_path, target_path, source_lines);
        Ok(source_lines)
    }

    fn count(path: &Path) -> Result<usize, InputError> {
        FileManager::count_lines(path).map_err(|e| InputError::Unreadable {
            path: path.to_path_buf(),
            message: format!("{:#}", e),
        })
    }
}
