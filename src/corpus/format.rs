use anyhow::Result;
use log::debug;
use std::path::Path;

use crate::errors::FormatError;
use crate::file_utils::FileManager;

/// Separator between the source and target sentence of a training record
pub const FIELD_DELIMITER: &str = " ||| ";

// @struct: Converts combined corpora to the aligner's training format
pub struct FormatConverter;

impl FormatConverter {
    /// Build one training record from a sentence pair
    pub fn record(source: &str, target: &str) -> String {
        format!("{}{}{}", source.trim(), FIELD_DELIMITER, target.trim())
    }

    /// Merge the combined source and target files into the training file.
    ///
    /// The two files must have the same number of lines. Returns the number
    /// of records written.
    pub fn convert(source_path: &Path, target_path: &Path, output_path: &Path) -> Result<usize> {
        let sources = FileManager::read_lines(source_path)?;
        let targets = FileManager::read_lines(target_path)?;

        if sources.len() != targets.len() {
            return Err(FormatError::LineCountMismatch {
                source_lines: sources.len(),
                target_lines: targets.len(),
            }.into());
        }

        let records: Vec<String> = sources
            .iter()
            .zip(&targets)
            .map(|(source, target)| Self::record(source, target))
            .collect();
        FileManager::write_lines(output_path, &records)?;

        debug!("Wrote {} training records to {:?}", records.len(), output_path);
        Ok(records.len())
    }
}
