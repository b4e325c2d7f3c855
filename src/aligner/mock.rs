/*!
 * Mock aligner implementation for testing.
 *
 * Produces deterministic alignment files without any external binary:
 * - `MockAligner::working()` - writes one line per training record
 * - `MockAligner::failing()` - fails like a crashed process
 * - `MockAligner::new(MockBehavior::MissingOutput(..))` - skips one direction
 * - `MockAligner::new(MockBehavior::Truncated(..))` - drops the last line of one direction
 * - `MockAligner::new(MockBehavior::Garbled(..))` - writes bytes that are not UTF-8 for one direction
 */

use async_trait::async_trait;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::AlignerError;
use crate::file_utils::FileManager;

use super::{Aligner, AlignmentDirection, AlignmentOutputs, SymmetrizationHeuristic};

/// Behavior mode for the mock aligner
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Writes all three directions
    Working,
    /// Fails with a non-zero exit status
    Failing,
    /// Does not write the given direction
    MissingOutput(AlignmentDirection),
    /// Writes the given direction one line short
    Truncated(AlignmentDirection),
    /// Writes invalid UTF-8 for the given direction
    Garbled(AlignmentDirection),
}

/// Mock aligner for testing the pipeline around the external tool
#[derive(Debug)]
pub struct MockAligner {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of align calls
    call_count: Arc<AtomicUsize>,
}

impl MockAligner {
    /// Create a new mock aligner with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a working mock aligner
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock aligner that always fails
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Shared handle on the call counter, usable after the aligner is boxed
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.call_count)
    }

    /// Alignment line the mock writes for a training record.
    ///
    /// `index` is the 0-based record number. Records are linked token by
    /// token up to the shorter side, and the direction is encoded in the
    /// offset so that the three files differ.
    pub fn alignment_line(direction: AlignmentDirection, index: usize, record: &str) -> String {
        let (source, target) = record.split_once(" ||| ").unwrap_or((record, ""));
        let links = source.split_whitespace().count().min(target.split_whitespace().count());
        let offset = match direction {
            AlignmentDirection::Forward => 0,
            AlignmentDirection::Reverse => 1,
            AlignmentDirection::Symmetrized => 2,
        };

        let mut pairs: Vec<String> = (0..links).map(|i| format!("{}-{}", i, i)).collect();
        pairs.push(format!("{}-{}", index, index + offset));
        pairs.join(" ")
    }
}

#[async_trait]
impl Aligner for MockAligner {
    async fn align(
        &self,
        training_file: &Path,
        output_dir: &Path,
        heuristic: SymmetrizationHeuristic,
    ) -> Result<AlignmentOutputs, AlignerError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if self.behavior == MockBehavior::Failing {
            return Err(AlignerError::ProcessFailed {
                program: "mock_align".to_string(),
                status: Some(1),
                stderr: "simulated failure".to_string(),
            });
        }

        let records = FileManager::read_lines(training_file).map_err(|e| AlignerError::Spawn {
            program: "mock_align".to_string(),
            message: e.to_string(),
        })?;
        let outputs = AlignmentOutputs::in_dir(output_dir, heuristic);

        for direction in AlignmentDirection::ALL {
            if self.behavior == MockBehavior::MissingOutput(direction) {
                continue;
            }

            if self.behavior == MockBehavior::Garbled(direction) {
                fs::write(outputs.path(direction), [0x30, 0x2d, 0xff, 0xfe, b'\n']).map_err(|e| AlignerError::Spawn {
                    program: "mock_align".to_string(),
                    message: e.to_string(),
                })?;
                continue;
            }

            let mut lines: Vec<String> = records
                .iter()
                .enumerate()
                .map(|(index, record)| Self::alignment_line(direction, index, record))
                .collect();
            if self.behavior == MockBehavior::Truncated(direction) {
                lines.pop();
            }

            FileManager::write_lines(outputs.path(direction), &lines).map_err(|e| AlignerError::Spawn {
                program: "mock_align".to_string(),
                message: e.to_string(),
            })?;
        }

        Ok(outputs)
    }
}
