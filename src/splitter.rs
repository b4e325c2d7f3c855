/*!
 * Redistribution of the combined alignment files.
 *
 * Line *i* of each combined alignment file belongs to line *i* of the
 * combined corpus. The primary pairs occupy the prefix of that corpus in
 * declared order, so each pair's alignments are the block of `line_count`
 * lines that starts right after the lines of all earlier pairs. Augmentation
 * data follows the primary prefix and is never written out.
 */

use anyhow::Result;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::aligner::{AlignmentDirection, AlignmentOutputs};
use crate::corpus::CorpusPair;
use crate::errors::SplitError;
use crate::file_utils::FileManager;

// @const: One alignment line, a whitespace separated list of i-j links
static ALIGNMENT_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+-\d+(\s+\d+-\d+)*)?\s*$").unwrap()
});

/// Block of a combined alignment file that belongs to one corpus pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSlice {
    pub output_name: String,
    pub direction: AlignmentDirection,
    /// 1-based first line in the combined file
    pub start_line: usize,
    pub line_count: usize,
}

impl OutputSlice {
    /// 0-based index range into the combined file's lines
    pub fn range(&self) -> Range<usize> {
        let start = self.start_line - 1;
        start..start + self.line_count
    }
}

/// Compute the slices of one direction from the pairs' line counts.
///
/// Slice *k* starts right after the cumulative line count of pairs
/// `0..k`, so slices are contiguous and cover the primary prefix exactly.
pub fn plan_slices(pairs: &[CorpusPair], direction: AlignmentDirection) -> Vec<OutputSlice> {
    pairs
        .iter()
        .scan(1, |start_line, pair| {
            let slice = OutputSlice {
                output_name: pair.output_name.clone(),
                direction,
                start_line: *start_line,
                line_count: pair.line_count,
            };
            *start_line += pair.line_count;
            Some(slice)
        })
        .collect()
}

/// Check whether a line follows the `i-j` alignment grammar
pub fn is_alignment_line(line: &str) -> bool {
    ALIGNMENT_LINE_REGEX.is_match(line)
}

// @struct: Writes per-pair alignment files into the output directory
pub struct ResultSplitter {
    output_dir: PathBuf,
}

impl ResultSplitter {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// Split all three directions for every pair.
    ///
    /// Returns the written files, direction by direction, pairs in declared
    /// order within each direction.
    pub fn split(&self, pairs: &[CorpusPair], outputs: &AlignmentOutputs) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(pairs.len() * AlignmentDirection::ALL.len());

        for direction in AlignmentDirection::ALL {
            let lines = FileManager::read_lines(outputs.path(direction))?;
            let slices = plan_slices(pairs, direction);
            written.extend(self.split_direction(&lines, &slices, &outputs.file_name(direction))?);
        }

        info!("Wrote {} alignment files to {:?}", written.len(), self.output_dir);
        Ok(written)
    }

    /// Write the given slices of one direction's combined alignment lines.
    pub fn split_direction(&self, lines: &[String], slices: &[OutputSlice], file_name: &str) -> Result<Vec<PathBuf>> {
        let Some(direction) = slices.first().map(|s| s.direction) else {
            return Ok(Vec::new());
        };

        let required = slices.last().map_or(0, |s| s.range().end);
        if lines.len() < required {
            return Err(SplitError::ShortAlignmentFile {
                direction,
                required,
                available: lines.len(),
            }.into());
        }

        let malformed = lines[..required].iter().filter(|l| !is_alignment_line(l)).count();
        if malformed > 0 {
            warn!("{} of {} {} alignment lines are not i-j link lists", malformed, required, direction);
        }

        let mut written = Vec::with_capacity(slices.len());
        for slice in slices {
            let path = FileManager::generate_output_path(&self.output_dir, &slice.output_name, file_name);
            FileManager::write_lines(&path, &lines[slice.range()])?;
            debug!(
                "{:?}: lines {}..{} of {} alignments",
                path, slice.start_line, slice.start_line + slice.line_count, direction
            );
            written.push(path);
        }

        Ok(written)
    }
}
