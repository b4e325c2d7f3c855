/*!
 * Scoped temporary directory for the intermediate artifacts of a run.
 *
 * All intermediate files live inside one directory that is removed as a
 * unit when the workspace is closed or dropped, if removal was requested.
 * Removal failures are ignored: the outputs are already written by then.
 */

use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{Builder, TempDir};
use uuid::Uuid;

use crate::file_utils::FileManager;

/// Combined source corpus
pub const SOURCE_SENTENCES: &str = "source_sentences.txt";
/// Combined target corpus
pub const TARGET_SENTENCES: &str = "target_sentences.txt";
/// Aligner training file
pub const TRAINING_FILE: &str = "dataset.fast_align";

// @enum: Who owns the directory's lifetime
#[derive(Debug)]
enum Location {
    /// Generated directory, removed with the `TempDir`
    Temporary(TempDir),
    /// Caller-provided or kept directory
    Directory { remove: bool },
}

/// Temporary directory guard
#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
    location: Option<Location>,
}

impl Workspace {
    /// Create the workspace directory.
    ///
    /// Uses `explicit_dir` when given, otherwise a fresh
    /// `{prefix}{uuid}` directory under `parent_dir`.
    pub fn create(parent_dir: &Path, explicit_dir: Option<&Path>, prefix: &str, remove_on_close: bool) -> Result<Self> {
        let (path, location) = match explicit_dir {
            Some(dir) => {
                FileManager::ensure_dir(dir)?;
                (dir.to_path_buf(), Location::Directory { remove: remove_on_close })
            }
            None => {
                let name = format!("{}{}", prefix, Uuid::new_v4().simple());
                let temp_dir = Builder::new()
                    .prefix(&name)
                    .rand_bytes(0)
                    .tempdir_in(parent_dir)
                    .with_context(|| format!("Failed to create workspace {:?} in {:?}", name, parent_dir))?;

                if remove_on_close {
                    (temp_dir.path().to_path_buf(), Location::Temporary(temp_dir))
                } else {
                    (temp_dir.keep(), Location::Directory { remove: false })
                }
            }
        };

        debug!("Workspace: {:?}", path);
        Ok(Self { path, location: Some(location) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source_sentences(&self) -> PathBuf {
        self.path.join(SOURCE_SENTENCES)
    }

    pub fn target_sentences(&self) -> PathBuf {
        self.path.join(TARGET_SENTENCES)
    }

    pub fn training_file(&self) -> PathBuf {
        self.path.join(TRAINING_FILE)
    }

    /// Tear the workspace down now
    pub fn close(mut self) {
        self.teardown();
    }

    // Removal errors are logged and ignored
    fn teardown(&mut self) {
        let result = match self.location.take() {
            Some(Location::Temporary(temp_dir)) => temp_dir.close(),
            Some(Location::Directory { remove: true }) => fs::remove_dir_all(&self.path),
            Some(Location::Directory { remove: false }) => {
                debug!("Keeping workspace {:?}", self.path);
                return;
            }
            None => return,
        };

        match result {
            Ok(()) => debug!("Removed workspace {:?}", self.path),
            Err(e) => debug!("Could not remove workspace {:?}: {}", self.path, e),
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        self.teardown();
    }
}
