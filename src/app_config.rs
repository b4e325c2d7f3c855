use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::PathBuf;

use crate::aligner::SymmetrizationHeuristic;
use crate::errors::ConfigError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// External aligner settings
    #[serde(default)]
    pub aligner: AlignerConfig,

    /// Temporary workspace settings
    #[serde(default)]
    pub workspace: WorkspaceConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// fast_align and atools settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AlignerConfig {
    // @field: Directory holding the fast_align and atools binaries
    #[serde(default = "default_fast_align_dir")]
    pub fast_align_dir: String,

    // @field: fast_align binary name inside fast_align_dir
    #[serde(default = "default_fast_align_binary")]
    pub fast_align_binary: String,

    // @field: atools binary name inside fast_align_dir
    #[serde(default = "default_atools_binary")]
    pub atools_binary: String,

    // @field: Heuristic used to combine the forward and reverse alignments
    #[serde(default)]
    pub heuristic: SymmetrizationHeuristic,

    // @field: Favor alignment points close to the diagonal (-d)
    #[serde(default = "default_true")]
    pub favor_diagonal: bool,

    // @field: Optimize the diagonal tension parameter (-o)
    #[serde(default = "default_true")]
    pub optimize_tension: bool,

    // @field: Use variational Bayes for the translation table (-v)
    #[serde(default = "default_true")]
    pub variational_bayes: bool,

    // @field: Number of EM iterations (-I), fast_align default when unset
    #[serde(default)]
    pub iterations: Option<u32>,
}

impl AlignerConfig {
    /// Full path of the fast_align binary
    pub fn fast_align_path(&self) -> PathBuf {
        PathBuf::from(&self.fast_align_dir).join(&self.fast_align_binary)
    }

    /// Full path of the atools binary
    pub fn atools_path(&self) -> PathBuf {
        PathBuf::from(&self.fast_align_dir).join(&self.atools_binary)
    }
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            fast_align_dir: default_fast_align_dir(),
            fast_align_binary: default_fast_align_binary(),
            atools_binary: default_atools_binary(),
            heuristic: SymmetrizationHeuristic::default(),
            favor_diagonal: true,
            optimize_tension: true,
            variational_bayes: true,
            iterations: None,
        }
    }
}

/// Temporary workspace settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WorkspaceConfig {
    /// Explicit workspace directory; a fresh one under the output directory when unset
    #[serde(default)]
    pub tmp_dir: Option<PathBuf>,

    /// Whether to delete the workspace when the run ends
    #[serde(default = "default_true")]
    pub remove_tmp_dir: bool,

    /// Prefix of generated workspace directory names
    #[serde(default = "default_dir_prefix")]
    pub dir_prefix: String,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            tmp_dir: None,
            remove_tmp_dir: true,
            dir_prefix: default_dir_prefix(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching log crate filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_fast_align_dir() -> String {
    "fast_align/fast_align/build".to_string()
}

fn default_fast_align_binary() -> String {
    "fast_align".to_string()
}

fn default_atools_binary() -> String {
    "atools".to_string()
}

fn default_dir_prefix() -> String {
    "tmp_dir_fastalign_".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.aligner.fast_align_dir.trim().is_empty() {
            return Err(ConfigError::Invalid("fast_align_dir must not be empty".to_string()).into());
        }

        if self.aligner.fast_align_binary.trim().is_empty() || self.aligner.atools_binary.trim().is_empty() {
            return Err(ConfigError::Invalid("aligner binary names must not be empty".to_string()).into());
        }

        if self.aligner.iterations == Some(0) {
            return Err(ConfigError::Invalid("iterations must be at least 1".to_string()).into());
        }

        if self.workspace.tmp_dir.is_none() && self.workspace.dir_prefix.contains(std::path::MAIN_SEPARATOR) {
            return Err(ConfigError::Invalid(format!(
                "workspace prefix must be a plain directory name: {}",
                self.workspace.dir_prefix
            )).into());
        }

        Ok(())
    }
}
