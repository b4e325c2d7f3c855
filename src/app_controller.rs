use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::aligner::fast_align::FastAlign;
use crate::aligner::{Aligner, AlignmentInvoker};
use crate::app_config::Config;
use crate::corpus::{CorpusAssembler, CorpusInputs, CorpusValidator, FormatConverter};
use crate::file_utils::FileManager;
use crate::splitter::ResultSplitter;
use crate::workspace::Workspace;

// @module: Application controller for alignment runs

/// Inputs of one alignment run
#[derive(Debug, Clone)]
pub struct AlignmentRequest {
    /// Corpus pairs and augmentation corpus
    pub corpus: CorpusInputs,
    /// Directory receiving the per-pair alignment files
    pub output_dir: PathBuf,
}

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Alignment files written, one per pair and direction
    pub written_files: Vec<PathBuf>,
    /// Lines of the corpus pairs
    pub primary_lines: usize,
    /// Lines of the combined training stream, augmentation included
    pub combined_lines: usize,
    pub elapsed: Duration,
}

/// Main application controller for alignment runs
#[derive(Debug)]
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Aligner wrapped with output checks
    invoker: AlignmentInvoker,
    // @field: Show a spinner while the aligner runs
    show_progress: bool,
}

impl Controller {
    // @method: Create a controller running fast_align as configured
    pub fn with_config(config: Config) -> Result<Self> {
        let aligner = FastAlign::new(config.aligner.clone());
        Self::with_aligner(config, Box::new(aligner))
    }

    // @method: Create a controller around any aligner implementation
    pub fn with_aligner(config: Config, aligner: Box<dyn Aligner>) -> Result<Self> {
        config.validate()?;
        let invoker = AlignmentInvoker::new(aligner, config.aligner.heuristic);

        Ok(Self {
            config,
            invoker,
            show_progress: true,
        })
    }

    /// Enable or disable the progress spinner
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the whole pipeline for one request.
    ///
    /// Stages run strictly in order and the first failure aborts the run.
    /// Nothing is written to the output directory before the aligner has
    /// succeeded.
    pub async fn run(&self, request: &AlignmentRequest) -> Result<RunSummary> {
        let start_time = Instant::now();

        let plan = CorpusValidator::validate(&request.corpus)?;
        info!(
            "Validated {} corpus pair(s) and {} augmentation pair(s)",
            plan.primary().len(),
            plan.augmentation().len()
        );

        FileManager::ensure_dir(&request.output_dir)?;

        let workspace = Workspace::create(
            &request.output_dir,
            self.config.workspace.tmp_dir.as_deref(),
            &self.config.workspace.dir_prefix,
            self.config.workspace.remove_tmp_dir,
        )?;

        let combined = CorpusAssembler::assemble(&plan, &workspace.source_sentences(), &workspace.target_sentences())?;

        info!("Data 2 fast align format...");
        let training_file = workspace.training_file();
        let records = FormatConverter::convert(&combined.source_path, &combined.target_path, &training_file)?;

        info!("Running aligner on {} sentence pairs...", records);
        let spinner = self.spinner();
        let outputs = self.invoker.invoke(&training_file, workspace.path(), records).await;
        spinner.finish_and_clear();
        let outputs = outputs?;

        info!("Retrieving alignments...");
        let written_files = ResultSplitter::new(&request.output_dir).split(plan.primary(), &outputs)?;

        workspace.close();

        let summary = RunSummary {
            written_files,
            primary_lines: plan.primary_lines(),
            combined_lines: combined.line_count,
            elapsed: start_time.elapsed(),
        };
        debug!("{:?}", summary);
        info!(
            "Alignment completed in {}: {} files, {} of {} lines",
            Self::format_duration(summary.elapsed),
            summary.written_files.len(),
            summary.primary_lines,
            summary.combined_lines
        );

        Ok(summary)
    }

    fn spinner(&self) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(format!("Aligning with {} symmetrization", self.invoker.heuristic()));
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner
    }

    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
