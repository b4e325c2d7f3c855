/*!
 * fast_align backed aligner.
 *
 * Trains the forward and reverse models with `fast_align` and combines them
 * with `atools`. Each tool writes its alignments to stdout, which is
 * redirected into the directional files.
 */

use async_trait::async_trait;
use log::{debug, info};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::app_config::AlignerConfig;
use crate::errors::AlignerError;

use super::{Aligner, AlignmentOutputs, SymmetrizationHeuristic};

/// Aligner running the fast_align and atools binaries
#[derive(Debug, Clone)]
pub struct FastAlign {
    config: AlignerConfig,
}

impl FastAlign {
    pub fn new(config: AlignerConfig) -> Self {
        Self { config }
    }

    /// Arguments for one fast_align model
    pub fn model_args(&self, training_file: &Path, reverse: bool) -> Vec<String> {
        let mut args = vec!["-i".to_string(), training_file.to_string_lossy().to_string()];
        if self.config.favor_diagonal {
            args.push("-d".to_string());
        }
        if self.config.optimize_tension {
            args.push("-o".to_string());
        }
        if self.config.variational_bayes {
            args.push("-v".to_string());
        }
        if let Some(iterations) = self.config.iterations {
            args.push("-I".to_string());
            args.push(iterations.to_string());
        }
        if reverse {
            args.push("-r".to_string());
        }
        args
    }

    /// Arguments for combining the two models
    pub fn combine_args(forward: &Path, reverse: &Path, heuristic: SymmetrizationHeuristic) -> Vec<String> {
        vec![
            "-i".to_string(),
            forward.to_string_lossy().to_string(),
            "-j".to_string(),
            reverse.to_string_lossy().to_string(),
            "-c".to_string(),
            heuristic.atools_name().to_string(),
        ]
    }

    // @runs: Program with stdout redirected into output_path
    async fn run_to_file(program: &Path, args: &[String], output_path: &Path) -> Result<(), AlignerError> {
        let program_name = program.to_string_lossy().to_string();
        let output_file = File::create(output_path).map_err(|e| AlignerError::Spawn {
            program: program_name.clone(),
            message: format!("cannot create {:?}: {}", output_path, e),
        })?;

        debug!("Running {} {}", program_name, args.join(" "));
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(output_file))
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| AlignerError::Spawn {
                program: program_name.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AlignerError::ProcessFailed {
                program: program_name,
                status: output.status.code(),
                stderr: Self::last_lines(&stderr, 5),
            });
        }

        Ok(())
    }

    // fast_align prints per-iteration progress on stderr; keep only the tail
    fn last_lines(text: &str, count: usize) -> String {
        let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        let start = lines.len().saturating_sub(count);
        lines[start..].join("\n")
    }
}

#[async_trait]
impl Aligner for FastAlign {
    async fn align(
        &self,
        training_file: &Path,
        output_dir: &Path,
        heuristic: SymmetrizationHeuristic,
    ) -> Result<AlignmentOutputs, AlignerError> {
        let outputs = AlignmentOutputs::in_dir(output_dir, heuristic);
        let fast_align: PathBuf = self.config.fast_align_path();
        let atools: PathBuf = self.config.atools_path();

        info!("Training forward model...");
        Self::run_to_file(&fast_align, &self.model_args(training_file, false), &outputs.forward).await?;

        info!("Training reverse model...");
        Self::run_to_file(&fast_align, &self.model_args(training_file, true), &outputs.reverse).await?;

        info!("Symmetrizing with {}...", heuristic);
        Self::run_to_file(
            &atools,
            &Self::combine_args(&outputs.forward, &outputs.reverse, heuristic),
            &outputs.symmetrized,
        ).await?;

        Ok(outputs)
    }
}
