/*!
 * End-to-end alignment runs with a mock aligner
 */

use std::fs;
use std::path::Path;
use std::sync::atomic::Ordering;
use anyhow::Result;
use talpsplit::aligner::mock::{MockAligner, MockBehavior};
use talpsplit::aligner::AlignmentDirection;
use talpsplit::app_config::Config;
use talpsplit::corpus::FormatConverter;
use talpsplit::errors::{AlignerError, ConfigError, InputError};
use talpsplit::{AlignmentRequest, Controller};
use crate::common;

fn controller(config: Config, aligner: MockAligner) -> Result<Controller> {
    Ok(Controller::with_aligner(config, Box::new(aligner))?.with_progress(false))
}

/// Alignment line the mock writes for line `index` of a generated pair
fn expected_line(direction: AlignmentDirection, index: usize, name: &str, line: usize) -> String {
    let record = FormatConverter::record(
        &format!("{} source sentence {}", name, line),
        &format!("{} target {}", name, line),
    );
    MockAligner::alignment_line(direction, index, &record)
}

fn output_files(dir: &Path) -> Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    Ok(names)
}

/// Test a run over two pairs writes each pair's block for every direction
#[tokio::test]
async fn test_run_withTwoPairs_shouldWriteSlicesPerDirection() -> Result<()> {
    common::init_test_logging();
    let data_dir = common::create_temp_dir()?;
    let out_dir = common::create_temp_dir()?;
    let inputs = common::corpus_inputs(data_dir.path(), &[("A", 3), ("B", 2)], &[])?;
    let request = AlignmentRequest { corpus: inputs, output_dir: out_dir.path().join("alignments") };

    let summary = controller(Config::default(), MockAligner::working())?.run(&request).await?;

    assert_eq!(summary.primary_lines, 5);
    assert_eq!(summary.combined_lines, 5);
    assert_eq!(summary.written_files.len(), 6);
    assert_eq!(
        output_files(&request.output_dir)?,
        vec![
            "A.forward.talp",
            "A.grow_diag_final-and.talp",
            "A.reverse.talp",
            "B.forward.talp",
            "B.grow_diag_final-and.talp",
            "B.reverse.talp",
        ]
    );

    for direction in AlignmentDirection::ALL {
        let suffix = direction.file_name(Default::default());
        let a = common::read_lines(&request.output_dir.join(format!("A.{}", suffix)))?;
        let b = common::read_lines(&request.output_dir.join(format!("B.{}", suffix)))?;
        let expected_a: Vec<String> = (0..3).map(|i| expected_line(direction, i, "A", i)).collect();
        let expected_b: Vec<String> = (0..2).map(|i| expected_line(direction, 3 + i, "B", i)).collect();
        assert_eq!(a, expected_a);
        assert_eq!(b, expected_b);
    }

    Ok(())
}

/// Test that augmentation data trains with the pairs but is never written out
#[tokio::test]
async fn test_run_withAugmentation_shouldOnlyWritePrimarySlice() -> Result<()> {
    let data_dir = common::create_temp_dir()?;
    let out_dir = common::create_temp_dir()?;
    let inputs = common::corpus_inputs(data_dir.path(), &[("main", 4)], &[("extra", 10)])?;
    let request = AlignmentRequest { corpus: inputs, output_dir: out_dir.path().to_path_buf() };

    let summary = controller(Config::default(), MockAligner::working())?.run(&request).await?;

    assert_eq!(summary.combined_lines, 14);
    assert_eq!(summary.primary_lines, 4);
    assert_eq!(output_files(out_dir.path())?.len(), 3);
    let forward = common::read_lines(&out_dir.path().join("main.forward.talp"))?;
    let expected: Vec<String> = (0..4).map(|i| expected_line(AlignmentDirection::Forward, i, "main", i)).collect();
    assert_eq!(forward, expected);

    Ok(())
}

/// Test that an empty pair yields empty files and leaves the next pair intact
#[tokio::test]
async fn test_run_withEmptyPair_shouldWriteEmptyFilesAndKeepOffsets() -> Result<()> {
    let data_dir = common::create_temp_dir()?;
    let out_dir = common::create_temp_dir()?;
    let inputs = common::corpus_inputs(data_dir.path(), &[("first", 2), ("empty", 0), ("last", 2)], &[])?;
    let request = AlignmentRequest { corpus: inputs, output_dir: out_dir.path().to_path_buf() };

    controller(Config::default(), MockAligner::working())?.run(&request).await?;

    for direction in AlignmentDirection::ALL {
        let suffix = direction.file_name(Default::default());
        let empty = out_dir.path().join(format!("empty.{}", suffix));
        assert_eq!(fs::metadata(&empty)?.len(), 0);

        let last = common::read_lines(&out_dir.path().join(format!("last.{}", suffix)))?;
        let expected: Vec<String> = (0..2).map(|i| expected_line(direction, 2 + i, "last", i)).collect();
        assert_eq!(last, expected);
    }

    Ok(())
}

/// Test that mismatched line counts abort the run before anything is written
#[tokio::test]
async fn test_run_withMismatchedPair_shouldFailWithoutOutputs() -> Result<()> {
    let data_dir = common::create_temp_dir()?;
    let out_dir = common::create_temp_dir()?;
    let mut inputs = common::corpus_inputs(data_dir.path(), &[("good", 2)], &[])?;
    inputs.source_paths.push(common::create_corpus_file(data_dir.path(), "bad.src", &["a", "b"])?);
    inputs.target_paths.push(common::create_corpus_file(data_dir.path(), "bad.tgt", &["a"])?);
    inputs.output_names.push("bad".to_string());
    let aligner = MockAligner::working();
    let calls = aligner.call_counter();
    let request = AlignmentRequest { corpus: inputs, output_dir: out_dir.path().join("never") };

    let error = controller(Config::default(), aligner)?.run(&request).await.unwrap_err();

    assert!(error.downcast_ref::<InputError>().is_some());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!request.output_dir.exists());
    Ok(())
}

/// Test that mismatched argument lists are a configuration error
#[tokio::test]
async fn test_run_withMismatchedArguments_shouldFailWithConfigError() -> Result<()> {
    let data_dir = common::create_temp_dir()?;
    let out_dir = common::create_temp_dir()?;
    let mut inputs = common::corpus_inputs(data_dir.path(), &[("a", 1), ("b", 1)], &[])?;
    inputs.output_names.pop();
    let request = AlignmentRequest { corpus: inputs, output_dir: out_dir.path().join("never") };

    let error = controller(Config::default(), MockAligner::working())?.run(&request).await.unwrap_err();

    assert!(error.downcast_ref::<ConfigError>().is_some());
    assert!(!request.output_dir.exists());
    Ok(())
}

/// Test that an aligner failure aborts the run and no slices are written
#[tokio::test]
async fn test_run_withFailingAligner_shouldWriteNoSlices() -> Result<()> {
    let data_dir = common::create_temp_dir()?;
    let out_dir = common::create_temp_dir()?;
    let inputs = common::corpus_inputs(data_dir.path(), &[("a", 3)], &[])?;
    let request = AlignmentRequest { corpus: inputs, output_dir: out_dir.path().to_path_buf() };

    let error = controller(Config::default(), MockAligner::failing())?.run(&request).await.unwrap_err();

    assert!(error.downcast_ref::<AlignerError>().is_some());
    assert!(output_files(out_dir.path())?.is_empty());
    Ok(())
}

/// Test that a truncated directional output is fatal for the whole run
#[tokio::test]
async fn test_run_withTruncatedOutput_shouldFail() -> Result<()> {
    let data_dir = common::create_temp_dir()?;
    let out_dir = common::create_temp_dir()?;
    let inputs = common::corpus_inputs(data_dir.path(), &[("a", 3), ("b", 1)], &[])?;
    let request = AlignmentRequest { corpus: inputs, output_dir: out_dir.path().to_path_buf() };
    let aligner = MockAligner::new(MockBehavior::Truncated(AlignmentDirection::Forward));

    let error = controller(Config::default(), aligner)?.run(&request).await.unwrap_err();

    assert!(matches!(
        error.downcast_ref::<AlignerError>(),
        Some(AlignerError::LineCountMismatch { expected: 4, actual: 3, .. })
    ));
    assert!(output_files(out_dir.path())?.is_empty());
    Ok(())
}

/// Test that a kept workspace holds the intermediate artifacts
#[tokio::test]
async fn test_run_withKeptWorkspace_shouldLeaveIntermediateFiles() -> Result<()> {
    let data_dir = common::create_temp_dir()?;
    let out_dir = common::create_temp_dir()?;
    let tmp_dir = common::create_temp_dir()?;
    let workspace_dir = tmp_dir.path().join("work");
    let inputs = common::corpus_inputs(data_dir.path(), &[("a", 2)], &[("aug", 3)])?;
    let request = AlignmentRequest { corpus: inputs, output_dir: out_dir.path().to_path_buf() };
    let mut config = Config::default();
    config.workspace.tmp_dir = Some(workspace_dir.clone());
    config.workspace.remove_tmp_dir = false;

    controller(config, MockAligner::working())?.run(&request).await?;

    let training = common::read_lines(&workspace_dir.join("dataset.fast_align"))?;
    assert_eq!(training.len(), 5);
    assert_eq!(training[0], "a source sentence 0 ||| a target 0");
    assert_eq!(training[4], "aug source sentence 2 ||| aug target 2");
    assert_eq!(common::read_lines(&workspace_dir.join("forward.talp"))?.len(), 5);
    assert_eq!(common::read_lines(&workspace_dir.join("source_sentences.txt"))?.len(), 5);
    Ok(())
}

/// Test that the default workspace is removed after a successful run
#[tokio::test]
async fn test_run_withDefaultWorkspace_shouldRemoveIt() -> Result<()> {
    let data_dir = common::create_temp_dir()?;
    let out_dir = common::create_temp_dir()?;
    let inputs = common::corpus_inputs(data_dir.path(), &[("a", 2)], &[])?;
    let request = AlignmentRequest { corpus: inputs, output_dir: out_dir.path().to_path_buf() };

    controller(Config::default(), MockAligner::working())?.run(&request).await?;

    let leftovers: Vec<String> = output_files(out_dir.path())?
        .into_iter()
        .filter(|name| name.starts_with("tmp_dir_fastalign_"))
        .collect();
    assert!(leftovers.is_empty(), "workspace left behind: {:?}", leftovers);
    Ok(())
}

/// Test that a controller refuses an invalid configuration
#[test]
fn test_controller_withInvalidConfig_shouldFail() {
    let mut config = Config::default();
    config.aligner.iterations = Some(0);

    let result = Controller::with_aligner(config, Box::new(MockAligner::working()));

    assert!(result.is_err());
}
