/*!
 * Tests for application configuration functionality
 */

use std::path::PathBuf;
use talpsplit::app_config::{AlignerConfig, Config, LogLevel};
use talpsplit::aligner::SymmetrizationHeuristic;
use talpsplit::errors::ConfigError;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.aligner.fast_align_dir, "fast_align/fast_align/build");
    assert_eq!(config.aligner.heuristic, SymmetrizationHeuristic::GrowDiagFinalAnd);
    assert!(config.aligner.favor_diagonal);
    assert!(config.aligner.optimize_tension);
    assert!(config.aligner.variational_bayes);
    assert_eq!(config.aligner.iterations, None);
    assert!(config.workspace.remove_tmp_dir);
    assert!(config.workspace.tmp_dir.is_none());
    assert_eq!(config.workspace.dir_prefix, "tmp_dir_fastalign_");
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test that binary paths are resolved inside the build directory
#[test]
fn test_aligner_paths_shouldJoinDirAndBinary() {
    let config = AlignerConfig {
        fast_align_dir: "/opt/fast_align/build".to_string(),
        ..AlignerConfig::default()
    };

    assert_eq!(config.fast_align_path(), PathBuf::from("/opt/fast_align/build/fast_align"));
    assert_eq!(config.atools_path(), PathBuf::from("/opt/fast_align/build/atools"));
}

/// Test that a partial JSON file is completed with defaults
#[test]
fn test_deserialize_withPartialJson_shouldFillDefaults() {
    let json = r#"{
        "aligner": { "heuristic": "intersect", "iterations": 5 },
        "log_level": "debug"
    }"#;

    let config: Config = serde_json::from_str(json).expect("config should parse");

    assert_eq!(config.aligner.heuristic, SymmetrizationHeuristic::Intersect);
    assert_eq!(config.aligner.iterations, Some(5));
    assert_eq!(config.aligner.atools_binary, "atools");
    assert!(config.workspace.remove_tmp_dir);
    assert_eq!(config.log_level, LogLevel::Debug);
}

/// Test that the default configuration survives a JSON round trip
#[test]
fn test_serialize_defaultConfig_shouldWriteHeuristicName() {
    let json = serde_json::to_string(&Config::default()).expect("config should serialize");
    assert!(json.contains("\"grow-diag-final-and\""));
}

/// Test configuration validation
#[test]
fn test_config_validation_withInvalidValues_shouldFail() {
    let mut config = Config::default();
    config.aligner.iterations = Some(0);
    let error = config.validate().unwrap_err();
    assert!(matches!(error.downcast_ref::<ConfigError>(), Some(ConfigError::Invalid(_))));

    let mut config = Config::default();
    config.aligner.fast_align_dir = "  ".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.aligner.atools_binary = String::new();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.workspace.dir_prefix = format!("nested{}tmp_", std::path::MAIN_SEPARATOR);
    assert!(config.validate().is_err());
}

/// Test log level conversion
#[test]
fn test_log_level_shouldMapToFilter() {
    assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
