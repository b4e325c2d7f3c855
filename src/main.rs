// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, Context};
use log::{error, warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use talpsplit::app_config::{self, Config};
use talpsplit::corpus::{CorpusInputs, CorpusValidator};
use talpsplit::{AlignmentRequest, Controller, ErrorCategory, SymmetrizationHeuristic};

/// CLI Wrapper for SymmetrizationHeuristic to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliHeuristic {
    GrowDiagFinalAnd,
    GrowDiagFinal,
    GrowDiag,
    Intersect,
    Union,
}

impl From<CliHeuristic> for SymmetrizationHeuristic {
    fn from(cli_heuristic: CliHeuristic) -> Self {
        match cli_heuristic {
            CliHeuristic::GrowDiagFinalAnd => SymmetrizationHeuristic::GrowDiagFinalAnd,
            CliHeuristic::GrowDiagFinal => SymmetrizationHeuristic::GrowDiagFinal,
            CliHeuristic::GrowDiag => SymmetrizationHeuristic::GrowDiag,
            CliHeuristic::Intersect => SymmetrizationHeuristic::Intersect,
            CliHeuristic::Union => SymmetrizationHeuristic::Union,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Align parallel corpora and write one alignment file per pair and direction
    Align(AlignArgs),

    /// Generate shell completions for talpsplit
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct AlignArgs {
    /// Paths to the source sentences in txt format (one per line)
    #[arg(long, required = true, num_args = 1..)]
    source_paths: Vec<PathBuf>,

    /// Paths to the target sentences in txt format (one per line)
    #[arg(long, required = true, num_args = 1..)]
    target_paths: Vec<PathBuf>,

    /// Names of the output files stored in the output directory
    #[arg(long, required = true, num_args = 1..)]
    output_names: Vec<String>,

    /// Directory where the alignment files are stored
    #[arg(long)]
    output_dir: PathBuf,

    /// Paths to the augmentation corpus source sentences (one per line)
    #[arg(long, num_args = 1..)]
    source_parallel_corpus: Vec<PathBuf>,

    /// Paths to the augmentation corpus target sentences (one per line)
    #[arg(long, num_args = 1..)]
    target_parallel_corpus: Vec<PathBuf>,

    /// Directory for intermediate files (default: a fresh directory under the output directory)
    #[arg(long)]
    tmp_dir: Option<PathBuf>,

    /// Keep the intermediate files after the run
    #[arg(long)]
    keep_tmp_dir: bool,

    /// Directory containing the fast_align and atools binaries
    #[arg(long)]
    fast_align_dir: Option<String>,

    /// Symmetrization heuristic for the combined alignment
    #[arg(long, value_enum)]
    heuristic: Option<CliHeuristic>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Do not display the progress spinner
    #[arg(long)]
    no_progress: bool,
}

/// talpsplit - word alignment over multiple parallel corpora
///
/// Aligns several source/target corpus pairs in one fast_align run and
/// writes the forward, reverse and symmetrized alignments of each pair to
/// its own files.
#[derive(Parser, Debug)]
#[command(name = "talpsplit")]
#[command(version)]
#[command(about = "Batch word alignment with per-corpus outputs")]
#[command(long_about = "talpsplit concatenates parallel corpora, aligns them with fast_align and splits the alignments back per corpus.

EXAMPLES:
    talpsplit align --source-paths a.en b.en --target-paths a.de b.de \\
        --output-names a b --output-dir out/
    talpsplit align --source-paths test.en --target-paths test.de --output-names test \\
        --output-dir out/ --source-parallel-corpus europarl.en --target-parallel-corpus europarl.de
    talpsplit completions bash > talpsplit.bash

OUTPUT:
    For every output name N the files N.forward.talp, N.reverse.talp and
    N.grow_diag_final-and.talp (named after the heuristic) are written.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation, filtered by log::max_level
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()), now, record.level(), record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    // Info until the configuration says otherwise
    if let Err(e) = CustomLogger::init(LevelFilter::Info) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let cli = CommandLineOptions::parse();

    let result = match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "talpsplit", &mut std::io::stdout());
            Ok(())
        }
        Commands::Align(args) => run_align(args).await,
    };

    if let Err(e) = result {
        let category = ErrorCategory::of(&e);
        error!("{:#}", e);
        std::process::exit(category.exit_code());
    }
}

async fn run_align(options: AlignArgs) -> Result<()> {
    let corpus = CorpusInputs {
        source_paths: options.source_paths,
        target_paths: options.target_paths,
        output_names: options.output_names,
        augmentation_sources: options.source_parallel_corpus,
        augmentation_targets: options.target_parallel_corpus,
    };

    // Argument counts are checked before the config file is read or created
    CorpusValidator::check_arguments(&corpus)?;

    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = load_config(&options.config_path)?;

    // Override config with CLI options if provided
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    } else {
        log::set_max_level(config.log_level.to_level_filter());
    }

    if let Some(fast_align_dir) = &options.fast_align_dir {
        config.aligner.fast_align_dir = fast_align_dir.clone();
    }

    if let Some(heuristic) = &options.heuristic {
        config.aligner.heuristic = heuristic.clone().into();
    }

    if options.tmp_dir.is_some() {
        config.workspace.tmp_dir = options.tmp_dir.clone();
    }

    if options.keep_tmp_dir {
        config.workspace.remove_tmp_dir = false;
    }

    let controller = Controller::with_config(config)?.with_progress(!options.no_progress);

    let request = AlignmentRequest {
        corpus,
        output_dir: options.output_dir,
    };

    controller.run(&request).await?;
    Ok(())
}

// @loads: Configuration file, writing defaults when it does not exist
fn load_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        return Ok(config);
    }

    warn!("Config file not found at '{}', creating default config.", config_path);

    let config = Config::default();
    let config_json = serde_json::to_string_pretty(&config)
        .context("Failed to serialize default config to JSON")?;

    std::fs::write(config_path, config_json)
        .context(format!("Failed to write default config to file: {}", config_path))?;

    Ok(config)
}
