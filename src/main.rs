// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};
use std::io::Write;
use std::path::PathBuf;

use subdialog::app_config::{self, Config};
use subdialog::app_controller::Controller;
use subdialog::language_utils;

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
    /// Generate shell completions for subdialog
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// subdialog - dialogue extraction from subtitle archives
///
/// Walks a corpus of gzip-compressed subtitles, keeps the files whose metadata
/// matches the selected languages, and writes the cleaned dialogue segments of
/// each file as a JSON record mirroring the corpus layout.
#[derive(Parser, Debug)]
#[command(name = "subdialog")]
#[command(version)]
#[command(about = "Extract clean dialogue segments from subtitle archives")]
#[command(subcommand_negates_reqs = true)]
#[command(long_about = "subdialog extracts dialogue segments from time-coded subtitle archives.

EXAMPLES:
    subdialog --inputfolder corpus/ --outputfolder out/ --lang default
    subdialog --inputfolder corpus/ --outputfolder out/ --lang spa,glg
    subdialog --inputfolder corpus/ --outputfolder out/ --lang eu -w 4 --skip-existing
    subdialog completions bash > subdialog.bash

CONFIGURATION:
    Settings are stored in subdialog.json by default. A default file is
    created when it does not exist. Command line options take precedence.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Root folder of the subtitle corpus (holds the metadata table)
    #[arg(long = "inputfolder", visible_alias = "input-folder", value_name = "DIR", required = true)]
    input_folder: Option<PathBuf>,

    /// Folder receiving the dialogue records
    #[arg(long = "outputfolder", visible_alias = "output-folder", value_name = "DIR", required = true)]
    output_folder: Option<PathBuf>,

    /// Comma separated language codes to extract, or 'default' for the configured list
    #[arg(long, value_name = "CODES", required = true)]
    lang: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "subdialog.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Number of files processed in parallel
    #[arg(short, long)]
    workers: Option<usize>,

    /// Keep dialogue records that already exist
    #[arg(long)]
    skip_existing: bool,

    /// Keep the dialogue that follows the last caption gap
    #[arg(long)]
    flush_trailing: bool,

    /// Metadata table path, relative to the input folder
    #[arg(long)]
    metadata_file: Option<String>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and emoji for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "❌ "),
            Level::Warn => ("1;33", "🚧 "),
            Level::Info => ("1;32", " "),
            Level::Debug => ("1;36", "🔍 "),
            Level::Trace => ("1;35", "📋 "),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let now = chrono::Local::now().format("%H:%M:%S.%3f");
        let (colour, emoji) = Self::style_for_level(record.level());
        let _ = writeln!(
            std::io::stderr(),
            "\x1B[{}m{} {} {}\x1B[0m",
            colour, now, emoji, record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Log everything up to trace; the effective level is narrowed with set_max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "subdialog", &mut std::io::stdout());
        return Ok(());
    }

    run_extraction(cli).await
}

async fn run_extraction(options: CommandLineOptions) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let input_folder = options
        .input_folder
        .ok_or_else(|| anyhow!("--inputfolder is required"))?;
    let output_folder = options
        .output_folder
        .ok_or_else(|| anyhow!("--outputfolder is required"))?;
    let lang = options.lang.ok_or_else(|| anyhow!("--lang is required"))?;

    let mut config = Config::load_or_create(&options.config_path)?;

    // Override config with CLI options if provided
    config.languages = language_utils::parse_language_list(&lang, &config.languages);

    if let Some(workers) = options.workers {
        config.workers = Some(workers);
    }

    if options.skip_existing {
        config.force_overwrite = false;
    }

    if options.flush_trailing {
        config.extraction.flush_trailing = true;
    }

    if let Some(metadata_file) = options.metadata_file {
        config.metadata_file = metadata_file;
    }

    match &options.log_level {
        Some(log_level) => config.log_level = log_level.clone().into(),
        None => log::set_max_level(config.log_level.to_level_filter()),
    }

    let controller = Controller::with_config(config)?;
    let summary = controller.run(input_folder, output_folder).await?;

    if summary.failed > 0 {
        info!("{} file(s) failed, see the errors above", summary.failed);
    }

    Ok(())
}
