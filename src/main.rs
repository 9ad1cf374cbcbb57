// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use bararan::app_config::{self, Config};
use bararan::app_controller::{Controller, RunSummary};

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
    /// Generate shell completions for bararan
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// bararan - Armenian vocabulary builder
///
/// Merges an Armenian-Russian dictionary archive and an OCR'd
/// Armenian-English dictionary into a leveled vocabulary file.
#[derive(Parser, Debug)]
#[command(name = "bararan")]
#[command(version)]
#[command(about = "Build a leveled Armenian vocabulary from two dictionaries")]
#[command(long_about = "bararan reads a StarDict Armenian-Russian archive and an OCR layout dump of an
Armenian-English dictionary, keeps the headwords found in both, assigns each a
CEFR level and writes vocabulary.json.

EXAMPLES:
    bararan                                  # Build using conf.json and cached sources
    bararan --no-cache                       # Re-parse both sources
    bararan --no-cache-english -l debug      # Re-run OCR row reconstruction only
    bararan -o public/vocabulary.json        # Write elsewhere
    bararan completions bash > bararan.bash  # Generate bash completions

CONFIGURATION:
    Configuration is read from conf.json by default. A missing file means
    built-in defaults are used; command-line options override the file.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Re-parse the Russian archive even if a cache exists
    #[arg(long)]
    no_cache_russian: bool,

    /// Re-parse the English OCR layout even if a cache exists
    #[arg(long)]
    no_cache_english: bool,

    /// Re-parse both sources
    #[arg(long)]
    no_cache: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: PathBuf,

    /// Directory holding the .ifo/.idx/.dict.dz archive
    #[arg(long, value_name = "DIR")]
    archive_dir: Option<PathBuf>,

    /// OCR layout JSON dump
    #[arg(long, value_name = "FILE")]
    layout_file: Option<PathBuf>,

    /// Directory for per-source cache files
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// Output vocabulary file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Global word budget across all levels
    #[arg(long)]
    max_words: Option<usize>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Disable progress bars
    #[arg(long)]
    no_progress: bool,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI colour for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "1;31"),
            Level::Warn => ("🚧 ", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("🔍 ", "1;36"),
            Level::Trace => ("📋 ", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, colour) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", colour, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

fn main() -> Result<()> {
    // Trace is the ceiling; the effective level is lowered once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "bararan", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(cmd_log_level) = &cli.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    if let Err(e) = load_config(&cli).and_then(run_pipeline) {
        error!("{:#}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn load_config(options: &CommandLineOptions) -> Result<Config> {
    let (mut config, found) = Config::load_or_default(&options.config_path)?;
    if !found {
        warn!("Config file not found at {:?}, using defaults", options.config_path);
    }

    // Override config with CLI options if provided
    if let Some(dir) = &options.archive_dir {
        config.sources.archive_dir = dir.clone();
    }
    if let Some(file) = &options.layout_file {
        config.sources.layout_file = file.clone();
    }
    if let Some(dir) = &options.cache_dir {
        config.cache.dir = dir.clone();
    }
    if let Some(output) = &options.output {
        config.output.path = output.clone();
    }
    if let Some(max_words) = options.max_words {
        config.levels.max_words = max_words;
    }
    if options.no_progress {
        config.show_progress = false;
    }
    config.apply_cache_flags(options.no_cache, options.no_cache_russian, options.no_cache_english);

    match &options.log_level {
        Some(log_level) => config.log_level = log_level.clone().into(),
        None => log::set_max_level(level_filter(&config.log_level)),
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

fn run_pipeline(config: Config) -> Result<RunSummary> {
    if !config.cache.reuse_archive || !config.cache.reuse_layout {
        info!("Cache options:");
        if !config.cache.reuse_archive {
            info!("  - Skipping Russian cache");
        }
        if !config.cache.reuse_layout {
            info!("  - Skipping English cache");
        }
    }

    let controller = Controller::with_config(config)?;
    let summary = controller.run()?;

    info!(
        "Sources: {} Russian entries{}, {} English entries{}",
        summary.archive_entries,
        if summary.archive_from_cache { " (cached)" } else { "" },
        summary.layout_entries,
        if summary.layout_from_cache { " (cached)" } else { "" }
    );
    info!("Merged {} headwords, {} kept after filtering", summary.merged, summary.filtered);
    for (level, count) in &summary.level_counts {
        info!("  {}: {} words", level, count);
    }
    info!(
        "Success: {} words across {} levels in {}",
        summary.total_words(),
        summary.level_counts.len(),
        summary.output_path.display()
    );

    Ok(summary)
}
