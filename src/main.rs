// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::Path;

use crate::app_config::Config;
use app_controller::Controller;

mod app_config;
mod app_controller;
mod chunk;
mod errors;
mod file_utils;
mod markup;
mod providers;
mod translation;

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

fn level_filter_for(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for yaet
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// YAET - Yet Another Ebook Translator
///
/// Translates unpacked EPUB content and plain text files using an
/// OpenAI-compatible chat completions API.
#[derive(Parser, Debug)]
#[command(name = "yaet")]
#[command(version = "0.1.0")]
#[command(about = "AI-powered ebook translation tool")]
#[command(long_about = "YAET translates unpacked EPUB content (XHTML chapters, OPF and NCX
metadata) and plain text files using an OpenAI-compatible API.

EXAMPLES:
    yaet                                  # Translate ./input into ./output
    yaet -i ./book -o ./book_en           # Explicit input and output directories
    yaet -m gpt-4o                        # Override the configured model
    yaet --side-by-side                   # Keep original lines next to translations
    yaet --log-level debug                # Verbose logging
    yaet completions bash > yaet.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically; fill in the API key before rerunning.

    Files whose translated counterpart already exists in the output directory
    are skipped, so an interrupted run can simply be restarted.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Input directory with the files to translate
    #[arg(short, long)]
    input_dir: Option<String>,

    /// Output directory for translated files
    #[arg(short, long)]
    output_dir: Option<String>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Character budget for one translation request
    #[arg(long)]
    input_limit: Option<usize>,

    /// Keep original lines alongside their translations
    #[arg(long)]
    side_by_side: bool,

    /// Keep ruby annotations instead of stripping them
    #[arg(long)]
    keep_ruby: bool,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
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

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "yaet", &mut std::io::stdout());
        return Ok(());
    }

    run_translate(cli).await
}

async fn run_translate(options: CommandLineOptions) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(level_filter_for(&cmd_log_level.clone().into()));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );
        let config = Config::default();
        config
            .write_to_file(config_path)
            .with_context(|| format!("Failed to write default config to file: {}", config_path))?;
        return Err(anyhow::anyhow!(
            "A default config was written to '{}'. Set the API key and run again.",
            config_path
        ));
    };

    // Override config with CLI options if provided
    if let Some(input_dir) = &options.input_dir {
        config.processing.input_dir = input_dir.clone();
    }
    if let Some(output_dir) = &options.output_dir {
        config.processing.output_dir = output_dir.clone();
    }
    if let Some(model) = &options.model {
        config.provider.model = model.clone();
    }
    if let Some(input_limit) = options.input_limit {
        config.processing.input_limit = input_limit;
    }
    if options.side_by_side {
        config.processing.side_by_side = true;
    }
    if options.keep_ruby {
        config.processing.remove_ruby_annotations = false;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config
        .validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter_for(&config.log_level));
    }

    let controller = Controller::with_config(config)?;
    controller.run().await
}
