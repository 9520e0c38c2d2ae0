//! lexm CLI - command-line front end for the lexm tokenization engine.
//!
//! Parses arguments with clap, sets up logging, loads `lexm.toml` and
//! dispatches to the command handlers.

mod commands;
mod config;
mod error;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use lexm_lex::LexConfig;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::common::OutputFormat;
use commands::traits::Command;
use commands::{
    ExtractArgs, ExtractCommand, GenerateArgs, GenerateCommand, ScanArgs, ScanCommand,
};
use error::{CliError, Result};

/// lexm - scan text into lexemes
///
/// Runs the lexm tokenizer over files or strings and exercises the numeric
/// literal token.
#[derive(Parser, Debug)]
#[command(name = "lexm")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scan text into lexemes", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, env = "LEXM_VERBOSE")]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "LEXM_CONFIG")]
    config: Option<PathBuf>,

    /// Disable color output
    #[arg(long, global = true, env = "LEXM_NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the lexm CLI.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan a file or string into lexemes
    ///
    /// Uses names, numeric literals and one token per ASCII symbol.
    /// Unrecognized spans are reported as warnings.
    Scan(ScanOpts),

    /// Check whether strings are numeric literals
    Extract(ExtractOpts),

    /// Generate random numeric literals
    ///
    /// With --check every literal is read back and compared.
    Generate(GenerateOpts),
}

/// Arguments for the scan subcommand.
#[derive(Parser, Debug)]
struct ScanOpts {
    /// File to scan
    file: Option<PathBuf>,

    /// Scan this text instead of a file
    #[arg(short, long, conflicts_with = "file")]
    text: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Reserved words, comma separated
    #[arg(short, long, value_delimiter = ',')]
    reserved: Vec<String>,

    /// Exit with an error if any input is unrecognized
    #[arg(long)]
    deny_unrecognized: bool,
}

/// Arguments for the extract subcommand.
#[derive(Parser, Debug)]
struct ExtractOpts {
    /// Candidate literals
    #[arg(required = true)]
    literals: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Arguments for the generate subcommand.
#[derive(Parser, Debug)]
struct GenerateOpts {
    /// Generator seed (default: random)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of literals
    #[arg(short = 'n', long, default_value_t = 10)]
    count: usize,

    /// Minimum requested length
    #[arg(long, default_value_t = 1)]
    min: usize,

    /// Maximum requested length
    #[arg(long, default_value_t = 12)]
    max: usize,

    /// Read every literal back and fail on mismatches
    #[arg(long)]
    check: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.no_color)?;

    let config = config::load(cli.config.as_deref()).context("failed to load configuration")?;

    execute_command(cli.command, config)?;
    Ok(())
}

/// Initialize the logging system.
fn init_logging(verbose: bool, no_color: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let subscriber = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))
}

/// Execute the selected command against standard output.
fn execute_command(command: Commands, config: LexConfig) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match command {
        Commands::Scan(opts) => execute::<ScanCommand>(opts.into(), config, &mut out),
        Commands::Extract(opts) => execute::<ExtractCommand>(opts.into(), config, &mut out),
        Commands::Generate(opts) => execute::<GenerateCommand>(opts.into(), config, &mut out),
    }?;
    out.flush()?;
    Ok(())
}

fn execute<C: Command>(args: C::Args, config: LexConfig, out: &mut dyn Write) -> Result<()> {
    debug!(command = C::name(), "running");
    C::new(args, config).run(out)
}

impl From<ScanOpts> for ScanArgs {
    fn from(opts: ScanOpts) -> Self {
        Self {
            file: opts.file,
            text: opts.text,
            format: opts.format,
            reserved: opts.reserved,
            deny_unrecognized: opts.deny_unrecognized,
        }
    }
}

impl From<ExtractOpts> for ExtractArgs {
    fn from(opts: ExtractOpts) -> Self {
        Self {
            literals: opts.literals,
            format: opts.format,
        }
    }
}

impl From<GenerateOpts> for GenerateArgs {
    fn from(opts: GenerateOpts) -> Self {
        Self {
            seed: opts.seed,
            count: opts.count,
            min: opts.min,
            max: opts.max,
            check: opts.check,
            format: opts.format,
        }
    }
}
