//! lsbvault - password-sealed LSB steganography
//!
//! A CLI for hiding encrypted payloads in images, WAV audio and Y4M video.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

use commands::{
    AnalyzeCommand, CapacityCommand, CommandExecutor, CompareCommand, DecodeCommand,
    EncodeCommand,
};

/// lsbvault - password-sealed LSB steganography
///
/// Compresses, encrypts (scrypt + AES-256-GCM) and hides a payload in the
/// least significant bits of a PNG/BMP/TIFF image, a 16-bit WAV file or a
/// YUV4MPEG2 4:4:4 video.
#[derive(Parser)]
#[command(name = "lsbvault")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Verbose output (same as --log-level debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hide a message or file in a carrier
    Encode(EncodeCommand),

    /// Recover a hidden payload
    Decode(DecodeCommand),

    /// Show how many bytes a carrier can hold
    Capacity(CapacityCommand),

    /// Score how detectable embedding in a carrier would be
    Analyze(AnalyzeCommand),

    /// Compare an original image with its stego copy
    Compare(CompareCommand),
}

impl Commands {
    fn executor(&self) -> &dyn CommandExecutor {
        match self {
            Commands::Encode(cmd) => cmd,
            Commands::Decode(cmd) => cmd,
            Commands::Capacity(cmd) => cmd,
            Commands::Analyze(cmd) => cmd,
            Commands::Compare(cmd) => cmd,
        }
    }
}

/// Setup logging based on configuration
fn setup_logging(log_level: &str, verbose: bool) -> Result<()> {
    let level = if verbose {
        Level::DEBUG
    } else {
        match log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN,
        }
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(&cli.log_level, cli.verbose)?;

    cli.command.executor().execute()
}
