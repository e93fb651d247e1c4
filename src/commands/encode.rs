//! Encode command - hide a message or file in a carrier.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use lsbvault::{encode, EncoderConfig};

use super::CommandExecutor;

/// Hide a message or file in an image, WAV or Y4M carrier.
///
/// The payload is compressed, sealed with the password (scrypt + AES-256-GCM)
/// and written into the carrier's least significant bits.
/// Image output must be PNG, BMP or TIFF; lossy formats destroy the data.
#[derive(Args, Debug)]
pub struct EncodeCommand {
    /// Path to carrier file (png, bmp, tiff, wav or y4m)
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Text message to hide (mutually exclusive with --file)
    #[arg(short, long, conflicts_with = "file", required_unless_present = "file")]
    pub message: Option<String>,

    /// File to hide (mutually exclusive with --message)
    #[arg(short, long, conflicts_with = "message")]
    pub file: Option<PathBuf>,

    /// Password used to seal the payload
    #[arg(short, long)]
    pub password: String,

    /// Output path for the stego carrier
    #[arg(short, long)]
    pub output: PathBuf,

    /// Low bits used per sample (1-4 for images, 1 for audio and video)
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=4))]
    pub bits: u8,

    /// Skip zlib compression
    #[arg(long)]
    pub no_compress: bool,
}

impl CommandExecutor for EncodeCommand {
    fn execute(&self) -> Result<()> {
        let payload = match (&self.message, &self.file) {
            (Some(message), None) => message.as_bytes().to_vec(),
            (None, Some(path)) => fs::read(path)
                .with_context(|| format!("Failed to read payload file {}", path.display()))?,
            _ => bail!("Provide exactly one of --message or --file"),
        };

        let config = EncoderConfig {
            bits_per_unit: self.bits,
            use_compression: !self.no_compress,
        };

        let result = encode(&self.carrier, &payload, &self.password, &self.output, &config)
            .with_context(|| format!("Failed to encode into {}", self.carrier.display()))?;

        println!("Encoded {} bytes into {}", result.original_size, self.output.display());
        if result.compression_used {
            println!(
                "  Compressed:     {} -> {} bytes (ratio {:.2})",
                result.original_size, result.compressed_size, result.compression_ratio
            );
        }
        println!("  Sealed size:    {} bytes", result.sealed_size);
        println!("  Capacity used:  {:.1}%", result.capacity_used_percent);
        println!("  LSB bits:       {}", result.bits_per_unit);
        println!("  Security score: {:.3}", result.security_score);

        Ok(())
    }
}
