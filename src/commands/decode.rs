//! Decode command - recover a hidden payload from a stego carrier.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use lsbvault::{decode, DecoderConfig};

use super::CommandExecutor;

/// Bytes shown when a binary payload is printed instead of written.
const HEX_PREVIEW_LEN: usize = 100;

/// Extract and decrypt the payload hidden in a stego carrier.
///
/// Use -o/--output to write raw bytes to a file (required for binary data).
/// Without -o, text is printed as-is and binary data as a hex preview.
#[derive(Args, Debug)]
pub struct DecodeCommand {
    /// Path to the stego carrier
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Password the payload was sealed with
    #[arg(short, long)]
    pub password: String,

    /// Output file for the decoded payload
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Low bits per sample used when encoding
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=4))]
    pub bits: u8,
}

impl CommandExecutor for DecodeCommand {
    fn execute(&self) -> Result<()> {
        let config = DecoderConfig {
            bits_per_unit: self.bits,
        };

        let result = decode(&self.carrier, &self.password, &config)
            .with_context(|| format!("Failed to decode {}", self.carrier.display()))?;

        eprintln!(
            "Decoded {} bytes (compressed: {}, security score: {:.3})",
            result.payload.len(),
            if result.was_compressed { "yes" } else { "no" },
            result.security_score
        );

        if let Some(path) = &self.output {
            fs::write(path, &result.payload)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote payload to {}", path.display());
            return Ok(());
        }

        match result.as_text() {
            Some(text) => println!("{}", text),
            None => {
                println!("{}", hex_preview(&result.payload));
                eprintln!("Binary payload; use --output to save it");
            }
        }

        Ok(())
    }
}

/// Hex dump of the first bytes, with an ellipsis when truncated.
fn hex_preview(bytes: &[u8]) -> String {
    let shown = &bytes[..bytes.len().min(HEX_PREVIEW_LEN)];
    let mut hex: String = shown.iter().map(|b| format!("{:02x}", b)).collect();
    if bytes.len() > HEX_PREVIEW_LEN {
        hex.push_str("...");
    }
    hex
}
