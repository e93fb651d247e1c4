//! Capacity command - show how much a carrier can hold.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use lsbvault::capacity::{capacity, SAFETY_MARGIN};

use super::CommandExecutor;

/// Show the payload capacity of a carrier.
#[derive(Args, Debug)]
pub struct CapacityCommand {
    /// Path to carrier file (png, bmp, tiff, wav or y4m)
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Low bits used per sample (1-4 for images, 1 for audio and video)
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=4))]
    pub bits: u8,
}

impl CommandExecutor for CapacityCommand {
    fn execute(&self) -> Result<()> {
        let report = capacity(&self.carrier, self.bits)
            .with_context(|| format!("Failed to read {}", self.carrier.display()))?;

        println!("Carrier: {} ({})", self.carrier.display(), report.kind);
        if let (Some(width), Some(height)) = (report.width, report.height) {
            println!("  Dimensions:  {}x{}", width, height);
        }
        println!("  Frames:      {}", report.frames);
        println!("  Channels:    {}", report.channels);
        println!("  Usable bits: {} of {}", report.usable_bits, report.total_bits);
        println!("  {}", report);
        println!(
            "  Max payload: {} bytes",
            report.capacity_bytes.saturating_sub(SAFETY_MARGIN)
        );

        Ok(())
    }
}
