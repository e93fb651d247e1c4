//! Compare command - measure how much embedding changed an image.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use lsbvault::compare_images;

use super::CommandExecutor;

/// Compare an original image with its stego copy (PSNR, pixel differences).
#[derive(Args, Debug)]
pub struct CompareCommand {
    /// Path to the original image
    #[arg(long)]
    pub original: PathBuf,

    /// Path to the stego image
    #[arg(long)]
    pub stego: PathBuf,
}

impl CommandExecutor for CompareCommand {
    fn execute(&self) -> Result<()> {
        let cmp = compare_images(&self.original, &self.stego).with_context(|| {
            format!(
                "Failed to compare {} with {}",
                self.original.display(),
                self.stego.display()
            )
        })?;

        println!("Max sample difference: {}", cmp.max_difference);
        println!("Avg sample difference: {:.4}", cmp.average_difference);
        println!(
            "Changed samples:       {} ({:.2}%)",
            cmp.changed_samples, cmp.changed_percent
        );
        println!("MSE:                   {:.4}", cmp.mse);
        if cmp.psnr.is_infinite() {
            println!("PSNR:                  inf (identical)");
        } else {
            println!("PSNR:                  {:.2} dB", cmp.psnr);
        }
        println!("Visibility:            {}", cmp.visibility);

        Ok(())
    }
}
