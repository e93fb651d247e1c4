//! Analyze command - statistical stealth score of a carrier.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use lsbvault::security_analysis;

use super::CommandExecutor;

/// Score how detectable LSB embedding in a carrier would be.
///
/// Unreadable files get the neutral score 0.5.
#[derive(Args, Debug)]
pub struct AnalyzeCommand {
    /// Path to carrier file (png, bmp, tiff, wav or y4m)
    #[arg(short, long)]
    pub carrier: PathBuf,
}

impl CommandExecutor for AnalyzeCommand {
    fn execute(&self) -> Result<()> {
        let analysis = security_analysis(&self.carrier);

        println!("Security analysis of {}", self.carrier.display());
        println!("  Score:          {:.3}/1.0", analysis.score);
        println!("  Level:          {}", analysis.level);
        println!("  Detection risk: {:.1}%", analysis.detection_risk_percent);
        println!("  {}", analysis.recommendation);

        Ok(())
    }
}
