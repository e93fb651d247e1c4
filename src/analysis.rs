//! Stealth scoring and stego/original comparison.
//!
//! The score is a weighted blend of three statistics of a carrier's 8-bit
//! intensity distribution:
//!
//! ```text
//! score = 0.3 * min(std / 50, 1) + 0.3 * H256 / 8 + 0.4 * Hlsb
//! ```
//!
//! where `H256` is the Shannon entropy (bits) of the 256-bin intensity
//! histogram and `Hlsb` the entropy of the LSB plane. Higher is stealthier.

use std::fmt;
use std::path::Path;

use tracing::warn;

use crate::error::CodecError;
use crate::stego::{Carrier, StegoError};

/// Score returned when a carrier cannot be read or holds no samples.
pub const NEUTRAL_SCORE: f64 = 0.5;

const STD_WEIGHT: f64 = 0.3;
const ENTROPY_WEIGHT: f64 = 0.3;
const LSB_ENTROPY_WEIGHT: f64 = 0.4;
const STD_NORMALIZER: f64 = 50.0;

/// Coarse bucket over the stealth score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityLevel {
    Low,
    Medium,
    High,
}

impl SecurityLevel {
    pub fn from_score(score: f64) -> Self {
        if score < 0.3 {
            SecurityLevel::Low
        } else if score < 0.6 {
            SecurityLevel::Medium
        } else {
            SecurityLevel::High
        }
    }
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SecurityLevel::Low => "Low",
            SecurityLevel::Medium => "Medium",
            SecurityLevel::High => "High",
        };
        f.write_str(name)
    }
}

/// Result of [`security_analysis`].
#[derive(Debug, Clone, PartialEq)]
pub struct SecurityAnalysis {
    pub score: f64,
    pub level: SecurityLevel,
    /// `(1 - score) * 100`
    pub detection_risk_percent: f64,
    pub recommendation: String,
}

impl SecurityAnalysis {
    pub fn from_score(score: f64) -> Self {
        let level = SecurityLevel::from_score(score);
        let advice = if score < 0.6 {
            "Consider using fewer LSB bits for better stealth."
        } else {
            "Good stealth characteristics detected."
        };

        Self {
            score,
            level,
            detection_risk_percent: (1.0 - score) * 100.0,
            recommendation: format!("Security level: {}. {}", level, advice),
        }
    }
}

/// Accumulates an intensity histogram and an LSB tally.
#[derive(Debug, Clone)]
struct SampleStats {
    histogram: [u64; 256],
    lsb_ones: u64,
    lsb_count: u64,
}

impl SampleStats {
    fn new() -> Self {
        Self {
            histogram: [0; 256],
            lsb_ones: 0,
            lsb_count: 0,
        }
    }

    fn add_intensity(&mut self, value: u8) {
        self.histogram[value as usize] += 1;
    }

    fn add_lsb(&mut self, bit: u8) {
        self.lsb_ones += (bit & 1) as u64;
        self.lsb_count += 1;
    }

    fn score(&self) -> Option<f64> {
        let count: u64 = self.histogram.iter().sum();
        if count == 0 || self.lsb_count == 0 {
            return None;
        }
        let n = count as f64;

        let mean = self
            .histogram
            .iter()
            .enumerate()
            .map(|(value, &c)| value as f64 * c as f64)
            .sum::<f64>()
            / n;
        let variance = self
            .histogram
            .iter()
            .enumerate()
            .map(|(value, &c)| {
                let d = value as f64 - mean;
                d * d * c as f64
            })
            .sum::<f64>()
            / n;

        let entropy = shannon_entropy(&self.histogram);
        let lsb_entropy = shannon_entropy(&[self.lsb_count - self.lsb_ones, self.lsb_ones]);

        let score = STD_WEIGHT * (variance.sqrt() / STD_NORMALIZER).min(1.0)
            + ENTROPY_WEIGHT * entropy / 8.0
            + LSB_ENTROPY_WEIGHT * lsb_entropy;

        Some(score.clamp(0.0, 1.0))
    }
}

/// Shannon entropy in bits of a histogram; empty bins contribute nothing.
fn shannon_entropy(counts: &[u64]) -> f64 {
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;

    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total;
            -p * p.log2()
        })
        .sum()
}

fn carrier_stats(carrier: &Carrier) -> SampleStats {
    let mut stats = SampleStats::new();

    match carrier {
        Carrier::Image(image) => {
            let luma = image.image().to_luma8();
            for &value in luma.as_raw() {
                stats.add_intensity(value);
                stats.add_lsb(value);
            }
        }
        Carrier::Audio(audio) => {
            for &sample in audio.samples() {
                stats.add_intensity(((sample as i32 + 32768) >> 8) as u8);
                stats.add_lsb((sample & 1) as u8);
            }
        }
        Carrier::Video(video) => {
            for plane in video.luma_planes() {
                for &value in plane {
                    stats.add_intensity(value);
                    stats.add_lsb(value);
                }
            }
        }
    }

    stats
}

/// Stealth score of an in-memory carrier, in [0, 1].
pub fn score(carrier: &Carrier) -> f64 {
    carrier_stats(carrier).score().unwrap_or_else(|| {
        warn!("carrier has no samples to score; using neutral score");
        NEUTRAL_SCORE
    })
}

/// Stealth score of a carrier file. Never fails: unreadable files score 0.5.
pub fn score_file<P: AsRef<Path>>(path: P) -> f64 {
    let path = path.as_ref();
    match Carrier::from_file(path) {
        Ok(carrier) => score(&carrier),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot score carrier; using neutral score");
            NEUTRAL_SCORE
        }
    }
}

/// Scores the carrier at `path` and buckets the result.
pub fn security_analysis<P: AsRef<Path>>(path: P) -> SecurityAnalysis {
    SecurityAnalysis::from_score(score_file(path))
}

/// How visible the embedding is, judged by PSNR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Imperceptible,
    VerySlight,
    Noticeable,
    VeryVisible,
}

impl Visibility {
    pub fn from_psnr(psnr: f64) -> Self {
        if psnr > 40.0 {
            Visibility::Imperceptible
        } else if psnr > 30.0 {
            Visibility::VerySlight
        } else if psnr > 20.0 {
            Visibility::Noticeable
        } else {
            Visibility::VeryVisible
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Visibility::Imperceptible => "Imperceptible",
            Visibility::VerySlight => "Very slight",
            Visibility::Noticeable => "Noticeable",
            Visibility::VeryVisible => "Very visible",
        };
        f.write_str(name)
    }
}

/// Per-sample difference between an original image and its stego copy,
/// computed over RGB.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageComparison {
    pub max_difference: u8,
    pub average_difference: f64,
    pub changed_samples: usize,
    pub changed_percent: f64,
    pub mse: f64,
    /// Infinite when the images are identical.
    pub psnr: f64,
    pub visibility: Visibility,
}

/// Compares two decoded images of equal dimensions.
pub fn compare_image_data(
    original: &image::DynamicImage,
    stego: &image::DynamicImage,
) -> Result<ImageComparison, CodecError> {
    let original = original.to_rgb8();
    let stego = stego.to_rgb8();

    if original.dimensions() != stego.dimensions() {
        return Err(CodecError::UnsupportedCarrierFormat(format!(
            "images must have the same dimensions: {:?} vs {:?}",
            original.dimensions(),
            stego.dimensions()
        )));
    }

    let total = original.as_raw().len();
    let mut max_difference = 0u8;
    let mut sum = 0u64;
    let mut squared_sum = 0u64;
    let mut changed_samples = 0usize;

    for (&a, &b) in original.as_raw().iter().zip(stego.as_raw()) {
        let diff = a.abs_diff(b);
        max_difference = max_difference.max(diff);
        sum += diff as u64;
        squared_sum += diff as u64 * diff as u64;
        if diff > 0 {
            changed_samples += 1;
        }
    }

    let (average_difference, mse, changed_percent) = if total == 0 {
        (0.0, 0.0, 0.0)
    } else {
        let n = total as f64;
        (
            sum as f64 / n,
            squared_sum as f64 / n,
            changed_samples as f64 / n * 100.0,
        )
    };

    let psnr = if mse == 0.0 {
        f64::INFINITY
    } else {
        20.0 * (255.0 / mse.sqrt()).log10()
    };

    Ok(ImageComparison {
        max_difference,
        average_difference,
        changed_samples,
        changed_percent,
        mse,
        psnr,
        visibility: Visibility::from_psnr(psnr),
    })
}

/// Loads two image files and compares them.
pub fn compare_images<P: AsRef<Path>, Q: AsRef<Path>>(
    original_path: P,
    stego_path: Q,
) -> Result<ImageComparison, CodecError> {
    let load = |path: &Path| {
        image::open(path).map_err(|e| match e {
            image::ImageError::IoError(io) => CodecError::from(StegoError::IoError(io)),
            other => CodecError::UnsupportedCarrierFormat(other.to_string()),
        })
    };

    let original = load(original_path.as_ref())?;
    let stego = load(stego_path.as_ref())?;
    compare_image_data(&original, &stego)
}
