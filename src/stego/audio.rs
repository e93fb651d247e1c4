//! LSB steganography for audio files.
//!
//! Hides data in the least significant bit of each 16-bit PCM sample.
//! Supports WAV files (uncompressed PCM).
//!
//! Format: [data bits] + [sentinel 0xFFFE], MSB first, one bit per sample
//! across all interleaved channels.

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use super::bits::{bits_msb_first, read_until_sentinel, with_sentinel, SENTINEL_BITS};
use super::error::StegoError;
use super::{check_output_kind, CarrierKind, MediaCodec};
use crate::capacity::CapacityReport;

/// Audio steganography handler.
#[derive(Debug, Clone)]
pub struct AudioStego {
    /// Audio specification (sample rate, channels, etc.)
    spec: WavSpec,
    /// Interleaved audio samples (16-bit signed integers)
    samples: Vec<i16>,
}

fn check_bits(bits_per_unit: u8) -> Result<(), StegoError> {
    if bits_per_unit != 1 {
        return Err(StegoError::InvalidBitsPerUnit {
            bits: bits_per_unit,
            reason: "audio carriers use exactly 1 bit per sample",
        });
    }
    Ok(())
}

fn load_error(e: hound::Error) -> StegoError {
    match e {
        hound::Error::IoError(io) => StegoError::IoError(io),
        other => StegoError::LoadError(other.to_string()),
    }
}

fn save_error(e: hound::Error) -> StegoError {
    StegoError::SaveError(e.to_string())
}

impl AudioStego {
    /// Creates a new AudioStego from a file path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StegoError> {
        let reader = WavReader::open(path).map_err(load_error)?;
        Self::from_reader(reader)
    }

    /// Creates a new AudioStego from WAV bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StegoError> {
        let reader = WavReader::new(Cursor::new(bytes)).map_err(load_error)?;
        Self::from_reader(reader)
    }

    /// Creates an AudioStego from an in-memory spec and samples.
    pub fn from_samples(spec: WavSpec, samples: Vec<i16>) -> Result<Self, StegoError> {
        Self::check_spec(&spec)?;
        Ok(Self { spec, samples })
    }

    fn from_reader<R: Read>(reader: WavReader<R>) -> Result<Self, StegoError> {
        let spec = reader.spec();
        Self::check_spec(&spec)?;

        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(load_error)?;

        Ok(Self { spec, samples })
    }

    fn check_spec(spec: &WavSpec) -> Result<(), StegoError> {
        if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
            return Err(StegoError::UnsupportedFormat(format!(
                "only 16-bit PCM WAV is supported, got {} bits {:?}",
                spec.bits_per_sample, spec.sample_format
            )));
        }
        if spec.channels == 0 {
            return Err(StegoError::UnsupportedChannelLayout(
                "WAV declares zero channels".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of sample frames (samples per channel).
    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.spec.channels as usize
    }

    /// Returns the audio specification.
    pub fn spec(&self) -> &WavSpec {
        &self.spec
    }

    /// Returns the interleaved samples.
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Returns the audio as WAV bytes.
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>, StegoError> {
        let mut cursor = Cursor::new(Vec::new());
        self.write_wav(&mut cursor)?;
        Ok(cursor.into_inner())
    }

    fn write_wav<W: Write + Seek>(&self, out: W) -> Result<(), StegoError> {
        let mut writer = WavWriter::new(out, self.spec).map_err(save_error)?;
        for sample in &self.samples {
            writer.write_sample(*sample).map_err(save_error)?;
        }
        writer.finalize().map_err(save_error)
    }
}

impl MediaCodec for AudioStego {
    fn capacity(&self, bits_per_unit: u8) -> Result<CapacityReport, StegoError> {
        check_bits(bits_per_unit)?;
        Ok(CapacityReport::audio(
            self.frame_count(),
            self.spec.channels as usize,
        ))
    }

    /// Hides data followed by the sentinel; returns a new AudioStego.
    fn hide(&self, data: &[u8], bits_per_unit: u8) -> Result<Self, StegoError> {
        check_bits(bits_per_unit)?;

        let needed_bits = data.len() * 8 + SENTINEL_BITS;
        if needed_bits > self.samples.len() {
            return Err(StegoError::CapacityExceeded {
                needed_bits,
                available_bits: self.samples.len(),
            });
        }

        let framed = with_sentinel(data);
        let mut new_samples = self.samples.clone();

        for (sample, bit) in new_samples.iter_mut().zip(bits_msb_first(&framed)) {
            // Clear LSB and set new bit
            *sample = (*sample & !1) | bit as i16;
        }

        Ok(Self {
            spec: self.spec,
            samples: new_samples,
        })
    }

    /// Extracts everything before the first sentinel.
    fn extract(&self, bits_per_unit: u8) -> Result<Vec<u8>, StegoError> {
        check_bits(bits_per_unit)?;

        read_until_sentinel(self.samples.iter().map(|s| (s & 1) as u8))
            .ok_or(StegoError::NoHiddenData)
    }

    /// Saves the audio as a WAV file with the same WavSpec it was loaded with.
    /// The path must carry a `.wav` extension.
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StegoError> {
        let path = path.as_ref();
        check_output_kind(path, CarrierKind::Audio)?;

        let file = std::fs::File::create(path)?;
        self.write_wav(std::io::BufWriter::new(file))
    }
}

/// Creates a simple test audio carrier.
#[cfg(test)]
pub(crate) fn create_test_audio(sample_count: usize, channels: u16) -> AudioStego {
    let spec = WavSpec {
        channels,
        sample_rate: 44100,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    // Generate a simple sine wave
    let samples: Vec<i16> = (0..sample_count)
        .map(|i| {
            let t = i as f64 / 44100.0;
            let freq = 440.0; // A4 note
            (f64::sin(2.0 * std::f64::consts::PI * freq * t) * 16000.0) as i16
        })
        .collect();

    AudioStego { spec, samples }
}
