//! Steganography module for hiding data in various carriers.
//!
//! Supports:
//! - Image LSB steganography (PNG, BMP, TIFF), length-prefixed
//! - Audio LSB steganography (16-bit PCM WAV), sentinel-terminated
//! - Video LSB steganography (YUV4MPEG2 4:4:4), sentinel-terminated

pub mod audio;
pub(crate) mod bits;
pub mod error;
pub mod image;
pub mod video;

pub use audio::AudioStego;
pub use error::StegoError;
pub use image::ImageStego;
pub use video::VideoStego;

use std::fmt;
use std::path::Path;

use crate::capacity::CapacityReport;

/// The fixed set of carrier media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CarrierKind {
    Image,
    Audio,
    Video,
}

impl CarrierKind {
    /// Detects the carrier kind from a file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, StegoError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "png" | "bmp" | "tif" | "tiff" => Ok(CarrierKind::Image),
            "wav" => Ok(CarrierKind::Audio),
            "y4m" => Ok(CarrierKind::Video),
            _ => Err(StegoError::UnsupportedFormat(format!(
                "cannot tell carrier type of {}; expected png, bmp, tiff, wav or y4m",
                path.display()
            ))),
        }
    }

    /// How embedded data is delimited in this medium.
    pub fn terminator(&self) -> Terminator {
        match self {
            CarrierKind::Image => Terminator::LengthPrefixed,
            CarrierKind::Audio | CarrierKind::Video => Terminator::SentinelTerminated,
        }
    }
}

impl fmt::Display for CarrierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CarrierKind::Image => "image",
            CarrierKind::Audio => "audio",
            CarrierKind::Video => "video",
        };
        f.write_str(name)
    }
}

/// Fails unless `path` names a file of the given carrier kind.
pub(crate) fn check_output_kind(path: &Path, kind: CarrierKind) -> Result<(), StegoError> {
    let target = CarrierKind::from_path(path)?;
    if target != kind {
        return Err(StegoError::UnsupportedFormat(format!(
            "cannot write {} carrier to {} ({} extension)",
            kind,
            path.display(),
            target
        )));
    }
    Ok(())
}

/// End-of-data strategy of a codec. The two are not interchangeable on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// 32-bit big-endian length header, then exactly that many bytes.
    LengthPrefixed,
    /// Payload bits followed by the 16-bit sentinel `1111111111111110`.
    SentinelTerminated,
}

/// Raw LSB embedding over a carrier's samples.
///
/// Implementations are agnostic to what the bytes mean.
pub trait MediaCodec: Sized {
    /// Capacity at the given bit depth.
    fn capacity(&self, bits_per_unit: u8) -> Result<CapacityReport, StegoError>;

    /// Returns a copy of the carrier with `data` embedded.
    fn hide(&self, data: &[u8], bits_per_unit: u8) -> Result<Self, StegoError>;

    /// Recovers embedded data.
    fn extract(&self, bits_per_unit: u8) -> Result<Vec<u8>, StegoError>;

    /// Writes the carrier in a format that keeps every embedded bit.
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StegoError>;
}

/// A decoded carrier of any supported kind.
#[derive(Debug, Clone)]
pub enum Carrier {
    Image(ImageStego),
    Audio(AudioStego),
    Video(VideoStego),
}

impl Carrier {
    /// Loads a carrier, choosing the codec from the file extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StegoError> {
        let path = path.as_ref();
        match CarrierKind::from_path(path)? {
            CarrierKind::Image => ImageStego::from_file(path).map(Carrier::Image),
            CarrierKind::Audio => AudioStego::from_file(path).map(Carrier::Audio),
            CarrierKind::Video => VideoStego::from_file(path).map(Carrier::Video),
        }
    }

    pub fn kind(&self) -> CarrierKind {
        match self {
            Carrier::Image(_) => CarrierKind::Image,
            Carrier::Audio(_) => CarrierKind::Audio,
            Carrier::Video(_) => CarrierKind::Video,
        }
    }

    pub fn terminator(&self) -> Terminator {
        self.kind().terminator()
    }
}

impl MediaCodec for Carrier {
    fn capacity(&self, bits_per_unit: u8) -> Result<CapacityReport, StegoError> {
        match self {
            Carrier::Image(c) => c.capacity(bits_per_unit),
            Carrier::Audio(c) => c.capacity(bits_per_unit),
            Carrier::Video(c) => c.capacity(bits_per_unit),
        }
    }

    fn hide(&self, data: &[u8], bits_per_unit: u8) -> Result<Self, StegoError> {
        match self {
            Carrier::Image(c) => c.hide(data, bits_per_unit).map(Carrier::Image),
            Carrier::Audio(c) => c.hide(data, bits_per_unit).map(Carrier::Audio),
            Carrier::Video(c) => c.hide(data, bits_per_unit).map(Carrier::Video),
        }
    }

    fn extract(&self, bits_per_unit: u8) -> Result<Vec<u8>, StegoError> {
        match self {
            Carrier::Image(c) => c.extract(bits_per_unit),
            Carrier::Audio(c) => c.extract(bits_per_unit),
            Carrier::Video(c) => c.extract(bits_per_unit),
        }
    }

    fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StegoError> {
        match self {
            Carrier::Image(c) => c.save(path),
            Carrier::Audio(c) => c.save(path),
            Carrier::Video(c) => c.save(path),
        }
    }
}

impl From<ImageStego> for Carrier {
    fn from(stego: ImageStego) -> Self {
        Carrier::Image(stego)
    }
}

impl From<AudioStego> for Carrier {
    fn from(stego: AudioStego) -> Self {
        Carrier::Audio(stego)
    }
}

impl From<VideoStego> for Carrier {
    fn from(stego: VideoStego) -> Self {
        Carrier::Video(stego)
    }
}
