//! LSB (Least Significant Bit) steganography for images.
//!
//! Hides data in the low bits of each color sample, in raster order.
//! Supports 8-bit grayscale and RGB images, with or without alpha. Alpha is
//! never written to and is carried through unchanged.
//!
//! Format: [4 bytes big-endian length] + [data bytes], MSB first, packed
//! `bits_per_unit` (1-4) bits per color sample.

use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;
use std::path::Path;

use super::bits::{bits_msb_first, ByteAssembler};
use super::error::StegoError;
use super::MediaCodec;
use crate::capacity::{CapacityReport, LENGTH_HEADER_BITS};

/// Highest supported number of low bits per sample.
pub const MAX_BITS_PER_UNIT: u8 = 4;

/// Length header size in bytes.
const HEADER_BYTES: usize = LENGTH_HEADER_BITS / 8;

/// Image steganography handler.
#[derive(Debug, Clone)]
pub struct ImageStego {
    image: DynamicImage,
    layout: SampleLayout,
}

/// Bytes per pixel and how many of them carry color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SampleLayout {
    stride: usize,
    colors: usize,
}

impl SampleLayout {
    fn of(image: &DynamicImage) -> Result<Self, StegoError> {
        let (stride, colors) = match image {
            DynamicImage::ImageLuma8(_) => (1, 1),
            DynamicImage::ImageLumaA8(_) => (2, 1),
            DynamicImage::ImageRgb8(_) => (3, 3),
            DynamicImage::ImageRgba8(_) => (4, 3),
            other => {
                return Err(StegoError::UnsupportedFormat(format!(
                    "only 8-bit grayscale or RGB images are supported, got {:?}",
                    other.color()
                )))
            }
        };
        Ok(Self { stride, colors })
    }
}

fn raw_samples_mut(image: &mut DynamicImage) -> &mut [u8] {
    match image {
        DynamicImage::ImageLuma8(buf) => &mut **buf,
        DynamicImage::ImageLumaA8(buf) => &mut **buf,
        DynamicImage::ImageRgb8(buf) => &mut **buf,
        DynamicImage::ImageRgba8(buf) => &mut **buf,
        // SampleLayout::of rejects every other variant before we get here.
        _ => &mut [],
    }
}

fn check_bits(bits_per_unit: u8) -> Result<(), StegoError> {
    if bits_per_unit == 0 || bits_per_unit > MAX_BITS_PER_UNIT {
        return Err(StegoError::InvalidBitsPerUnit {
            bits: bits_per_unit,
            reason: "images support 1 to 4 bits per sample",
        });
    }
    Ok(())
}

fn load_error(e: image::ImageError) -> StegoError {
    match e {
        image::ImageError::IoError(io) => StegoError::IoError(io),
        other => StegoError::LoadError(other.to_string()),
    }
}

impl ImageStego {
    /// Creates a new ImageStego from a file path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StegoError> {
        let image = image::open(path).map_err(load_error)?;
        Self::from_image(image)
    }

    /// Creates a new ImageStego from encoded image bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StegoError> {
        let image = image::load_from_memory(bytes).map_err(load_error)?;
        Self::from_image(image)
    }

    /// Creates a new ImageStego from a DynamicImage.
    pub fn from_image(image: DynamicImage) -> Result<Self, StegoError> {
        let layout = SampleLayout::of(&image)?;
        Ok(Self { image, layout })
    }

    /// Number of color channels used for embedding (1 or 3).
    pub fn channels(&self) -> usize {
        self.layout.colors
    }

    fn color_sample_count(&self) -> usize {
        let (width, height) = self.image.dimensions();
        width as usize * height as usize * self.layout.colors
    }

    fn color_samples(&self) -> impl Iterator<Item = u8> + '_ {
        let SampleLayout { stride, colors } = self.layout;
        self.image
            .as_bytes()
            .chunks_exact(stride)
            .flat_map(move |pixel| pixel[..colors].iter().copied())
    }

    /// Returns a reference to the underlying image.
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Returns the image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, StegoError> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| StegoError::SaveError(e.to_string()))?;
        Ok(bytes)
    }
}

impl MediaCodec for ImageStego {
    fn capacity(&self, bits_per_unit: u8) -> Result<CapacityReport, StegoError> {
        check_bits(bits_per_unit)?;
        let (width, height) = self.image.dimensions();
        Ok(CapacityReport::image(width, height, self.layout.colors, bits_per_unit))
    }

    /// Hides data in the image; returns a new image with the data inside.
    fn hide(&self, data: &[u8], bits_per_unit: u8) -> Result<Self, StegoError> {
        check_bits(bits_per_unit)?;

        let available_bits = self.color_sample_count() * bits_per_unit as usize;
        let needed_bits = (HEADER_BYTES + data.len()) * 8;
        if needed_bits > available_bits {
            return Err(StegoError::CapacityExceeded {
                needed_bits,
                available_bits,
            });
        }

        let header = u32::try_from(data.len())
            .map_err(|_| StegoError::CapacityExceeded {
                needed_bits,
                available_bits,
            })?
            .to_be_bytes();
        let mut bits = bits_msb_first(&header).chain(bits_msb_first(data)).peekable();

        let mask = (1u8 << bits_per_unit) - 1;
        let SampleLayout { stride, colors } = self.layout;
        let mut output = self.image.clone();

        let samples = raw_samples_mut(&mut output)
            .chunks_exact_mut(stride)
            .flat_map(|pixel| pixel[..colors].iter_mut());

        for sample in samples {
            if bits.peek().is_none() {
                break;
            }

            // Take the next bits_per_unit bits, zero-padding the final chunk.
            let mut chunk = 0u8;
            for _ in 0..bits_per_unit {
                chunk = (chunk << 1) | bits.next().unwrap_or(0);
            }

            *sample = (*sample & !mask) | chunk;
        }

        Ok(Self {
            image: output,
            layout: self.layout,
        })
    }

    /// Extracts hidden data from the image.
    ///
    /// Reads the length header, then exactly that many bytes.
    fn extract(&self, bits_per_unit: u8) -> Result<Vec<u8>, StegoError> {
        check_bits(bits_per_unit)?;

        let available_bits = self.color_sample_count() * bits_per_unit as usize;
        let mask = (1u8 << bits_per_unit) - 1;

        let mut assembler = ByteAssembler::new();
        let mut data_len: Option<usize> = None;

        for sample in self.color_samples() {
            if !assembler.push_bits(sample & mask, bits_per_unit) {
                continue;
            }

            if data_len.is_none() && assembler.len() >= HEADER_BYTES {
                let mut header = [0u8; HEADER_BYTES];
                header.copy_from_slice(&assembler.bytes()[..HEADER_BYTES]);
                let len = u32::from_be_bytes(header) as usize;

                // Sanity check
                if len > (available_bits / 8).saturating_sub(HEADER_BYTES) {
                    return Err(StegoError::NoHiddenData);
                }
                data_len = Some(len);
            }

            if let Some(len) = data_len {
                if assembler.len() >= HEADER_BYTES + len {
                    let mut bytes = assembler.into_bytes();
                    bytes.truncate(HEADER_BYTES + len);
                    return Ok(bytes.split_off(HEADER_BYTES));
                }
            }
        }

        Err(StegoError::NoHiddenData)
    }

    /// Saves the image. Only lossless formats (PNG, BMP, TIFF) are accepted.
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StegoError> {
        let path = path.as_ref();
        let format = ImageFormat::from_path(path)
            .map_err(|e| StegoError::UnsupportedFormat(e.to_string()))?;

        match format {
            ImageFormat::Png | ImageFormat::Bmp | ImageFormat::Tiff => {}
            other => {
                return Err(StegoError::UnsupportedFormat(format!(
                    "{:?} output would destroy the embedded bits; use PNG, BMP or TIFF",
                    other
                )))
            }
        }

        self.image
            .save_with_format(path, format)
            .map_err(|e| StegoError::SaveError(e.to_string()))
    }
}
