//! LSB steganography for raw video.
//!
//! Carriers are YUV4MPEG2 (`.y4m`) streams with 8-bit 4:4:4 planes, so every
//! pixel contributes three color bytes and no lossy codec touches them.
//! Frames are fully buffered in memory.
//!
//! Format: [data bits] + [sentinel 0xFFFE], MSB first, one bit per color byte,
//! frame by frame in stream order (Y, U, V planes of each frame).

use std::fs;
use std::path::Path;

use super::bits::{bits_msb_first, read_until_sentinel, with_sentinel, SENTINEL_BITS};
use super::error::StegoError;
use super::{check_output_kind, CarrierKind, MediaCodec};
use crate::capacity::CapacityReport;

const STREAM_MAGIC: &[u8] = b"YUV4MPEG2";
const FRAME_MAGIC: &[u8] = b"FRAME";

/// Stream header of a YUV4MPEG2 file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoHeader {
    pub width: u32,
    pub height: u32,
    /// Every header token after the magic, kept verbatim for rewriting.
    params: Vec<String>,
}

impl VideoHeader {
    /// Header for a `width` x `height` 4:4:4 stream at 25 fps.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            params: vec![
                format!("W{}", width),
                format!("H{}", height),
                "F25:1".to_string(),
                "Ip".to_string(),
                "A1:1".to_string(),
                "C444".to_string(),
            ],
        }
    }

    fn parse(line: &[u8]) -> Result<Self, StegoError> {
        let line = std::str::from_utf8(line)
            .map_err(|_| StegoError::LoadError("stream header is not ASCII".to_string()))?;

        let mut tokens = line.split_ascii_whitespace();
        if tokens.next().map(str::as_bytes) != Some(STREAM_MAGIC) {
            return Err(StegoError::UnsupportedFormat(
                "not a YUV4MPEG2 stream".to_string(),
            ));
        }

        let params: Vec<String> = tokens.map(str::to_string).collect();
        let mut width = None;
        let mut height = None;
        // YUV4MPEG2 defaults to 4:2:0 when no colorspace is given.
        let mut colorspace = "420jpeg";

        for param in &params {
            let mut chars = param.chars();
            let tag = chars.next();
            let value = chars.as_str();
            match tag {
                Some('W') => width = value.parse::<u32>().ok(),
                Some('H') => height = value.parse::<u32>().ok(),
                Some('C') => colorspace = value,
                _ => {}
            }
        }

        if colorspace != "444" {
            return Err(StegoError::UnsupportedChannelLayout(format!(
                "colorspace C{} is not supported, use 8-bit C444",
                colorspace
            )));
        }

        let (width, height) = match (width, height) {
            (Some(width), Some(height)) if width > 0 && height > 0 => (width, height),
            _ => {
                return Err(StegoError::LoadError(
                    "stream header is missing a valid width or height".to_string(),
                ))
            }
        };
        checked_frame_len(width, height)?;

        Ok(Self {
            width,
            height,
            params,
        })
    }

    // Saturates; headers reaching the codec have passed `checked_frame_len`.
    fn frame_len(&self) -> usize {
        self.luma_len().saturating_mul(3)
    }

    fn luma_len(&self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(STREAM_MAGIC);
        for param in &self.params {
            out.push(b' ');
            out.extend_from_slice(param.as_bytes());
        }
        out.push(b'\n');
    }
}

/// One raw frame: its `FRAME` parameters and Y, U, V planes back to back.
#[derive(Debug, Clone, PartialEq, Eq)]
struct VideoFrame {
    params: Vec<u8>,
    data: Vec<u8>,
}

/// Video steganography handler.
#[derive(Debug, Clone)]
pub struct VideoStego {
    header: VideoHeader,
    frames: Vec<VideoFrame>,
}

fn check_bits(bits_per_unit: u8) -> Result<(), StegoError> {
    if bits_per_unit != 1 {
        return Err(StegoError::InvalidBitsPerUnit {
            bits: bits_per_unit,
            reason: "video carriers use exactly 1 bit per color byte",
        });
    }
    Ok(())
}

/// Bytes in one 4:4:4 frame, or `LoadError` if that does not fit in memory.
fn checked_frame_len(width: u32, height: u32) -> Result<usize, StegoError> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|luma| luma.checked_mul(3))
        .ok_or_else(|| {
            StegoError::LoadError(format!("frame size {}x{} overflows", width, height))
        })
}

fn next_line(bytes: &[u8], start: usize) -> Result<(&[u8], usize), StegoError> {
    let rest = &bytes[start..];
    let end = rest
        .iter()
        .position(|&b| b == b'\n')
        .ok_or_else(|| StegoError::LoadError("unterminated header line".to_string()))?;
    Ok((&rest[..end], start + end + 1))
}

impl VideoStego {
    /// Loads a YUV4MPEG2 file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StegoError> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Parses a YUV4MPEG2 stream from memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StegoError> {
        let (line, mut pos) = next_line(bytes, 0)?;
        let header = VideoHeader::parse(line)?;
        let frame_len = header.frame_len();

        let mut frames = Vec::new();
        while pos < bytes.len() {
            let (line, data_start) = next_line(bytes, pos)?;
            let params = line.strip_prefix(FRAME_MAGIC).ok_or_else(|| {
                StegoError::LoadError(format!("expected FRAME marker at byte {}", pos))
            })?;

            let data_end = data_start
                .checked_add(frame_len)
                .filter(|&end| end <= bytes.len());
            let Some(data_end) = data_end else {
                return Err(StegoError::LoadError(format!(
                    "truncated frame {}: need {} bytes, have {}",
                    frames.len(),
                    frame_len,
                    bytes.len() - data_start
                )));
            };

            frames.push(VideoFrame {
                params: params.to_vec(),
                data: bytes[data_start..data_end].to_vec(),
            });
            pos = data_end;
        }

        Ok(Self { header, frames })
    }

    /// Builds a 4:4:4 stream from planar frames of `width * height * 3` bytes.
    pub fn from_frames(width: u32, height: u32, frames: Vec<Vec<u8>>) -> Result<Self, StegoError> {
        let frame_len = checked_frame_len(width, height)?;
        let header = VideoHeader::new(width, height);

        let frames = frames
            .into_iter()
            .enumerate()
            .map(|(index, data)| {
                if data.len() != frame_len {
                    return Err(StegoError::UnsupportedFormat(format!(
                        "frame {} has {} bytes, expected {}",
                        index,
                        data.len(),
                        frame_len
                    )));
                }
                Ok(VideoFrame {
                    params: Vec::new(),
                    data,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { header, frames })
    }

    /// Serializes the stream, rewriting every frame with its original parameters.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            64 + self.frames.len() * (self.header.frame_len() + FRAME_MAGIC.len() + 1),
        );
        self.header.write_to(&mut out);
        for frame in &self.frames {
            out.extend_from_slice(FRAME_MAGIC);
            out.extend_from_slice(&frame.params);
            out.push(b'\n');
            out.extend_from_slice(&frame.data);
        }
        out
    }

    pub fn header(&self) -> &VideoHeader {
        &self.header
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Planar bytes of frame `index`.
    pub fn frame(&self, index: usize) -> Option<&[u8]> {
        self.frames.get(index).map(|f| f.data.as_slice())
    }

    /// Luma plane of every frame, in stream order.
    pub fn luma_planes(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let luma_len = self.header.luma_len();
        self.frames.iter().map(move |f| &f.data[..luma_len])
    }

    fn color_bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.frames.iter().flat_map(|f| f.data.iter().copied())
    }

    fn color_byte_count(&self) -> usize {
        self.frames.len() * self.header.frame_len()
    }
}

impl MediaCodec for VideoStego {
    fn capacity(&self, bits_per_unit: u8) -> Result<CapacityReport, StegoError> {
        check_bits(bits_per_unit)?;
        Ok(CapacityReport::video(
            self.frames.len(),
            self.header.width,
            self.header.height,
        ))
    }

    fn hide(&self, data: &[u8], bits_per_unit: u8) -> Result<Self, StegoError> {
        check_bits(bits_per_unit)?;

        let available_bits = self.color_byte_count();
        let needed_bits = data.len() * 8 + SENTINEL_BITS;
        if needed_bits > available_bits {
            return Err(StegoError::CapacityExceeded {
                needed_bits,
                available_bits,
            });
        }

        let framed = with_sentinel(data);
        let mut frames = self.frames.clone();

        let color_bytes = frames.iter_mut().flat_map(|f| f.data.iter_mut());
        for (byte, bit) in color_bytes.zip(bits_msb_first(&framed)) {
            *byte = (*byte & !1) | bit;
        }

        Ok(Self {
            header: self.header.clone(),
            frames,
        })
    }

    fn extract(&self, bits_per_unit: u8) -> Result<Vec<u8>, StegoError> {
        check_bits(bits_per_unit)?;

        read_until_sentinel(self.color_bytes().map(|b| b & 1)).ok_or(StegoError::NoHiddenData)
    }

    fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StegoError> {
        let path = path.as_ref();
        check_output_kind(path, CarrierKind::Video)?;

        fs::write(path, self.to_bytes())?;
        Ok(())
    }
}

/// Creates a small 4:4:4 test clip with a moving gradient.
#[cfg(test)]
pub(crate) fn create_test_video(width: u32, height: u32, frame_count: usize) -> VideoStego {
    let plane = (width * height) as usize;
    let frames = (0..frame_count)
        .map(|f| {
            (0..plane * 3)
                .map(|i| ((i % plane) * 7 + f * 13 + (i / plane) * 50) as u8)
                .collect()
        })
        .collect();
    VideoStego::from_frames(width, height, frames).unwrap()
}
