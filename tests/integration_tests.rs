//! Integration tests for lsbvault
//!
//! Every test goes through real carrier files in a temporary directory:
//! - PNG/BMP images (length-prefixed codec)
//! - 16-bit WAV audio and Y4M video (sentinel-terminated codec)
//! - Capacity limits, wrong passwords and tampering

use std::fs;
use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavSpec, WavWriter};
use image::{DynamicImage, ImageBuffer, Rgb, Rgba};
use tempfile::TempDir;

use lsbvault::analysis::score;
use lsbvault::stego::{AudioStego, ImageStego, VideoStego};
use lsbvault::{
    capacity, compare_images, decode, decode_carrier, encode, encode_carrier, security_analysis,
    Carrier, CarrierKind, CodecError, DecoderConfig, EncoderConfig, MediaCodec, SecurityLevel,
    Visibility,
};

fn gradient_rgb(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([
            ((x * 17) % 256) as u8,
            ((y * 23) % 256) as u8,
            (((x + y) * 31) % 256) as u8,
        ])
    }))
}

fn noisy_rgb(width: u32, height: u32, seed: u32) -> DynamicImage {
    let mut state = seed;
    DynamicImage::ImageRgb8(ImageBuffer::from_fn(width, height, |_, _| {
        let mut next = || {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 24) as u8
        };
        Rgb([next(), next(), next()])
    }))
}

fn write_image(dir: &TempDir, name: &str, image: &DynamicImage) -> PathBuf {
    let path = dir.path().join(name);
    image.save(&path).unwrap();
    path
}

fn write_wav(dir: &TempDir, name: &str, channels: u16, samples: &[i16]) -> PathBuf {
    let path = dir.path().join(name);
    let spec = WavSpec {
        channels,
        sample_rate: 44100,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(&path, spec).unwrap();
    for &sample in samples {
        writer.write_sample(sample).unwrap();
    }
    writer.finalize().unwrap();
    path
}

fn sine_samples(count: usize) -> Vec<i16> {
    (0..count)
        .map(|i| {
            let t = i as f64 / 44100.0;
            (f64::sin(2.0 * std::f64::consts::PI * 440.0 * t) * 12000.0) as i16
        })
        .collect()
}

fn write_y4m(dir: &TempDir, name: &str, width: u32, height: u32, frames: usize) -> PathBuf {
    let plane = (width * height) as usize;
    let frames = (0..frames)
        .map(|f| (0..plane * 3).map(|i| (i * 5 + f * 11) as u8).collect())
        .collect();
    let video = VideoStego::from_frames(width, height, frames).unwrap();

    let path = dir.path().join(name);
    fs::write(&path, video.to_bytes()).unwrap();
    path
}

fn roundtrip(carrier: &Path, output: &Path, payload: &[u8]) {
    let result = encode(carrier, payload, "correct horse", output, &EncoderConfig::default())
        .unwrap();
    assert_eq!(result.original_size, payload.len());
    assert!(output.exists());

    let decoded = decode(output, "correct horse", &DecoderConfig::default()).unwrap();
    assert_eq!(decoded.payload, payload);
    assert!(decoded.was_compressed);
}

/// Test PNG encode/decode roundtrip through files
#[test]
fn test_png_roundtrip() {
    let dir = TempDir::new().unwrap();
    let carrier = write_image(&dir, "cover.png", &gradient_rgb(120, 90));

    roundtrip(&carrier, &dir.path().join("stego.png"), b"Meet me at the usual place.");
}

/// Test BMP output keeps the embedded bits
#[test]
fn test_bmp_roundtrip() {
    let dir = TempDir::new().unwrap();
    let carrier = write_image(&dir, "cover.bmp", &gradient_rgb(64, 64));

    roundtrip(&carrier, &dir.path().join("stego.bmp"), b"bitmap payload");
}

/// Test that a binary payload survives
#[test]
fn test_binary_payload_roundtrip() {
    let dir = TempDir::new().unwrap();
    let carrier = write_image(&dir, "cover.png", &gradient_rgb(100, 100));
    let payload: Vec<u8> = (0..=255u8).cycle().take(2000).collect();

    roundtrip(&carrier, &dir.path().join("stego.png"), &payload);
}

/// Test WAV encode/decode roundtrip
#[test]
fn test_wav_roundtrip() {
    let dir = TempDir::new().unwrap();
    let carrier = write_wav(&dir, "cover.wav", 2, &sine_samples(40_000));

    let output = dir.path().join("stego.wav");
    roundtrip(&carrier, &output, b"audio secret");

    let original = AudioStego::from_file(&carrier).unwrap();
    let stego = AudioStego::from_file(&output).unwrap();
    assert_eq!(stego.spec(), original.spec());
    assert_eq!(stego.samples().len(), original.samples().len());
}

/// Test Y4M encode/decode roundtrip
#[test]
fn test_y4m_roundtrip() {
    let dir = TempDir::new().unwrap();
    let carrier = write_y4m(&dir, "cover.y4m", 32, 24, 3);

    let output = dir.path().join("stego.y4m");
    roundtrip(&carrier, &output, b"video secret");

    let stego = VideoStego::from_file(&output).unwrap();
    assert_eq!(stego.frame_count(), 3);
    assert_eq!(stego.header().width, 32);
    assert_eq!(fs::metadata(&output).unwrap().len(), fs::metadata(&carrier).unwrap().len());
}

/// Test that 4:2:0 video is rejected
#[test]
fn test_y4m_420_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("clip.y4m");
    let mut bytes = b"YUV4MPEG2 W4 H4 F25:1 C420jpeg\nFRAME\n".to_vec();
    bytes.extend(vec![128u8; 24]);
    fs::write(&path, bytes).unwrap();

    assert!(matches!(
        capacity(&path, 1),
        Err(CodecError::UnsupportedCarrierFormat(_))
    ));
}

/// Test that a wrong password is reported as an authentication failure
#[test]
fn test_wrong_password_fails() {
    let dir = TempDir::new().unwrap();
    let carrier = write_image(&dir, "cover.png", &gradient_rgb(80, 80));
    let output = dir.path().join("stego.png");

    encode(&carrier, b"top secret", "right", &output, &EncoderConfig::default()).unwrap();

    let result = decode(&output, "wrong", &DecoderConfig::default());
    assert!(matches!(result, Err(CodecError::AuthenticationFailure)));
}

/// Test that flipping one bit anywhere in the envelope is detected
#[test]
fn test_tampered_envelope_fails() {
    let cover = ImageStego::from_image(gradient_rgb(80, 80)).unwrap();
    let carrier = Carrier::Image(cover);
    let config = EncoderConfig {
        use_compression: false,
        ..Default::default()
    };

    let (stego, _) = encode_carrier(&carrier, b"do not touch", "pw", &config).unwrap();
    let envelope = stego.extract(1).unwrap();
    assert_eq!(envelope.len(), 12 + 44);

    // salt, nonce, ciphertext, tag
    for index in [0, 16, 28, envelope.len() - 1] {
        let mut tampered = envelope.clone();
        tampered[index] ^= 0x01;

        let forged = carrier.hide(&tampered, 1).unwrap();
        let result = decode_carrier(&forged, "pw", &DecoderConfig::default());
        assert!(
            matches!(result, Err(CodecError::AuthenticationFailure)),
            "byte {} tamper not detected",
            index
        );
    }
}

/// Test that tampering is detected in a sentinel-terminated carrier too
#[test]
fn test_tampered_audio_envelope_fails() {
    let spec = WavSpec {
        channels: 1,
        sample_rate: 44100,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let carrier = Carrier::Audio(AudioStego::from_samples(spec, sine_samples(4000)).unwrap());
    let config = EncoderConfig {
        use_compression: false,
        ..Default::default()
    };

    let (stego, _) = encode_carrier(&carrier, b"do not touch", "pw", &config).unwrap();
    let envelope = stego.extract(1).unwrap();
    assert_eq!(envelope.len(), 12 + 44);

    let mut checked = 0;
    for index in [0, 5, 16, 27, 28, 40, envelope.len() - 1] {
        for bit in [0, 3, 7] {
            let mut tampered = envelope.clone();
            tampered[index] ^= 1 << bit;
            // A flip that forms the sentinel would only shorten the envelope.
            if tampered.windows(2).any(|pair| pair == [0xFF, 0xFE]) {
                continue;
            }

            let forged = carrier.hide(&tampered, 1).unwrap();
            let result = decode_carrier(&forged, "pw", &DecoderConfig::default());
            assert!(
                matches!(result, Err(CodecError::AuthenticationFailure)),
                "byte {} bit {} tamper not detected",
                index,
                bit
            );
            checked += 1;
        }
    }
    assert!(checked > 0);
}

/// Test that audio encodes always decode, whatever salt and nonce were drawn
#[test]
fn test_repeated_audio_roundtrips() {
    let spec = WavSpec {
        channels: 1,
        sample_rate: 44100,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let carrier = Carrier::Audio(AudioStego::from_samples(spec, sine_samples(40_000)).unwrap());
    let config = EncoderConfig {
        use_compression: false,
        ..Default::default()
    };
    // Uncompressed so every envelope is long enough to meet the sentinel now and then.
    let payload: Vec<u8> = (0..4000u32).map(|i| (i * 37 % 251) as u8).collect();

    for round in 0..12 {
        let (stego, _) = encode_carrier(&carrier, &payload, "pw", &config).unwrap();
        let envelope = stego.extract(1).unwrap();
        assert!(!envelope.windows(2).any(|pair| pair == [0xFF, 0xFE]));

        let decoded = decode_carrier(&stego, "pw", &DecoderConfig::default())
            .unwrap_or_else(|e| panic!("round {} failed: {}", round, e));
        assert_eq!(decoded.payload, payload);
    }
}

/// Test that an output path of another medium is refused before anything is written
#[test]
fn test_output_kind_mismatch_refused() {
    let dir = TempDir::new().unwrap();
    let wav = write_wav(&dir, "cover.wav", 1, &sine_samples(20_000));
    let y4m = write_y4m(&dir, "cover.y4m", 16, 16, 4);
    let png = write_image(&dir, "cover.png", &gradient_rgb(64, 64));

    for (carrier, output) in [
        (&wav, "stego.png"),
        (&wav, "stego.y4m"),
        (&y4m, "stego.wav"),
        (&png, "stego.wav"),
    ] {
        let output = dir.path().join(output);
        let result = encode(carrier, b"x", "pw", &output, &EncoderConfig::default());

        assert!(matches!(result, Err(CodecError::UnsupportedCarrierFormat(_))));
        assert!(!output.exists());
    }
}

/// Test that a carrier with nothing hidden reports it
#[test]
fn test_no_hidden_data() {
    let dir = TempDir::new().unwrap();
    let white = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(50, 50, Rgb([255u8, 255, 255])));
    let png = write_image(&dir, "white.png", &white);
    let wav = write_wav(&dir, "silence.wav", 1, &vec![0i16; 10_000]);

    for path in [png, wav] {
        let result = decode(&path, "pw", &DecoderConfig::default());
        assert!(
            matches!(result, Err(CodecError::NoHiddenDataFound)),
            "{}: {:?}",
            path.display(),
            result
        );
    }
}

/// Test the capacity boundary: payload + 100 == capacity fits, one more byte does not
#[test]
fn test_capacity_boundary() {
    let dir = TempDir::new().unwrap();
    let carrier = write_image(&dir, "cover.png", &gradient_rgb(100, 100));
    let report = capacity(&carrier, 1).unwrap();
    assert_eq!(report.capacity_bytes, 3746);

    let config = EncoderConfig {
        use_compression: false,
        ..Default::default()
    };

    let fits = dir.path().join("fits.png");
    let payload = vec![0x42u8; 3646];
    encode(&carrier, &payload, "pw", &fits, &config).unwrap();
    let decoded = decode(&fits, "pw", &DecoderConfig::default()).unwrap();
    assert_eq!(decoded.payload, payload);

    let too_big = dir.path().join("too_big.png");
    let result = encode(&carrier, &[0x42u8; 3647], "pw", &too_big, &config);
    assert!(matches!(
        result,
        Err(CodecError::CapacityExceeded {
            required: 3747,
            capacity: 3746
        })
    ));
    assert!(!too_big.exists());
}

/// Test the raw image codec on a plain white image
#[test]
fn test_white_image_raw_codec() {
    let white = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(100, 100, Rgb([255u8, 255, 255])));
    let cover = ImageStego::from_image(white.clone()).unwrap();
    let data = b"Hello, this is a test message!";

    let hidden = cover.hide(data, 1).unwrap();
    assert_eq!(hidden.extract(1).unwrap(), data);

    let before = white.to_rgb8();
    let after = hidden.image().to_rgb8();
    let changed = before
        .as_raw()
        .iter()
        .zip(after.as_raw())
        .filter(|(a, b)| a != b)
        .count();
    assert!(changed <= data.len() * 8 + 32, "changed = {}", changed);
}

/// Test that an audio carrier that is too small fails before writing output
#[test]
fn test_audio_capacity_exceeded_writes_nothing() {
    let dir = TempDir::new().unwrap();
    // 1000 samples = 1000 bits of capacity
    let carrier = write_wav(&dir, "short.wav", 1, &sine_samples(1000));
    let output = dir.path().join("out.wav");

    // Raw codec: 127 bytes + sentinel = 1032 bits
    let audio = AudioStego::from_file(&carrier).unwrap();
    assert!(audio.hide(&[0u8; 127], 1).is_err());

    let result = encode(&carrier, &[0u8; 127], "pw", &output, &EncoderConfig::default());
    assert!(matches!(
        result,
        Err(CodecError::CapacityExceeded { capacity: 125, .. })
    ));
    assert!(!output.exists());
}

/// Test that alpha survives a file roundtrip
#[test]
fn test_rgba_alpha_preserved() {
    let dir = TempDir::new().unwrap();
    let rgba = DynamicImage::ImageRgba8(ImageBuffer::from_fn(60, 60, |x, y| {
        Rgba([(x * 4) as u8, (y * 4) as u8, 77, (255 - x - y) as u8])
    }));
    let carrier = write_image(&dir, "cover.png", &rgba);
    let output = dir.path().join("stego.png");

    roundtrip(&carrier, &output, b"keep my alpha");

    let before = rgba.to_rgba8();
    let after = image::open(&output).unwrap().to_rgba8();
    for (a, b) in before.pixels().zip(after.pixels()) {
        assert_eq!(a.0[3], b.0[3]);
    }
}

/// Test that lossy image output is refused and nothing is written
#[test]
fn test_lossy_output_refused() {
    let dir = TempDir::new().unwrap();
    let carrier = write_image(&dir, "cover.png", &gradient_rgb(64, 64));
    let output = dir.path().join("stego.jpg");

    let result = encode(&carrier, b"x", "pw", &output, &EncoderConfig::default());
    assert!(matches!(result, Err(CodecError::UnsupportedCarrierFormat(_))));
    assert!(!output.exists());
}

/// Test capacity reports across carrier kinds
#[test]
fn test_capacity_reports() {
    let dir = TempDir::new().unwrap();
    let png = write_image(&dir, "cover.png", &gradient_rgb(100, 100));
    let wav = write_wav(&dir, "cover.wav", 2, &sine_samples(8000));
    let y4m = write_y4m(&dir, "cover.y4m", 16, 8, 4);

    let report = capacity(&png, 2).unwrap();
    assert_eq!(report.kind, CarrierKind::Image);
    assert_eq!(report.capacity_bytes, (60_000 - 32) / 8);

    let report = capacity(&wav, 1).unwrap();
    assert_eq!(report.kind, CarrierKind::Audio);
    assert_eq!(report.capacity_bytes, 1000);

    let report = capacity(&y4m, 1).unwrap();
    assert_eq!(report.kind, CarrierKind::Video);
    assert_eq!(report.capacity_bytes, 192);

    assert!(matches!(
        capacity(&wav, 2),
        Err(CodecError::InvalidBitsPerUnit { bits: 2, .. })
    ));
}

/// Test that more LSB bits never make a textured image score meaningfully better
#[test]
fn test_monotonic_stealth() {
    let payload: Vec<u8> = (0..600).map(|i| (i * 37 % 251) as u8).collect();
    let config = |bits| EncoderConfig {
        bits_per_unit: bits,
        use_compression: false,
    };

    for seed in [1, 2, 3] {
        let carrier = Carrier::Image(ImageStego::from_image(noisy_rgb(64, 64, seed)).unwrap());

        let scores: Vec<f64> = (1..=4)
            .map(|bits| encode_carrier(&carrier, &payload, "pw", &config(bits)).unwrap().1)
            .map(|result| result.security_score)
            .collect();

        for pair in scores.windows(2) {
            assert!(pair[1] <= pair[0] + 0.05, "seed {}: scores {:?}", seed, scores);
        }
    }
}

/// Test security analysis and image comparison on files
#[test]
fn test_analysis_and_compare() {
    let dir = TempDir::new().unwrap();
    let cover = noisy_rgb(64, 64, 42);
    let carrier = write_image(&dir, "cover.png", &cover);
    let output = dir.path().join("stego.png");

    encode(&carrier, b"statistics", "pw", &output, &EncoderConfig::default()).unwrap();

    let analysis = security_analysis(&output);
    assert_eq!(analysis.level, SecurityLevel::High);
    assert!((analysis.detection_risk_percent - (1.0 - analysis.score) * 100.0).abs() < 1e-9);
    assert!((score(&Carrier::from_file(&output).unwrap()) - analysis.score).abs() < 1e-12);

    let cmp = compare_images(&carrier, &output).unwrap();
    assert_eq!(cmp.max_difference, 1);
    assert_eq!(cmp.visibility, Visibility::Imperceptible);

    let missing = security_analysis(dir.path().join("missing.png"));
    assert_eq!(missing.score, 0.5);
    assert_eq!(missing.level, SecurityLevel::Medium);
}
