//! Property-based tests with proptest
//!
//! - `compression_properties`: zlib roundtrip for arbitrary bytes, including empty
//! - `codec_properties`: raw LSB codecs return exactly what was hidden
//! - `envelope_properties`: sealing roundtrips, rejects other passwords and any flipped bit

use proptest::prelude::*;

use image::{DynamicImage, ImageBuffer, Rgb};
use lsbvault::crypto::{compress, decompress, open, seal, SymmetricError, ENVELOPE_OVERHEAD};
use lsbvault::stego::{ImageStego, MediaCodec};

mod compression_properties {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Property: decompress(compress(x)) == x
        #[test]
        fn prop_compress_roundtrip(data in prop::collection::vec(any::<u8>(), 0..4096)) {
            let compressed = compress(&data).unwrap();
            prop_assert_eq!(decompress(&compressed).unwrap(), data);
        }

        /// Property: compression output is deterministic
        #[test]
        fn prop_compress_deterministic(data in prop::collection::vec(any::<u8>(), 0..1024)) {
            prop_assert_eq!(compress(&data).unwrap(), compress(&data).unwrap());
        }
    }
}

mod codec_properties {
    use super::*;

    fn cover(seed: u8) -> ImageStego {
        let img = ImageBuffer::from_fn(48, 48, |x, y| {
            Rgb([
                (x as u8).wrapping_mul(seed),
                (y as u8).wrapping_add(seed),
                ((x + y) as u8) ^ seed,
            ])
        });
        ImageStego::from_image(DynamicImage::ImageRgb8(img)).unwrap()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Property: extract(hide(x)) == x at every bit depth
        #[test]
        fn prop_image_codec_roundtrip(
            data in prop::collection::vec(any::<u8>(), 0..800),
            bits in 1u8..=4,
            seed in any::<u8>(),
        ) {
            let stego = cover(seed);
            let hidden = stego.hide(&data, bits).unwrap();
            prop_assert_eq!(hidden.extract(bits).unwrap(), data);
        }

        /// Property: only the low `bits` of each sample change
        #[test]
        fn prop_image_codec_preserves_high_bits(
            data in prop::collection::vec(any::<u8>(), 1..400),
            bits in 1u8..=4,
        ) {
            let stego = cover(7);
            let hidden = stego.hide(&data, bits).unwrap();
            let mask = !((1u8 << bits) - 1);

            let before = stego.image().to_rgb8();
            let after = hidden.image().to_rgb8();
            for (a, b) in before.as_raw().iter().zip(after.as_raw()) {
                prop_assert_eq!(a & mask, b & mask);
            }
        }
    }
}

mod envelope_properties {
    use super::*;

    proptest! {
        // scrypt makes each case slow
        #![proptest_config(ProptestConfig::with_cases(8))]

        /// Property: open(seal(x, pw), pw) == x and the envelope grows by a fixed overhead
        #[test]
        fn prop_seal_roundtrip(
            data in prop::collection::vec(any::<u8>(), 0..256),
            password in "[a-zA-Z0-9]{1,16}",
        ) {
            let envelope = seal(&data, &password).unwrap();
            prop_assert_eq!(envelope.len(), data.len() + ENVELOPE_OVERHEAD);
            prop_assert_eq!(open(&envelope, &password).unwrap(), data);

            let other = format!("{}!", password);
            prop_assert!(open(&envelope, &other).is_err());
        }

        /// Property: flipping any single bit of salt, nonce, ciphertext or tag fails authentication
        #[test]
        fn prop_bit_flip_detected(
            data in prop::collection::vec(any::<u8>(), 0..128),
            index in any::<prop::sample::Index>(),
            bit in 0u8..8,
        ) {
            let mut envelope = seal(&data, "pw").unwrap();
            let at = index.index(envelope.len());
            envelope[at] ^= 1 << bit;

            prop_assert!(matches!(
                open(&envelope, "pw"),
                Err(SymmetricError::AuthenticationFailed)
            ));
        }
    }
}
