//! Engine-wide invariants, checked for every registered codec.

use bytepack_core::{Codec, CodecError, CompressionConfig, Crc32};
use bytepack_engine::{decompress_auto, registry, CodecFormat};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

fn config() -> CompressionConfig {
    CompressionConfig::default()
}

/// A spread of data profiles: runs, text, ramps, binary noise.
fn corpora() -> Vec<(&'static str, Vec<u8>)> {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let mut noise = vec![0u8; 6000];
    rng.fill_bytes(&mut noise);

    vec![
        ("single", vec![0x41]),
        ("runs", vec![0x00; 5000]),
        (
            "text",
            b"The quick brown fox jumps over the lazy dog. ".repeat(100),
        ),
        ("ramp", (0..20_000u32).map(|i| (i % 256) as u8).collect()),
        ("noise", noise),
        (
            "mixed",
            {
                let mut data = vec![0xFF; 2000];
                data.extend_from_slice(&b"abcabcabc".repeat(300));
                data.extend((0..2000u32).map(|i| (i * 7 % 256) as u8));
                data
            },
        ),
    ]
}

#[test]
fn test_roundtrip_every_codec_every_corpus() {
    for name in registry::list() {
        let mut codec = registry::get(name).unwrap();
        for (label, input) in corpora() {
            let out = codec.compress(&input, &config()).unwrap();
            let restored = codec.decompress(&out.data, &config()).unwrap();
            assert_eq!(restored.data, input, "{name} on {label}");
        }
    }
}

#[test]
fn test_crc_stability() {
    for name in registry::list() {
        let mut codec = registry::get(name).unwrap();
        for (label, input) in corpora() {
            let expected = Crc32::compute(&input);
            let out = codec.compress(&input, &config()).unwrap();
            assert_eq!(out.stats.checksum, expected, "{name} compress on {label}");
            let restored = codec.decompress(&out.data, &config()).unwrap();
            assert_eq!(
                restored.stats.checksum, expected,
                "{name} decompress on {label}"
            );
        }
    }
}

#[test]
fn test_empty_input_rejected_everywhere() {
    for name in registry::list() {
        let mut codec = registry::get(name).unwrap();
        assert!(
            matches!(codec.compress(&[], &config()), Err(CodecError::EmptyInput)),
            "{name} compress"
        );
        assert!(
            matches!(codec.decompress(&[], &config()), Err(CodecError::EmptyInput)),
            "{name} decompress"
        );
    }
}

#[test]
fn test_magic_isolation() {
    // A stream produced by one codec must never silently decode under
    // another.
    let input = b"magic isolation probe payload, repeated a few times. ".repeat(20);

    for producer in registry::list() {
        let compressed = {
            let mut codec = registry::get(producer).unwrap();
            codec.compress(&input, &config()).unwrap().data
        };

        for consumer in registry::list() {
            if consumer == producer {
                continue;
            }
            let mut codec = registry::get(consumer).unwrap();
            let result = codec.decompress(&compressed, &config());
            match result {
                Err(CodecError::BadMagic { .. })
                | Err(CodecError::CorruptStream { .. })
                | Err(CodecError::TruncatedFrame { .. })
                | Err(CodecError::UnexpectedEndOfStream { .. }) => {}
                Ok(out) => panic!(
                    "{consumer} silently decoded a {producer} stream into {} bytes",
                    out.data.len()
                ),
                Err(other) => panic!("{consumer} on {producer} stream: unexpected {other:?}"),
            }
        }
    }
}

#[test]
fn test_compression_is_deterministic() {
    for name in registry::list() {
        let mut codec = registry::get(name).unwrap();
        for (label, input) in corpora() {
            let first = codec.compress(&input, &config()).unwrap();
            let second = codec.compress(&input, &config()).unwrap();
            assert_eq!(first.data, second.data, "{name} on {label}");
        }
    }
}

#[test]
fn test_auto_decompress_roundtrips_every_codec() {
    for name in registry::list() {
        let mut codec = registry::get(name).unwrap();
        for (label, input) in corpora() {
            let out = codec.compress(&input, &config()).unwrap();
            let restored = decompress_auto(&out.data, &config()).unwrap();
            assert_eq!(restored.data, input, "auto after {name} on {label}");

            // Detection agrees with the producing codec, except that RLE's
            // headerless simple framing is only ever claimed by RLE itself.
            let format = CodecFormat::from_magic(&out.data);
            assert_eq!(format.codec_name(), name, "detect after {name} on {label}");
        }
    }
}

#[test]
fn test_stats_sizes_are_consistent() {
    for name in registry::list() {
        let mut codec = registry::get(name).unwrap();
        let input = b"sizes must line up with the buffers ".repeat(50);
        let out = codec.compress(&input, &config()).unwrap();
        assert_eq!(out.stats.original_size, input.len());
        assert_eq!(out.stats.compressed_size, out.data.len());
        let ratio = out.data.len() as f64 / input.len() as f64;
        assert!((out.stats.compression_ratio - ratio).abs() < 1e-12);

        let restored = codec.decompress(&out.data, &config()).unwrap();
        assert_eq!(restored.stats.original_size, input.len());
        assert_eq!(restored.stats.compressed_size, out.data.len());
    }
}

#[test]
fn test_verify_integrity_off_skips_checksum() {
    let mut codec = registry::get("hybrid").unwrap();
    let config = CompressionConfig {
        verify_integrity: false,
        ..Default::default()
    };
    let out = codec.compress(&[0x42; 1000], &config).unwrap();
    assert_eq!(out.stats.checksum, 0);
}
