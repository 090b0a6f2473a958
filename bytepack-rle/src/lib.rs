//! # BytePack RLE
//!
//! Run-length encoding with two framings, selected by the byte-frequency
//! entropy of the input:
//!
//! - **Simple** (entropy ≥ 0.5): headerless; runs of three or more bytes
//!   become `0xFF, length, value`, everything else is literal with `0xFF`
//!   escaped as `0xFF 0x00`.
//! - **Enhanced** (entropy < 0.5): a `0xE1` magic followed by run groups
//!   and literal groups with seven-bit lengths.
//!
//! The selection is recorded implicitly in the output (the enhanced
//! framing's leading byte), so the decoder self-identifies from the bytes
//! alone.
//!
//! ## Example
//!
//! ```rust
//! use bytepack_core::{Codec, CompressionConfig};
//! use bytepack_rle::RleCodec;
//!
//! let mut codec = RleCodec::new();
//! let config = CompressionConfig::default();
//! let compressed = codec.compress(&[0x41; 100], &config).unwrap();
//! assert!(compressed.data.len() < 100);
//! let restored = codec.decompress(&compressed.data, &config).unwrap();
//! assert_eq!(restored.data, vec![0x41; 100]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod enhanced;
mod simple;

use std::time::Instant;

use bytepack_core::error::{CodecError, Result};
use bytepack_core::{Codec, CodecInfo, CompressionConfig, CompressionOutput, CompressionStats, Crc32};
use log::info;

/// Entropy threshold below which the enhanced framing is selected.
const ENHANCED_THRESHOLD: f64 = 0.5;

/// Leading byte sequences owned by other codecs in the engine.
///
/// The simple framing has no magic of its own, so its encoder re-frames a
/// colliding first byte and its decoder rejects these prefixes outright
/// instead of silently producing garbage.
pub(crate) fn reserved_prefix(data: &[u8]) -> bool {
    match data.first() {
        Some(&enhanced::MAGIC) | Some(&0x01) | Some(&0x02) => true,
        Some(&b'L') => data.starts_with(b"LZ77"),
        Some(&b'H') => data.starts_with(b"HYBR"),
        _ => false,
    }
}

/// The run-length encoding codec.
#[derive(Debug, Default)]
pub struct RleCodec;

impl RleCodec {
    /// Create a new RLE codec instance.
    pub fn new() -> Self {
        Self
    }
}

impl Codec for RleCodec {
    fn info(&self) -> CodecInfo {
        CodecInfo {
            name: "rle",
            description: "Run-length encoding, efficient for data with many consecutive identical bytes",
            supports_parallel: false,
            min_block_size: 1024,
        }
    }

    fn compress(&mut self, input: &[u8], config: &CompressionConfig) -> Result<CompressionOutput> {
        if input.is_empty() {
            return Err(CodecError::EmptyInput);
        }

        let mut stats = CompressionStats {
            original_size: input.len(),
            ..Default::default()
        };
        if config.verify_integrity {
            stats.checksum = Crc32::compute(input);
        }

        let start = Instant::now();
        let entropy = shannon_entropy(input);
        let data = if entropy < ENHANCED_THRESHOLD {
            enhanced::encode(input)
        } else {
            simple::encode(input)
        };
        stats.compression_time_ms = start.elapsed().as_secs_f64() * 1000.0;

        stats.compressed_size = data.len();
        stats.compression_ratio = data.len() as f64 / input.len() as f64;

        if config.verbose {
            info!(
                "rle: {} -> {} bytes ({:.1}%, entropy {:.3})",
                input.len(),
                data.len(),
                stats.compression_ratio * 100.0,
                entropy
            );
        }

        Ok(CompressionOutput { data, stats })
    }

    fn decompress(
        &mut self,
        input: &[u8],
        config: &CompressionConfig,
    ) -> Result<CompressionOutput> {
        if input.is_empty() {
            return Err(CodecError::EmptyInput);
        }

        let start = Instant::now();
        let data = if input[0] == enhanced::MAGIC {
            enhanced::decode(input)?
        } else if reserved_prefix(input) {
            return Err(CodecError::bad_magic(
                vec![enhanced::MAGIC],
                input.iter().take(4).copied().collect::<Vec<u8>>(),
            ));
        } else {
            simple::decode(input)?
        };

        let mut stats = CompressionStats {
            original_size: data.len(),
            compressed_size: input.len(),
            compression_ratio: input.len() as f64 / data.len() as f64,
            decompression_time_ms: start.elapsed().as_secs_f64() * 1000.0,
            ..Default::default()
        };
        if config.verify_integrity {
            stats.checksum = Crc32::compute(&data);
        }

        Ok(CompressionOutput { data, stats })
    }

    fn estimate_ratio(&self, input: &[u8]) -> f64 {
        if input.is_empty() {
            return 1.0;
        }

        let mut runs = 1usize;
        for i in 1..input.len() {
            if input[i] != input[i - 1] {
                runs += 1;
            }
        }

        // Each run costs roughly two to three bytes.
        (runs as f64 * 2.5 / input.len() as f64).min(1.0)
    }
}

fn shannon_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let mut counts = [0u64; 256];
    for &byte in data {
        counts[byte as usize] += 1;
    }

    let size = data.len() as f64;
    let mut entropy = 0.0;
    for &count in counts.iter().filter(|&&c| c > 0) {
        let p = count as f64 / size;
        entropy -= p * p.log2();
    }

    entropy / 8.0
}
