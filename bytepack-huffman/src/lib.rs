//! # BytePack Huffman
//!
//! Huffman coding with a transmitted code tree. Two frames:
//!
//! - Degenerate single-symbol input: `0x01, value, count_be32`, exactly
//!   six bytes regardless of input length.
//! - Normal: `0x02, tree_size_be16, tree, original_size_be32, bit body`.
//!   The tree is serialized pre-order (`0x01 value` for a leaf, `0x00
//!   left right` for an internal node) and the body concatenates the code
//!   words of every input byte MSB-first, zero-padded in the tail byte.
//!
//! The code tree travels with the data, so decoding needs no side-channel
//! frequency information; the decoder walks the tree bit by bit for
//! exactly `original_size` symbols.
//!
//! ## Example
//!
//! ```rust
//! use bytepack_core::{Codec, CompressionConfig};
//! use bytepack_huffman::HuffmanCodec;
//!
//! let mut codec = HuffmanCodec::new();
//! let config = CompressionConfig::default();
//! let input = b"abracadabra abracadabra abracadabra".to_vec();
//! let compressed = codec.compress(&input, &config).unwrap();
//! let restored = codec.decompress(&compressed.data, &config).unwrap();
//! assert_eq!(restored.data, input);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod tree;

use std::time::Instant;

use bytepack_core::bitstream::{BitReader, BitWriter};
use bytepack_core::error::{CodecError, Result};
use bytepack_core::{Codec, CodecInfo, CompressionConfig, CompressionOutput, CompressionStats, Crc32};
use log::info;

pub use tree::{HuffmanCode, HuffmanNode};

/// Frame tag for the degenerate single-symbol case.
const TAG_SINGLE: u8 = 0x01;
/// Frame tag for the normal tree-plus-body case.
const TAG_NORMAL: u8 = 0x02;

/// The Huffman coding codec.
#[derive(Debug, Default)]
pub struct HuffmanCodec;

impl HuffmanCodec {
    /// Create a new Huffman codec instance.
    pub fn new() -> Self {
        Self
    }

    fn encode(input: &[u8]) -> Result<Vec<u8>> {
        let mut frequencies = [0u64; 256];
        for &byte in input {
            frequencies[byte as usize] += 1;
        }
        let distinct = frequencies.iter().filter(|&&f| f > 0).count();

        if distinct == 1 {
            let mut output = vec![TAG_SINGLE, input[0]];
            output.extend_from_slice(&(input.len() as u32).to_be_bytes());
            return Ok(output);
        }

        let root = tree::build_tree(&frequencies)?;
        let codes = tree::assign_codes(&root)?;

        let mut tree_bytes = Vec::new();
        tree::serialize(&root, &mut tree_bytes);

        let mut output = vec![TAG_NORMAL];
        output.extend_from_slice(&(tree_bytes.len() as u16).to_be_bytes());
        output.extend_from_slice(&tree_bytes);
        output.extend_from_slice(&(input.len() as u32).to_be_bytes());

        let mut writer = BitWriter::with_buffer(output);
        for &byte in input {
            let code = codes[byte as usize];
            writer.write_bits(code.bits, code.length);
        }
        Ok(writer.into_bytes())
    }

    fn decode(input: &[u8]) -> Result<Vec<u8>> {
        match input[0] {
            TAG_SINGLE => {
                if input.len() < 6 {
                    return Err(CodecError::truncated(
                        "single-symbol frame shorter than 6 bytes",
                    ));
                }
                let value = input[1];
                let count = u32::from_be_bytes([input[2], input[3], input[4], input[5]]);
                Ok(vec![value; count as usize])
            }
            TAG_NORMAL => {
                if input.len() < 7 {
                    return Err(CodecError::truncated("huffman frame header incomplete"));
                }
                let tree_size = u16::from_be_bytes([input[1], input[2]]) as usize;
                if 3 + tree_size + 4 > input.len() {
                    return Err(CodecError::truncated("tree size exceeds frame"));
                }

                let (root, consumed) = tree::deserialize(&input[3..3 + tree_size])?;
                if consumed != tree_size {
                    return Err(CodecError::corrupt(format!(
                        "tree occupies {consumed} bytes but header declares {tree_size}"
                    )));
                }

                let size_offset = 3 + tree_size;
                let original_size = u32::from_be_bytes([
                    input[size_offset],
                    input[size_offset + 1],
                    input[size_offset + 2],
                    input[size_offset + 3],
                ]) as usize;

                let mut reader = BitReader::new(&input[size_offset + 4..]);
                let mut output = Vec::with_capacity(original_size);

                for _ in 0..original_size {
                    let mut node = &root;
                    loop {
                        match node {
                            HuffmanNode::Leaf(byte) => {
                                output.push(*byte);
                                break;
                            }
                            HuffmanNode::Internal(left, right) => {
                                node = if reader.read_bits(1)? == 1 {
                                    right.as_ref()
                                } else {
                                    left.as_ref()
                                };
                            }
                        }
                    }
                }

                Ok(output)
            }
            other => Err(CodecError::bad_magic(vec![TAG_NORMAL], vec![other])),
        }
    }
}

impl Codec for HuffmanCodec {
    fn info(&self) -> CodecInfo {
        CodecInfo {
            name: "huffman",
            description: "Huffman coding, optimal prefix codes for skewed symbol distributions",
            supports_parallel: false,
            min_block_size: 4096,
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
        let data = Self::encode(input)?;
        stats.compression_time_ms = start.elapsed().as_secs_f64() * 1000.0;

        stats.compressed_size = data.len();
        stats.compression_ratio = data.len() as f64 / input.len() as f64;

        if config.verbose {
            info!(
                "huffman: {} -> {} bytes ({:.1}%)",
                input.len(),
                data.len(),
                stats.compression_ratio * 100.0
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
        let data = Self::decode(input)?;

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

        let mut counts = [0u64; 256];
        for &byte in input {
            counts[byte as usize] += 1;
        }

        let size = input.len() as f64;
        let mut entropy = 0.0;
        let mut alphabet = 0usize;
        for &count in counts.iter().filter(|&&c| c > 0) {
            let p = count as f64 / size;
            entropy -= p * p.log2();
            alphabet += 1;
        }
        let entropy = entropy / 8.0;

        // Entropy bound plus roughly nine bits of tree overhead per symbol.
        let theoretical_bits = entropy * size * 8.0 + alphabet as f64 * 9.0;
        (theoretical_bits / (size * 8.0)).clamp(0.0, 1.0)
    }
}
