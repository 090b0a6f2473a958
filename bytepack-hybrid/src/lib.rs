//! # BytePack Hybrid
//!
//! The adaptive composition codec. Input is byte-differenced, partitioned
//! into blocks, and each block is analyzed (entropy, local entropy,
//! trigram repetition) and routed to the base codec its profile suits:
//! low entropy to RLE, high repetition to LZ77, near-uniform randomness to
//! Huffman. Blocks with no clear profile run a tournament of all three and
//! keep the smallest successful output.
//!
//! Frame:
//!
//! ```text
//! "HYBR"                        4 bytes
//! block_count_be32              4 bytes
//! per block:
//!   block_type                  1 byte
//!   original_size_be32          4 bytes
//!   compressed_size_be32        4 bytes
//!   payload                     compressed_size bytes
//! ```
//!
//! The block type tag always names the codec whose decoder accepts the
//! payload: tournament blocks are tagged with the winning codec, and a
//! block no codec managed to shrink is stored raw under the `Verbatim`
//! tag. Decoding dispatches each block by tag, checks the declared
//! original size, concatenates, and reverses the byte differencing.
//!
//! ## Example
//!
//! ```rust
//! use bytepack_core::{Codec, CompressionConfig};
//! use bytepack_hybrid::HybridCodec;
//!
//! let mut codec = HybridCodec::new();
//! let config = CompressionConfig::default();
//! let input = vec![0u8; 10_000];
//! let compressed = codec.compress(&input, &config).unwrap();
//! assert!(compressed.data.starts_with(b"HYBR"));
//! let restored = codec.decompress(&compressed.data, &config).unwrap();
//! assert_eq!(restored.data, input);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod analysis;

use std::time::Instant;

use bytepack_core::error::{CodecError, Result};
use bytepack_core::{Codec, CodecInfo, CompressionConfig, CompressionOutput, CompressionStats, Crc32};
use bytepack_huffman::HuffmanCodec;
use bytepack_lz77::Lz77Codec;
use bytepack_rle::RleCodec;
use log::{debug, info};

pub use analysis::{BlockKind, BlockProfile};

/// Frame signature.
const MAGIC: &[u8; 4] = b"HYBR";

/// Per-block header: type tag, original size, compressed size.
const BLOCK_HEADER_LEN: usize = 9;

/// Smallest block the partitioner produces.
const MIN_BLOCK_SIZE: usize = 4096;
/// Largest block the partitioner produces.
const MAX_BLOCK_SIZE: usize = 65536;

/// The adaptive hybrid codec.
#[derive(Debug, Default)]
pub struct HybridCodec {
    rle: RleCodec,
    huffman: HuffmanCodec,
    lz77: Lz77Codec,
}

impl HybridCodec {
    /// Create a new hybrid codec instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compress one block, returning the tag to write and the payload.
    ///
    /// The returned tag always names the codec whose decoder accepts the
    /// payload; when the selected codec fails or does not shrink the
    /// block, the block is stored raw under [`BlockKind::Verbatim`].
    fn compress_block(
        &mut self,
        block: &[u8],
        kind: BlockKind,
        config: &CompressionConfig,
    ) -> (BlockKind, Vec<u8>) {
        let attempt = match kind {
            BlockKind::LowEntropy => self
                .rle
                .compress(block, config)
                .ok()
                .map(|out| (BlockKind::LowEntropy, out.data)),
            BlockKind::HighRepetition => self
                .lz77
                .compress(block, config)
                .ok()
                .map(|out| (BlockKind::HighRepetition, out.data)),
            BlockKind::Random => self
                .huffman
                .compress(block, config)
                .ok()
                .map(|out| (BlockKind::Random, out.data)),
            BlockKind::Mixed => self.run_tournament(block, config),
            BlockKind::Verbatim => None,
        };

        match attempt {
            Some((kind, data)) if data.len() < block.len() => (kind, data),
            _ => (BlockKind::Verbatim, block.to_vec()),
        }
    }

    /// Run every base codec on the block and keep the smallest successful
    /// output. Ties resolve RLE, then LZ77, then Huffman.
    fn run_tournament(
        &mut self,
        block: &[u8],
        config: &CompressionConfig,
    ) -> Option<(BlockKind, Vec<u8>)> {
        let rle = self.rle.compress(block, config).ok().map(|out| out.data);
        let lz77 = self.lz77.compress(block, config).ok().map(|out| out.data);
        let huffman = self.huffman.compress(block, config).ok().map(|out| out.data);

        let mut best: Option<(BlockKind, Vec<u8>)> = None;
        for (kind, data) in [
            (BlockKind::LowEntropy, rle),
            (BlockKind::HighRepetition, lz77),
            (BlockKind::Random, huffman),
        ] {
            if let Some(data) = data {
                let better = match &best {
                    Some((_, current)) => data.len() < current.len(),
                    None => true,
                };
                if better {
                    best = Some((kind, data));
                }
            }
        }
        best
    }

    fn decompress_block(
        &mut self,
        payload: &[u8],
        kind: BlockKind,
        config: &CompressionConfig,
    ) -> Result<Vec<u8>> {
        match kind {
            BlockKind::LowEntropy => self.rle.decompress(payload, config).map(|out| out.data),
            BlockKind::HighRepetition => self.lz77.decompress(payload, config).map(|out| out.data),
            BlockKind::Random | BlockKind::Mixed => {
                self.huffman.decompress(payload, config).map(|out| out.data)
            }
            BlockKind::Verbatim => Ok(payload.to_vec()),
        }
    }
}

/// Byte differencing: the first byte passes unchanged, every later byte is
/// replaced by its difference from the previous input byte, mod 256.
fn delta_encode(input: &[u8]) -> Vec<u8> {
    if input.len() < 2 {
        return input.to_vec();
    }

    let mut output = Vec::with_capacity(input.len());
    output.push(input[0]);
    for i in 1..input.len() {
        output.push(input[i].wrapping_sub(input[i - 1]));
    }
    output
}

/// Exact inverse of [`delta_encode`].
fn delta_decode(input: &[u8]) -> Vec<u8> {
    if input.len() < 2 {
        return input.to_vec();
    }

    let mut output = Vec::with_capacity(input.len());
    let mut previous = input[0];
    output.push(previous);
    for &diff in &input[1..] {
        previous = previous.wrapping_add(diff);
        output.push(previous);
    }
    output
}

impl Codec for HybridCodec {
    fn info(&self) -> CodecInfo {
        CodecInfo {
            name: "hybrid",
            description: "Adaptive compression routing each block to RLE, LZ77 or Huffman by its statistical profile",
            supports_parallel: true,
            min_block_size: 8192,
        }
    }

    fn compress(&mut self, input: &[u8], config: &CompressionConfig) -> Result<CompressionOutput> {
        if input.is_empty() {
            return Err(CodecError::EmptyInput);
        }

        let mut stats = CompressionStats {
            original_size: input.len(),
            threads_used: config.num_threads,
            ..Default::default()
        };
        if config.verify_integrity {
            stats.checksum = Crc32::compute(input);
        }

        let start = Instant::now();

        let preprocessed = delta_encode(input);
        let block_size = self.optimal_block_size(input.len());
        let blocks = analysis::analyze(&preprocessed, block_size);

        let mut output = Vec::with_capacity(input.len());
        output.extend_from_slice(MAGIC);
        output.extend_from_slice(&(blocks.len() as u32).to_be_bytes());

        let mut kind_counts = [0usize; 5];
        for profile in &blocks {
            let block = &preprocessed[profile.start..profile.start + profile.len];
            let (kind, payload) = self.compress_block(block, profile.kind, config);
            kind_counts[kind as usize] += 1;

            debug!(
                "hybrid block @{}: {} bytes, entropy {:.3}, repetition {:.3} -> {:?} ({} bytes)",
                profile.start,
                profile.len,
                profile.entropy,
                profile.repetition,
                kind,
                payload.len()
            );

            output.push(kind as u8);
            output.extend_from_slice(&(profile.len as u32).to_be_bytes());
            output.extend_from_slice(&(payload.len() as u32).to_be_bytes());
            output.extend_from_slice(&payload);
        }

        stats.compression_time_ms = start.elapsed().as_secs_f64() * 1000.0;
        stats.compressed_size = output.len();
        stats.compression_ratio = output.len() as f64 / input.len() as f64;

        if config.verbose {
            info!(
                "hybrid: {} -> {} bytes ({:.1}%, {} blocks: {} rle, {} lz77, {} huffman, {} verbatim)",
                input.len(),
                output.len(),
                stats.compression_ratio * 100.0,
                blocks.len(),
                kind_counts[BlockKind::LowEntropy as usize],
                kind_counts[BlockKind::HighRepetition as usize],
                kind_counts[BlockKind::Random as usize] + kind_counts[BlockKind::Mixed as usize],
                kind_counts[BlockKind::Verbatim as usize],
            );
        }

        Ok(CompressionOutput {
            data: output,
            stats,
        })
    }

    fn decompress(
        &mut self,
        input: &[u8],
        config: &CompressionConfig,
    ) -> Result<CompressionOutput> {
        if input.is_empty() {
            return Err(CodecError::EmptyInput);
        }
        if input.len() < 4 || &input[..4] != MAGIC {
            return Err(CodecError::bad_magic(
                MAGIC.to_vec(),
                input.iter().take(4).copied().collect::<Vec<u8>>(),
            ));
        }
        if input.len() < 8 {
            return Err(CodecError::truncated("block count missing"));
        }

        let start = Instant::now();
        let block_count = u32::from_be_bytes([input[4], input[5], input[6], input[7]]);

        let mut preprocessed = Vec::with_capacity(input.len() * 2);
        let mut offset = 8;

        for index in 0..block_count {
            if offset + BLOCK_HEADER_LEN > input.len() {
                return Err(CodecError::truncated(format!(
                    "block {index} header incomplete"
                )));
            }

            let tag = input[offset];
            let kind = BlockKind::from_tag(tag).ok_or_else(|| {
                CodecError::corrupt(format!("block {index}: unknown block type {tag}"))
            })?;
            let original_size = u32::from_be_bytes([
                input[offset + 1],
                input[offset + 2],
                input[offset + 3],
                input[offset + 4],
            ]) as usize;
            let compressed_size = u32::from_be_bytes([
                input[offset + 5],
                input[offset + 6],
                input[offset + 7],
                input[offset + 8],
            ]) as usize;
            offset += BLOCK_HEADER_LEN;

            if offset + compressed_size > input.len() {
                return Err(CodecError::truncated(format!(
                    "block {index} payload extends past end of frame"
                )));
            }
            let payload = &input[offset..offset + compressed_size];
            offset += compressed_size;

            let block = self
                .decompress_block(payload, kind, config)
                .map_err(|err| err.with_context(format!("block {index}")))?;

            if block.len() != original_size {
                return Err(CodecError::corrupt(format!(
                    "block {index}: decompressed to {} bytes, header declares {original_size}",
                    block.len()
                )));
            }

            preprocessed.extend_from_slice(&block);
        }

        let data = delta_decode(&preprocessed);

        let mut stats = CompressionStats {
            original_size: data.len(),
            compressed_size: input.len(),
            compression_ratio: input.len() as f64 / data.len() as f64,
            decompression_time_ms: start.elapsed().as_secs_f64() * 1000.0,
            threads_used: config.num_threads,
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

        let entropy = analysis::shannon_entropy(input);
        let repetition = analysis::repetition_score(input);

        if entropy < 0.3 {
            0.2
        } else if repetition > 0.6 {
            0.4
        } else {
            0.6
        }
    }

    fn optimal_block_size(&self, input_size: usize) -> usize {
        if input_size < 16384 {
            MIN_BLOCK_SIZE.max(input_size / 4)
        } else if input_size < 1048576 {
            16384
        } else {
            MAX_BLOCK_SIZE.min(input_size / 64)
        }
    }
}
