//! The codec contract every compression algorithm satisfies.

use crate::error::Result;
use crate::types::{CompressionConfig, CompressionOutput};

/// Static metadata describing a codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecInfo {
    /// Short lowercase ASCII name, as used by the registry.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// Whether the codec could compress blocks in parallel. Reserved
    /// capability flag; no codec currently does.
    pub supports_parallel: bool,
    /// Advisory minimum block size for effective compression.
    pub min_block_size: usize,
}

/// A lossless byte-stream codec.
///
/// Codecs see the whole buffer; there is no streaming interface. A
/// compress or decompress call is a pure function of its inputs, and no
/// codec retains mutable state across calls. Instances may be reused
/// sequentially. The same instance must not be used concurrently, as
/// implementations keep reusable internal buffers (e.g. the LZ77 hash
/// chains).
pub trait Codec {
    /// Static metadata for this codec.
    fn info(&self) -> CodecInfo;

    /// Compress `input`, returning the compressed bytes and statistics.
    ///
    /// Empty input yields [`crate::CodecError::EmptyInput`].
    fn compress(&mut self, input: &[u8], config: &CompressionConfig) -> Result<CompressionOutput>;

    /// Decompress `input`, returning the original bytes and statistics.
    ///
    /// Empty input yields [`crate::CodecError::EmptyInput`]; input not
    /// framed by this codec yields [`crate::CodecError::BadMagic`].
    fn decompress(&mut self, input: &[u8], config: &CompressionConfig)
        -> Result<CompressionOutput>;

    /// Cheaply estimate the compression ratio this codec would achieve on
    /// `input`, without compressing.
    fn estimate_ratio(&self, input: &[u8]) -> f64;

    /// Preferred block size for an input of `input_size` bytes.
    fn optimal_block_size(&self, input_size: usize) -> usize {
        let _ = input_size;
        64 * 1024
    }
}
