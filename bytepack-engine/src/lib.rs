//! # BytePack Engine
//!
//! The facade over the BytePack codecs: a process-wide registry mapping
//! lowercase codec names to constructors, format detection from leading
//! frame bytes, and convenience one-shots including magic-agnostic auto
//! decompression.
//!
//! ## Example
//!
//! ```rust
//! use bytepack_core::CompressionConfig;
//!
//! let config = CompressionConfig::default();
//! let input = b"an example payload an example payload".to_vec();
//!
//! let compressed = bytepack_engine::compress("hybrid", &input, &config).unwrap();
//! let restored = bytepack_engine::decompress_auto(&compressed.data, &config).unwrap();
//! assert_eq!(restored.data, input);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod detect;
pub mod registry;

use bytepack_core::error::{CodecError, Result};

pub use bytepack_core::{
    Codec, CodecInfo, CompressionConfig, CompressionOutput, CompressionStats, Crc32,
};
pub use bytepack_huffman::HuffmanCodec;
pub use bytepack_hybrid::HybridCodec;
pub use bytepack_lz77::Lz77Codec;
pub use bytepack_rle::RleCodec;
pub use detect::CodecFormat;

/// Compress `input` with the named codec.
pub fn compress(name: &str, input: &[u8], config: &CompressionConfig) -> Result<CompressionOutput> {
    registry::get(name)?.compress(input, config)
}

/// Decompress `input` with the named codec.
pub fn decompress(
    name: &str,
    input: &[u8],
    config: &CompressionConfig,
) -> Result<CompressionOutput> {
    registry::get(name)?.decompress(input, config)
}

/// Decompress `input` without knowing the producing codec.
///
/// Codecs are tried in registry enumeration order until one succeeds;
/// the first success wins. When every codec rejects the stream, the last
/// error is returned.
pub fn decompress_auto(input: &[u8], config: &CompressionConfig) -> Result<CompressionOutput> {
    if input.is_empty() {
        return Err(CodecError::EmptyInput);
    }

    let mut last = CodecError::corrupt("no codec accepted the stream");
    for name in registry::list() {
        let Some(mut codec) = registry::create(name) else {
            continue;
        };
        match codec.decompress(input, config) {
            Ok(output) => return Ok(output),
            Err(err) => last = err,
        }
    }
    Err(last)
}
