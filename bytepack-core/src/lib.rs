//! # BytePack Core
//!
//! Core building blocks for the BytePack compression engine:
//!
//! - [`bitstream`]: MSB-first bit-level I/O for variable-length codes
//! - [`crc`]: CRC-32 integrity checksum
//! - [`traits`]: the [`Codec`] contract every algorithm satisfies
//! - [`types`]: configuration, statistics and result types
//! - [`error`]: the shared failure taxonomy
//!
//! ## Architecture
//!
//! BytePack is layered:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L4: Front-ends                                          │
//! │     CLI, benchmark command                              │
//! ├─────────────────────────────────────────────────────────┤
//! │ L3: Engine                                              │
//! │     Registry, magic detection, auto decompression       │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Codecs                                              │
//! │     RLE, Huffman, LZ77, adaptive Hybrid                 │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: Core (this crate)                                   │
//! │     BitReader/BitWriter, CRC-32, codec contract         │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use bytepack_core::bitstream::{BitReader, BitWriter};
//! use bytepack_core::crc::Crc32;
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0xAB, 8);
//! let bytes = writer.into_bytes();
//! let mut reader = BitReader::new(&bytes);
//! assert_eq!(reader.read_bits(8).unwrap(), 0xAB);
//!
//! assert_eq!(Crc32::compute(b"Hello, World!"), 0xEC4AC3D0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod bitstream;
pub mod crc;
pub mod error;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use bitstream::{BitReader, BitWriter};
pub use crc::Crc32;
pub use error::{CodecError, Result};
pub use traits::{Codec, CodecInfo};
pub use types::{CompressionConfig, CompressionOutput, CompressionStats};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bitstream::{BitReader, BitWriter};
    pub use crate::crc::Crc32;
    pub use crate::error::{CodecError, Result};
    pub use crate::traits::{Codec, CodecInfo};
    pub use crate::types::{CompressionConfig, CompressionOutput, CompressionStats};
}
