//! Error types for BytePack codec operations.
//!
//! Every failure a codec can surface is classified into exactly one of the
//! variants below. Codecs never retry internally; a failure is returned as
//! the `Err` arm of [`Result`] and the caller decides whether to surface
//! it, retry with a different codec, or abort.

use thiserror::Error;

/// The error type shared by all BytePack codecs.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Compress or decompress was called with zero-length input.
    #[error("input is empty")]
    EmptyInput,

    /// A decoder was asked to decode bytes whose leading bytes do not
    /// match its own frame format.
    #[error("bad magic: expected {expected:02x?}, found {found:02x?}")]
    BadMagic {
        /// Magic bytes the decoder expected.
        expected: Vec<u8>,
        /// Leading bytes actually found.
        found: Vec<u8>,
    },

    /// A declared length (tree size, block size, token count, run length)
    /// extends beyond the end of the buffer.
    #[error("truncated frame: {message}")]
    TruncatedFrame {
        /// Description of the truncation.
        message: String,
    },

    /// Internal inconsistency in an otherwise well-framed stream: a bad
    /// RLE escape, an LZ77 distance exceeding the output produced so far,
    /// a block-size mismatch after decompression, and the like.
    #[error("corrupt stream: {message}")]
    CorruptStream {
        /// Description of the inconsistency.
        message: String,
    },

    /// The bit reader was exhausted before all required bits were consumed.
    #[error("unexpected end of bit stream at bit {position}")]
    UnexpectedEndOfStream {
        /// Bit position at which the stream ran out.
        position: u64,
    },

    /// A computed Huffman code length exceeds the 32-bit code limit.
    #[error("huffman code length {length} exceeds 32 bits")]
    HuffmanOverflow {
        /// The offending code length.
        length: u32,
    },

    /// A registry lookup by codec name failed.
    #[error("unknown codec: {name}")]
    UnknownCodec {
        /// The name that was looked up.
        name: String,
    },
}

/// Result type alias for BytePack operations.
pub type Result<T> = std::result::Result<T, CodecError>;

impl CodecError {
    /// Create a bad magic error.
    pub fn bad_magic(expected: impl Into<Vec<u8>>, found: impl Into<Vec<u8>>) -> Self {
        Self::BadMagic {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create a truncated frame error.
    pub fn truncated(message: impl Into<String>) -> Self {
        Self::TruncatedFrame {
            message: message.into(),
        }
    }

    /// Create a corrupt stream error.
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::CorruptStream {
            message: message.into(),
        }
    }

    /// Create an unknown codec error.
    pub fn unknown_codec(name: impl Into<String>) -> Self {
        Self::UnknownCodec { name: name.into() }
    }

    /// Fold a caller-side context label (e.g. `"block 3"`) into the error.
    ///
    /// Message-bearing variants keep their kind with the label prefixed;
    /// the remaining variants are demoted to [`CodecError::CorruptStream`]
    /// carrying the full rendered error, since outside their originating
    /// frame they describe a corrupt container rather than a bad lookup.
    pub fn with_context(self, context: impl std::fmt::Display) -> Self {
        match self {
            Self::TruncatedFrame { message } => Self::TruncatedFrame {
                message: format!("{context}: {message}"),
            },
            Self::CorruptStream { message } => Self::CorruptStream {
                message: format!("{context}: {message}"),
            },
            other => Self::CorruptStream {
                message: format!("{context}: {other}"),
            },
        }
    }
}
