//! # BytePack LZ77
//!
//! Sliding-window dictionary compression. The parser replaces repeated
//! byte sequences with back-references into the 4 KiB window, found
//! through a hash-chained search over three-byte prefixes.
//!
//! Frame: the ASCII signature `LZ77`, a big-endian token count, then one
//! of two token shapes per entry:
//!
//! - Literal: `0x00, byte`
//! - Back-reference: `0x01, distance_be16, length, next_literal`
//!
//! A back-reference carries the literal that follows the match. When a
//! match runs flush to the end of the input there is no such literal; the
//! encoder stores a zero and the decoder skips the next-literal of the
//! stream's final token when it is zero. The encoder keeps that marker
//! unambiguous by never letting a real trailing `0x00` ride as the final
//! token's next-literal.
//!
//! ## Example
//!
//! ```rust
//! use bytepack_core::{Codec, CompressionConfig};
//! use bytepack_lz77::Lz77Codec;
//!
//! let mut codec = Lz77Codec::new();
//! let config = CompressionConfig::default();
//! let input = b"repetition repetition repetition".to_vec();
//! let compressed = codec.compress(&input, &config).unwrap();
//! let restored = codec.decompress(&compressed.data, &config).unwrap();
//! assert_eq!(restored.data, input);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod matcher;

use std::time::Instant;

use bytepack_core::error::{CodecError, Result};
use bytepack_core::{Codec, CodecInfo, CompressionConfig, CompressionOutput, CompressionStats, Crc32};
use log::info;

use matcher::{MatchFinder, MIN_MATCH};

/// Frame signature.
const MAGIC: &[u8; 4] = b"LZ77";

/// A token produced by the LZ77 parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lz77Token {
    /// A literal byte.
    Literal(u8),
    /// A back-reference into the already-produced output.
    Match {
        /// Distance back into the window, in `[1, 4096]`.
        distance: u16,
        /// Bytes to copy, in `[3, 255]`.
        length: u8,
        /// The literal following the match (zero when the match ends the
        /// stream).
        next: u8,
    },
}

/// The LZ77 dictionary codec.
#[derive(Debug)]
pub struct Lz77Codec {
    finder: MatchFinder,
}

impl Lz77Codec {
    /// Create a new LZ77 codec instance.
    pub fn new() -> Self {
        Self {
            finder: MatchFinder::new(),
        }
    }

    fn tokenize(&mut self, input: &[u8]) -> Vec<Lz77Token> {
        self.finder.reset();

        let n = input.len();
        let mut tokens = Vec::with_capacity(n / 4);
        let mut pos = 0;

        while pos < n {
            // Delayed insertion: the hash at `pos` can be queried before
            // the position references itself.
            if pos >= 2 {
                self.finder.insert(input, pos - 2);
            }

            let emitted = match self.finder.find(input, pos) {
                Some((distance, found)) => {
                    let mut length = found;
                    let mut end = pos + length;

                    let next = if end == n {
                        // End-of-stream marker.
                        Some(0u8)
                    } else if input[end] == 0 && end + 1 == n {
                        // A real trailing NUL would be indistinguishable
                        // from the marker; shorten the match so it travels
                        // in its own token.
                        if length > MIN_MATCH {
                            length -= 1;
                            end -= 1;
                            Some(input[end])
                        } else {
                            None
                        }
                    } else {
                        Some(input[end])
                    };

                    match next {
                        Some(next) => {
                            tokens.push(Lz77Token::Match {
                                distance,
                                length: length as u8,
                                next,
                            });
                            let mut j = 0;
                            while j < length && pos + j + 2 < n {
                                self.finder.insert(input, pos + j);
                                j += 1;
                            }
                            pos += length + 1;
                            true
                        }
                        None => false,
                    }
                }
                None => false,
            };

            if !emitted {
                tokens.push(Lz77Token::Literal(input[pos]));
                pos += 1;
            }
        }

        tokens
    }

    fn encode_tokens(tokens: &[Lz77Token]) -> Vec<u8> {
        let mut output = Vec::with_capacity(8 + tokens.len() * 5);
        output.extend_from_slice(MAGIC);
        output.extend_from_slice(&(tokens.len() as u32).to_be_bytes());

        for token in tokens {
            match *token {
                Lz77Token::Literal(byte) => {
                    output.push(0x00);
                    output.push(byte);
                }
                Lz77Token::Match {
                    distance,
                    length,
                    next,
                } => {
                    output.push(0x01);
                    output.extend_from_slice(&distance.to_be_bytes());
                    output.push(length);
                    output.push(next);
                }
            }
        }

        output
    }

    fn decode(input: &[u8]) -> Result<Vec<u8>> {
        if input.len() < 4 || &input[..4] != MAGIC {
            return Err(CodecError::bad_magic(
                MAGIC.to_vec(),
                input.iter().take(4).copied().collect::<Vec<u8>>(),
            ));
        }
        if input.len() < 8 {
            return Err(CodecError::truncated("token count missing"));
        }

        let token_count = u32::from_be_bytes([input[4], input[5], input[6], input[7]]);
        let mut output = Vec::with_capacity(input.len() * 3);
        let mut offset = 8;

        for index in 0..token_count {
            let Some(&marker) = input.get(offset) else {
                return Err(CodecError::truncated(format!(
                    "token stream ends at token {index} of {token_count}"
                )));
            };
            offset += 1;

            match marker {
                0x00 => {
                    let Some(&byte) = input.get(offset) else {
                        return Err(CodecError::truncated("literal token missing byte"));
                    };
                    offset += 1;
                    output.push(byte);
                }
                0x01 => {
                    if offset + 4 > input.len() {
                        return Err(CodecError::truncated("back-reference token incomplete"));
                    }
                    let distance = u16::from_be_bytes([input[offset], input[offset + 1]]);
                    let length = input[offset + 2];
                    let next = input[offset + 3];
                    offset += 4;

                    if distance == 0 {
                        return Err(CodecError::corrupt("zero back-reference distance"));
                    }
                    if distance as usize > output.len() {
                        return Err(CodecError::corrupt(format!(
                            "distance {} exceeds output length {}",
                            distance,
                            output.len()
                        )));
                    }
                    if (length as usize) < MIN_MATCH {
                        return Err(CodecError::corrupt(format!(
                            "match length {length} below minimum 3"
                        )));
                    }

                    // Self-overlap is allowed: bytes copied may themselves
                    // have been produced by this copy.
                    let start = output.len() - distance as usize;
                    for k in 0..length as usize {
                        let byte = output[start + k];
                        output.push(byte);
                    }

                    let last = index + 1 == token_count;
                    if !(last && next == 0) {
                        output.push(next);
                    }
                }
                other => {
                    return Err(CodecError::corrupt(format!(
                        "invalid token marker {other:#04x}"
                    )));
                }
            }
        }

        Ok(output)
    }
}

impl Default for Lz77Codec {
    fn default() -> Self {
        Self::new()
    }
}

impl Codec for Lz77Codec {
    fn info(&self) -> CodecInfo {
        CodecInfo {
            name: "lz77",
            description: "LZ77 dictionary compression, efficient for data with repeated patterns",
            supports_parallel: false,
            min_block_size: 8192,
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
        let tokens = self.tokenize(input);
        let data = Self::encode_tokens(&tokens);
        stats.compression_time_ms = start.elapsed().as_secs_f64() * 1000.0;

        stats.compressed_size = data.len();
        stats.compression_ratio = data.len() as f64 / input.len() as f64;

        if config.verbose {
            info!(
                "lz77: {} -> {} bytes ({:.1}%, {} tokens)",
                input.len(),
                data.len(),
                stats.compression_ratio * 100.0,
                tokens.len()
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
        let n = input.len();
        if n <= MIN_MATCH {
            return 1.0;
        }

        // Cheap three-byte-prefix scan over a short trailing window.
        let mut matches = 0usize;
        for i in MIN_MATCH..n - 2 {
            let window_start = i.saturating_sub(64);
            for j in window_start..i {
                if input[j..j + 3] == input[i..i + 3] {
                    matches += 1;
                    break;
                }
            }
        }

        (1.0 - 2.5 * matches as f64 / n as f64).max(0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CompressionConfig {
        CompressionConfig::default()
    }

    #[test]
    fn test_abcabcabc_frame_layout() {
        let mut codec = Lz77Codec::new();
        let input = b"abcabcabc";
        let out = codec.compress(input, &config()).unwrap();

        let mut expected = b"LZ77".to_vec();
        expected.extend_from_slice(&4u32.to_be_bytes());
        expected.extend_from_slice(&[0x00, b'a', 0x00, b'b', 0x00, b'c']);
        expected.extend_from_slice(&[0x01, 0x00, 0x03, 0x06, 0x00]);
        assert_eq!(out.data, expected);

        let restored = codec.decompress(&out.data, &config()).unwrap();
        assert_eq!(restored.data, input);
    }

    #[test]
    fn test_self_overlap_run() {
        // distance=1 back-reference expands into a run of the previous byte.
        let mut frame = b"LZ77".to_vec();
        frame.extend_from_slice(&3u32.to_be_bytes());
        frame.extend_from_slice(&[0x00, b'x']);
        frame.extend_from_slice(&[0x01, 0x00, 0x01, 0x08, b'y']);
        frame.extend_from_slice(&[0x00, b'z']);

        let mut codec = Lz77Codec::new();
        let restored = codec.decompress(&frame, &config()).unwrap();
        assert_eq!(restored.data, b"xxxxxxxxxyz");
    }

    #[test]
    fn test_roundtrip_text() {
        let mut codec = Lz77Codec::new();
        let input = b"The quick brown fox jumps over the lazy dog. ".repeat(50);
        let out = codec.compress(&input, &config()).unwrap();
        assert!(out.data.len() < input.len());
        let restored = codec.decompress(&out.data, &config()).unwrap();
        assert_eq!(restored.data, input);
        assert_eq!(restored.stats.checksum, out.stats.checksum);
    }

    #[test]
    fn test_roundtrip_no_repeats() {
        let mut codec = Lz77Codec::new();
        let input: Vec<u8> = (0..=255).collect();
        let out = codec.compress(&input, &config()).unwrap();
        let restored = codec.decompress(&out.data, &config()).unwrap();
        assert_eq!(restored.data, input);
    }

    #[test]
    fn test_roundtrip_all_zeros() {
        // The final match runs flush to the end of input; the end-of-stream
        // marker must not append a spurious byte.
        let mut codec = Lz77Codec::new();
        for len in [1, 2, 3, 4, 5, 20, 100] {
            let input = vec![0u8; len];
            let out = codec.compress(&input, &config()).unwrap();
            let restored = codec.decompress(&out.data, &config()).unwrap();
            assert_eq!(restored.data, input, "length {len}");
        }
    }

    #[test]
    fn test_roundtrip_trailing_zero_after_match() {
        let mut codec = Lz77Codec::new();
        for input in [
            b"abcabcabc\x00".to_vec(),
            b"abcabc\x00".to_vec(),
            b"xyxyxyxyxy\x00\x00".to_vec(),
            b"pattern pattern\x00".to_vec(),
        ] {
            let out = codec.compress(&input, &config()).unwrap();
            let restored = codec.decompress(&out.data, &config()).unwrap();
            assert_eq!(restored.data, input);
        }
    }

    #[test]
    fn test_roundtrip_match_to_eof() {
        let mut codec = Lz77Codec::new();
        let input = b"0123456701234567".to_vec();
        let out = codec.compress(&input, &config()).unwrap();
        let restored = codec.decompress(&out.data, &config()).unwrap();
        assert_eq!(restored.data, input);
    }

    #[test]
    fn test_empty_input_rejected() {
        let mut codec = Lz77Codec::new();
        assert!(matches!(
            codec.compress(&[], &config()),
            Err(CodecError::EmptyInput)
        ));
        assert!(matches!(
            codec.decompress(&[], &config()),
            Err(CodecError::EmptyInput)
        ));
    }

    #[test]
    fn test_bad_magic_rejected() {
        let mut codec = Lz77Codec::new();
        assert!(matches!(
            codec.decompress(b"LZ78\x00\x00\x00\x00", &config()),
            Err(CodecError::BadMagic { .. })
        ));
    }

    #[test]
    fn test_corrupt_back_references_rejected() {
        let mut codec = Lz77Codec::new();

        // Distance exceeding the output produced so far.
        let mut frame = b"LZ77".to_vec();
        frame.extend_from_slice(&1u32.to_be_bytes());
        frame.extend_from_slice(&[0x01, 0x00, 0x05, 0x03, b'a']);
        assert!(matches!(
            codec.decompress(&frame, &config()),
            Err(CodecError::CorruptStream { .. })
        ));

        // Length below the three-byte minimum.
        let mut frame = b"LZ77".to_vec();
        frame.extend_from_slice(&2u32.to_be_bytes());
        frame.extend_from_slice(&[0x00, b'a']);
        frame.extend_from_slice(&[0x01, 0x00, 0x01, 0x02, b'b']);
        assert!(matches!(
            codec.decompress(&frame, &config()),
            Err(CodecError::CorruptStream { .. })
        ));
    }

    #[test]
    fn test_truncated_token_stream_rejected() {
        let mut codec = Lz77Codec::new();
        let mut frame = b"LZ77".to_vec();
        frame.extend_from_slice(&5u32.to_be_bytes());
        frame.extend_from_slice(&[0x00, b'a']);
        assert!(matches!(
            codec.decompress(&frame, &config()),
            Err(CodecError::TruncatedFrame { .. })
        ));
    }

    #[test]
    fn test_deterministic_output() {
        let mut codec = Lz77Codec::new();
        let input = b"deterministic deterministic deterministic".to_vec();
        let first = codec.compress(&input, &config()).unwrap();
        let second = codec.compress(&input, &config()).unwrap();
        assert_eq!(first.data, second.data);
    }

    #[test]
    fn test_estimate_ratio_bounds() {
        let codec = Lz77Codec::new();
        let repetitive = b"abcabcabcabcabcabcabcabc".to_vec();
        let estimate = codec.estimate_ratio(&repetitive);
        assert!((0.1..=1.0).contains(&estimate));
        assert!(estimate < codec.estimate_ratio(&(0..=255).collect::<Vec<u8>>()));
    }
}
