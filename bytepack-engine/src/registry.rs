//! The codec registry: process-wide name-to-constructor map.
//!
//! Codecs are registered under lowercase ASCII names. Enumeration order is
//! fixed at registration and doubles as the trial order for
//! [auto decompression](crate::decompress_auto): most-specific magic
//! first, the magic-less RLE framing last.

use bytepack_core::error::{CodecError, Result};
use bytepack_core::Codec;
use bytepack_huffman::HuffmanCodec;
use bytepack_hybrid::HybridCodec;
use bytepack_lz77::Lz77Codec;
use bytepack_rle::RleCodec;

type Constructor = fn() -> Box<dyn Codec>;

fn new_hybrid() -> Box<dyn Codec> {
    Box::new(HybridCodec::new())
}

fn new_lz77() -> Box<dyn Codec> {
    Box::new(Lz77Codec::new())
}

fn new_huffman() -> Box<dyn Codec> {
    Box::new(HuffmanCodec::new())
}

fn new_rle() -> Box<dyn Codec> {
    Box::new(RleCodec::new())
}

/// Registered codecs, in enumeration order.
const CODECS: &[(&str, Constructor)] = &[
    ("hybrid", new_hybrid),
    ("lz77", new_lz77),
    ("huffman", new_huffman),
    ("rle", new_rle),
];

/// Create a fresh codec instance by name, or `None` for an unknown name.
pub fn create(name: &str) -> Option<Box<dyn Codec>> {
    CODECS
        .iter()
        .find(|(registered, _)| *registered == name)
        .map(|(_, constructor)| constructor())
}

/// [`create`] as a `Result`, raising [`CodecError::UnknownCodec`].
pub fn get(name: &str) -> Result<Box<dyn Codec>> {
    create(name).ok_or_else(|| CodecError::unknown_codec(name))
}

/// Registered codec names, in enumeration order. Stable for the process
/// lifetime.
pub fn list() -> Vec<&'static str> {
    CODECS.iter().map(|(name, _)| *name).collect()
}

/// Whether a codec is registered under `name`.
pub fn is_available(name: &str) -> bool {
    CODECS.iter().any(|(registered, _)| *registered == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_names_resolve() {
        for name in ["rle", "huffman", "lz77", "hybrid"] {
            let codec = create(name).unwrap();
            assert_eq!(codec.info().name, name);
            assert!(is_available(name));
        }
    }

    #[test]
    fn test_unknown_name() {
        assert!(create("lzw").is_none());
        assert!(!is_available("lzw"));
        assert!(matches!(
            get("lzw"),
            Err(CodecError::UnknownCodec { name }) if name == "lzw"
        ));
    }

    #[test]
    fn test_enumeration_order_is_stable() {
        assert_eq!(list(), vec!["hybrid", "lz77", "huffman", "rle"]);
        assert_eq!(list(), list());
    }

    #[test]
    fn test_create_returns_fresh_instances() {
        // Two instances compress independently.
        let config = bytepack_core::CompressionConfig::default();
        let input = vec![0x33; 1000];
        let mut a = create("rle").unwrap();
        let mut b = create("rle").unwrap();
        let out_a = a.compress(&input, &config).unwrap();
        let out_b = b.compress(&input, &config).unwrap();
        assert_eq!(out_a.data, out_b.data);
    }
}
