//! Shared configuration, statistics and result types.

/// Options recognized by every codec.
///
/// No option changes any on-the-wire format; a stream compressed under one
/// configuration decompresses under any other.
#[derive(Debug, Clone)]
pub struct CompressionConfig {
    /// Target block size hint for the hybrid codec, before adaptive
    /// sizing. Default 64 KiB.
    pub block_size: usize,
    /// Advisory thread count, recorded in stats. The engine is
    /// single-threaded; no codec currently parallelizes.
    pub num_threads: usize,
    /// When true (the default), the CRC-32 of the uncompressed data is
    /// recorded in the stats on both legs.
    pub verify_integrity: bool,
    /// Emit human-readable progress through the `log` facade.
    pub verbose: bool,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            block_size: 64 * 1024,
            num_threads: 1,
            verify_integrity: true,
            verbose: false,
        }
    }
}

/// Statistics for one compress or decompress operation.
///
/// Filled in by the codec that owns the operation; read-only thereafter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionStats {
    /// Size of the uncompressed data in bytes.
    pub original_size: usize,
    /// Size of the compressed data in bytes.
    pub compressed_size: usize,
    /// `compressed_size / original_size`. Undefined when the original is
    /// empty, which the codec boundary rejects.
    pub compression_ratio: f64,
    /// Wall-clock time of the compression leg, in milliseconds.
    pub compression_time_ms: f64,
    /// Wall-clock time of the decompression leg, in milliseconds.
    pub decompression_time_ms: f64,
    /// CRC-32 of the uncompressed data, when integrity verification is
    /// enabled.
    pub checksum: u32,
    /// Threads used by the operation.
    pub threads_used: usize,
}

impl Default for CompressionStats {
    fn default() -> Self {
        Self {
            original_size: 0,
            compressed_size: 0,
            compression_ratio: 0.0,
            compression_time_ms: 0.0,
            decompression_time_ms: 0.0,
            checksum: 0,
            threads_used: 1,
        }
    }
}

/// The successful outcome of a compress or decompress call.
///
/// Ownership of `data` transfers to the caller.
#[derive(Debug, Clone)]
pub struct CompressionOutput {
    /// The produced bytes (compressed or decompressed).
    pub data: Vec<u8>,
    /// Statistics for the operation that produced `data`.
    pub stats: CompressionStats,
}
