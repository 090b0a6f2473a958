//! BytePack CLI - adaptive lossless compression.
//!
//! A thin front-end over the BytePack engine: compress and decompress
//! files with a named codec (or automatic detection), inspect compressed
//! frames, list the registered codecs, and benchmark them against a file.

mod utils;

use bytepack_core::{Codec, CompressionConfig, Crc32};
use bytepack_engine::{registry, CodecFormat};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use utils::{create_progress_bar, format_size};

/// Extension appended to compressed files by default.
const DEFAULT_EXTENSION: &str = "bp";

#[derive(Parser)]
#[command(name = "bytepack")]
#[command(author, version, about = "BytePack - adaptive lossless compression engine")]
#[command(long_about = "
BytePack compresses byte streams with classical codecs (RLE, Huffman,
LZ77) and an adaptive hybrid that routes each block of input to the codec
its statistics favor.

Examples:
  bytepack compress data.bin
  bytepack compress -a lz77 data.bin archive.bp
  bytepack decompress archive.bp
  bytepack detect archive.bp
  bytepack info archive.bp
  bytepack bench data.bin
  bytepack algorithms
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file
    #[command(alias = "c")]
    Compress {
        /// File to compress
        input: PathBuf,

        /// Output file (defaults to the input with a .bp extension)
        output: Option<PathBuf>,

        /// Codec to use (rle, huffman, lz77, hybrid)
        #[arg(short, long, default_value = "hybrid")]
        algorithm: String,

        /// Block size hint in bytes for the hybrid codec
        #[arg(long)]
        block_size: Option<usize>,

        /// Advisory thread count recorded in the stats
        #[arg(long, default_value_t = 1)]
        threads: usize,

        /// Skip the CRC-32 integrity checksum
        #[arg(long)]
        no_verify: bool,
    },

    /// Decompress a file
    #[command(alias = "d")]
    Decompress {
        /// File to decompress
        input: PathBuf,

        /// Output file (defaults to the input without its .bp extension)
        output: Option<PathBuf>,

        /// Codec to use; detected from the frame when omitted
        #[arg(short, long)]
        algorithm: Option<String>,
    },

    /// Detect which codec produced a compressed file
    Detect {
        /// File to detect
        file: PathBuf,
    },

    /// Show details about a compressed file
    #[command(alias = "i")]
    Info {
        /// File to inspect
        file: PathBuf,
    },

    /// List the registered codecs
    #[command(alias = "list")]
    Algorithms,

    /// Benchmark every codec against a file
    #[command(alias = "b")]
    Bench {
        /// File to benchmark against
        file: PathBuf,

        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.verbose { "info" } else { "warn" }),
    )
    .init();

    let result = match cli.command {
        Commands::Compress {
            input,
            output,
            algorithm,
            block_size,
            threads,
            no_verify,
        } => cmd_compress(
            &input,
            output,
            &algorithm,
            block_size,
            threads,
            no_verify,
            cli.verbose,
        ),
        Commands::Decompress {
            input,
            output,
            algorithm,
        } => cmd_decompress(&input, output, algorithm.as_deref(), cli.verbose),
        Commands::Detect { file } => cmd_detect(&file),
        Commands::Info { file } => cmd_info(&file),
        Commands::Algorithms => cmd_algorithms(),
        Commands::Bench { file, no_progress } => cmd_bench(&file, !no_progress),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn cmd_compress(
    input: &Path,
    output: Option<PathBuf>,
    algorithm: &str,
    block_size: Option<usize>,
    threads: usize,
    no_verify: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let algorithm = algorithm.to_ascii_lowercase();
    let data = std::fs::read(input)?;
    if data.is_empty() {
        return Err("input file is empty".into());
    }

    let mut config = CompressionConfig {
        num_threads: threads,
        verify_integrity: !no_verify,
        verbose,
        ..Default::default()
    };
    if let Some(block_size) = block_size {
        config.block_size = block_size;
    }

    let out = bytepack_engine::compress(&algorithm, &data, &config)?;

    let output = output.unwrap_or_else(|| default_compressed_name(input));
    std::fs::write(&output, &out.data)?;

    println!(
        "{} -> {} ({} -> {}, {:.1}%, {:.1} ms, {})",
        input.display(),
        output.display(),
        format_size(out.stats.original_size as u64),
        format_size(out.stats.compressed_size as u64),
        out.stats.compression_ratio * 100.0,
        out.stats.compression_time_ms,
        algorithm,
    );
    if !no_verify {
        println!("CRC-32: {:08X}", out.stats.checksum);
    }

    Ok(())
}

fn cmd_decompress(
    input: &Path,
    output: Option<PathBuf>,
    algorithm: Option<&str>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read(input)?;
    if data.is_empty() {
        return Err("input file is empty".into());
    }

    let config = CompressionConfig {
        verbose,
        ..Default::default()
    };

    let out = match algorithm {
        Some(name) => bytepack_engine::decompress(&name.to_ascii_lowercase(), &data, &config)?,
        None => bytepack_engine::decompress_auto(&data, &config)?,
    };

    let output = output.unwrap_or_else(|| default_decompressed_name(input));
    std::fs::write(&output, &out.data)?;

    println!(
        "{} -> {} ({} -> {}, {:.1} ms)",
        input.display(),
        output.display(),
        format_size(data.len() as u64),
        format_size(out.data.len() as u64),
        out.stats.decompression_time_ms,
    );

    Ok(())
}

fn cmd_detect(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read(file)?;
    let format = CodecFormat::from_magic(&data);

    println!("File: {}", file.display());
    println!("Format: {format}");
    println!("Codec: {}", format.codec_name());
    println!("Magic bytes: {:02X?}", &data[..data.len().min(8)]);

    Ok(())
}

fn cmd_info(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read(file)?;
    if data.is_empty() {
        return Err("input file is empty".into());
    }

    let format = CodecFormat::from_magic(&data);
    let config = CompressionConfig::default();
    let out = bytepack_engine::decompress_auto(&data, &config)?;

    println!("Compressed File Information");
    println!("===========================");
    println!("File: {}", file.display());
    println!("Format: {format}");
    println!("Compressed size: {}", format_size(data.len() as u64));
    println!("Original size: {}", format_size(out.data.len() as u64));
    println!(
        "Compression ratio: {:.1}%",
        data.len() as f64 / out.data.len() as f64 * 100.0
    );
    println!("CRC-32: {:08X}", out.stats.checksum);

    Ok(())
}

fn cmd_algorithms() -> Result<(), Box<dyn std::error::Error>> {
    println!("Registered codecs:");
    println!();

    for name in registry::list() {
        let codec = registry::get(name)?;
        let info = codec.info();
        println!("  {:<8} {}", info.name, info.description);
        println!(
            "  {:<8} parallel-capable: {}, minimum block: {}",
            "",
            if info.supports_parallel { "yes" } else { "no" },
            format_size(info.min_block_size as u64),
        );
        println!();
    }

    Ok(())
}

fn cmd_bench(file: &Path, progress: bool) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read(file)?;
    if data.is_empty() {
        return Err("input file is empty".into());
    }

    println!(
        "Benchmarking {} ({})",
        file.display(),
        format_size(data.len() as u64)
    );
    println!();

    let names = registry::list();
    let pb = create_progress_bar(names.len() as u64, progress);
    let config = CompressionConfig::default();
    let expected_crc = Crc32::compute(&data);

    let mut rows = Vec::new();
    for name in names {
        pb.set_message(name.to_string());
        let mut codec = registry::get(name)?;

        match codec.compress(&data, &config) {
            Ok(out) => {
                let restored = codec.decompress(&out.data, &config)?;
                if restored.data != data || restored.stats.checksum != expected_crc {
                    return Err(format!("{name}: round-trip verification failed").into());
                }
                rows.push((
                    name,
                    out.stats.compressed_size,
                    out.stats.compression_ratio,
                    out.stats.compression_time_ms,
                    restored.stats.decompression_time_ms,
                ));
            }
            Err(e) => {
                pb.println(format!("  {name}: failed ({e})"));
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    println!(
        "{:<10} {:>12} {:>8} {:>12} {:>12}",
        "codec", "compressed", "ratio", "compress", "decompress"
    );
    for (name, size, ratio, ctime, dtime) in rows {
        println!(
            "{:<10} {:>12} {:>7.1}% {:>10.1}ms {:>10.1}ms",
            name,
            format_size(size as u64),
            ratio * 100.0,
            ctime,
            dtime,
        );
    }

    println!();
    println!("All round trips verified (CRC-32 {expected_crc:08X})");
    Ok(())
}

fn default_compressed_name(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_os_string();
    name.push(".");
    name.push(DEFAULT_EXTENSION);
    PathBuf::from(name)
}

fn default_decompressed_name(input: &Path) -> PathBuf {
    if input.extension().is_some_and(|ext| ext == DEFAULT_EXTENSION) {
        input.with_extension("")
    } else {
        let mut name = input.as_os_str().to_os_string();
        name.push(".out");
        PathBuf::from(name)
    }
}
