//! Command-line interface definitions for dupehound.
//!
//! A single-purpose tool, so no subcommands: the positional argument is
//! the directory to scan, everything else tunes the pipeline or selects
//! the output format.
//!
//! # Example
//!
//! ```bash
//! # Scan a directory, report to the terminal
//! dupehound ~/Downloads
//!
//! # JSON output for scripting
//! dupehound ~/Downloads --output json
//!
//! # Ignore build artifacts, skip files under 1 KiB
//! dupehound ~/src --ignore 'target/' --min-size 1KiB
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::scanner::DigestAlgorithm;

/// Content-based duplicate file finder.
///
/// dupehound groups files by size, then confirms duplicates by streaming
/// content digests, and reports groups of byte-identical files.
#[derive(Debug, Parser)]
#[command(name = "dupehound")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan for duplicates
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Output format (text for humans, json/csv for scripting)
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Minimum file size to consider (e.g., 1KB, 1MiB)
    ///
    /// Defaults to 1 byte, which excludes zero-byte files: they all share
    /// one digest and are not useful duplicate candidates.
    #[arg(long, value_name = "SIZE", default_value = "1", value_parser = parse_size)]
    pub min_size: u64,

    /// Maximum file size to consider (e.g., 1GB)
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub max_size: Option<u64>,

    /// Glob patterns to ignore (can be specified multiple times)
    #[arg(short, long = "ignore", value_name = "PATTERN")]
    pub ignore_patterns: Vec<String>,

    /// Skip hidden files and directories (starting with .)
    #[arg(long)]
    pub skip_hidden: bool,

    /// Digest algorithm for content verification
    #[arg(long, value_enum, default_value = "blake3")]
    pub algorithm: Algorithm,

    /// Read chunk size for streaming digests (e.g., 8192, 64KiB)
    #[arg(long, value_name = "SIZE", default_value = "8192", value_parser = parse_size)]
    pub chunk_size: u64,

    /// Number of I/O threads for digesting (default: 4)
    ///
    /// Lower values reduce disk thrashing on HDDs.
    #[arg(long, value_name = "N", default_value = "4")]
    pub io_threads: usize,

    /// Increase verbosity level (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress output and all logging except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report
    Text,
    /// JSON output for scripting
    Json,
    /// CSV output for spreadsheets
    Csv,
}

/// Digest algorithm choice, mirrored into [`DigestAlgorithm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    /// BLAKE3 (fast, default)
    Blake3,
    /// SHA-256
    Sha256,
}

impl From<Algorithm> for DigestAlgorithm {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Blake3 => DigestAlgorithm::Blake3,
            Algorithm::Sha256 => DigestAlgorithm::Sha256,
        }
    }
}

/// Parse a human-readable size string into bytes.
///
/// Plain numbers are bytes; `KB`/`MB`/`GB` are decimal and `KiB`/`MiB`/
/// `GiB` binary, as parsed by [`bytesize`].
///
/// # Errors
///
/// Returns an error message if the string is not a valid size.
pub fn parse_size(s: &str) -> Result<u64, String> {
    s.trim()
        .parse::<bytesize::ByteSize>()
        .map(|size| size.as_u64())
        .map_err(|e| e.to_string())
}
