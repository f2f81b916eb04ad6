//! Scanner module for directory traversal and content digesting.
//!
//! This module provides the I/O stages of the duplicate detection pipeline:
//! - [`walker`]: recursive file discovery with size/pattern filters
//! - [`digest`]: streaming content digests with bounded memory use
//!
//! # Example
//!
//! ```no_run
//! use dupehound::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."), WalkerConfig::default());
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod digest;
pub mod walker;

use std::path::PathBuf;

// Re-export main types
pub use digest::{
    digest_to_hex, Digest, DigestAlgorithm, DigestError, Digester, DEFAULT_CHUNK_SIZE,
};
pub use walker::Walker;

/// Metadata for a discovered regular file.
///
/// Produced by the walker and consumed by size grouping. No content is
/// read to build one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

impl FileRecord {
    /// Create a new file record.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size }
    }
}

/// Configuration for directory walking.
///
/// Controls filtering and walk behavior. Symbolic links are never
/// followed; a symlinked file or directory is skipped outright.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Minimum file size to include (in bytes).
    ///
    /// Defaults to 1, which is the documented exclusion policy for
    /// zero-byte files: they all share one digest and are not useful
    /// duplicate candidates. Raise this to ignore small files entirely.
    pub min_size: u64,

    /// Maximum file size to include (in bytes).
    pub max_size: Option<u64>,

    /// Glob patterns to ignore (gitignore-style), relative to the scan root.
    pub ignore_patterns: Vec<String>,

    /// Skip hidden files and directories (names starting with `.`).
    pub skip_hidden: bool,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            min_size: 1,
            max_size: None,
            ignore_patterns: Vec::new(),
            skip_hidden: false,
        }
    }
}

/// Recoverable errors raised for individual entries during a scan.
///
/// These never abort a scan; the offending entry is dropped and the walk
/// continues. Digest failures from the verify phase are folded in so the
/// scan summary can carry a single error list.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Metadata could not be read for a directory entry.
    #[error("Cannot read metadata for {path}: {source}")]
    Metadata {
        /// Path of the entry
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The walker failed to descend into or read a directory entry.
    #[error("Walk error for {path}: {source}")]
    Walk {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A file could not be digested during content verification.
    #[error(transparent)]
    Digest(#[from] DigestError),
}
