//! Streaming content digests.
//!
//! # Overview
//!
//! This module provides the [`Digester`] struct for fingerprinting file
//! content. Files are read in fixed-size chunks and fed incrementally into
//! the digest state, so memory use is bounded by the chunk size no matter
//! how large the file is — a multi-gigabyte file costs the same few
//! kilobytes of buffer as a small one.
//!
//! Two algorithms are supported, both producing 32-byte digests:
//! BLAKE3 (the default) and SHA-256. Collision resistance far exceeds what
//! content grouping needs; the choice is about throughput and ecosystem
//! compatibility, not security.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use sha2::Digest as _;

/// Fixed-length content digest (32 bytes for both supported algorithms).
pub type Digest = [u8; 32];

/// Default read chunk size in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// Digest algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DigestAlgorithm {
    /// BLAKE3 - fast, parallel-friendly, 32-byte output.
    #[default]
    Blake3,
    /// SHA-256 - widely supported, 32-byte output.
    Sha256,
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestAlgorithm::Blake3 => write!(f, "blake3"),
            DigestAlgorithm::Sha256 => write!(f, "sha256"),
        }
    }
}

/// Errors that can occur while digesting a file.
#[derive(thiserror::Error, Debug)]
pub enum DigestError {
    /// The file disappeared between discovery and digesting.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl DigestError {
    fn from_io(path: &Path, error: std::io::Error) -> Self {
        use std::io::ErrorKind;

        match error.kind() {
            ErrorKind::NotFound => DigestError::NotFound(path.to_path_buf()),
            ErrorKind::PermissionDenied => DigestError::PermissionDenied(path.to_path_buf()),
            _ => DigestError::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

/// Streaming file digester.
///
/// Cheap to construct and stateless between files; a single instance can
/// be shared across threads.
#[derive(Debug, Clone)]
pub struct Digester {
    algorithm: DigestAlgorithm,
    chunk_size: usize,
}

impl Default for Digester {
    fn default() -> Self {
        Self::new(DigestAlgorithm::default(), DEFAULT_CHUNK_SIZE)
    }
}

impl Digester {
    /// Create a digester for the given algorithm and chunk size.
    ///
    /// A zero chunk size is bumped to 1 so the read loop always makes
    /// progress.
    #[must_use]
    pub fn new(algorithm: DigestAlgorithm, chunk_size: usize) -> Self {
        Self {
            algorithm,
            chunk_size: chunk_size.max(1),
        }
    }

    /// The configured algorithm.
    #[must_use]
    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// The configured chunk size in bytes.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Compute the content digest of a file.
    ///
    /// Reads the file in `chunk_size` blocks, feeding each block into the
    /// digest state. The whole file is never held in memory.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError`] if the file cannot be opened or read.
    pub fn digest_file(&self, path: &Path) -> Result<Digest, DigestError> {
        match self.algorithm {
            DigestAlgorithm::Blake3 => {
                let mut state = blake3::Hasher::new();
                self.stream_into(path, |chunk| {
                    state.update(chunk);
                })?;
                Ok(*state.finalize().as_bytes())
            }
            DigestAlgorithm::Sha256 => {
                let mut state = sha2::Sha256::new();
                self.stream_into(path, |chunk| {
                    state.update(chunk);
                })?;
                Ok(state.finalize().into())
            }
        }
    }

    /// Read `path` chunk by chunk, handing each chunk to `update`.
    fn stream_into<F>(&self, path: &Path, mut update: F) -> Result<(), DigestError>
    where
        F: FnMut(&[u8]),
    {
        let mut file = File::open(path).map_err(|e| DigestError::from_io(path, e))?;
        let mut buf = vec![0u8; self.chunk_size];

        loop {
            let n = file
                .read(&mut buf)
                .map_err(|e| DigestError::from_io(path, e))?;
            if n == 0 {
                break;
            }
            update(&buf[..n]);
        }

        Ok(())
    }
}

/// Render a digest as a lowercase hexadecimal string.
#[must_use]
pub fn digest_to_hex(digest: &Digest) -> String {
    use std::fmt::Write;

    let mut hex = String::with_capacity(64);
    for byte in digest {
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(content).unwrap();
        path
    }

    #[test]
    fn test_identical_content_same_digest() {
        let dir = TempDir::new().unwrap();
        let a = write_file(&dir, "a.bin", b"same bytes in both files");
        let b = write_file(&dir, "b.bin", b"same bytes in both files");

        let digester = Digester::default();
        assert_eq!(
            digester.digest_file(&a).unwrap(),
            digester.digest_file(&b).unwrap()
        );
    }

    #[test]
    fn test_different_content_different_digest() {
        let dir = TempDir::new().unwrap();
        let a = write_file(&dir, "a.bin", b"first content, 24 bytes.");
        let b = write_file(&dir, "b.bin", b"other content, 24 bytes.");

        let digester = Digester::default();
        assert_ne!(
            digester.digest_file(&a).unwrap(),
            digester.digest_file(&b).unwrap()
        );
    }

    #[test]
    fn test_chunk_size_does_not_affect_digest() {
        let dir = TempDir::new().unwrap();
        // Deliberately not a multiple of any chunk size used below.
        let content: Vec<u8> = (0..DEFAULT_CHUNK_SIZE * 2 + 5)
            .map(|i| (i % 251) as u8)
            .collect();
        let path = write_file(&dir, "chunked.bin", &content);

        for algorithm in [DigestAlgorithm::Blake3, DigestAlgorithm::Sha256] {
            let whole = Digester::new(algorithm, DEFAULT_CHUNK_SIZE * 4)
                .digest_file(&path)
                .unwrap();
            let tiny = Digester::new(algorithm, 7).digest_file(&path).unwrap();
            assert_eq!(whole, tiny, "digest must be chunking-invariant");
        }
    }

    #[test]
    fn test_sha256_known_vector() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "abc.txt", b"abc");

        let digest = Digester::new(DigestAlgorithm::Sha256, DEFAULT_CHUNK_SIZE)
            .digest_file(&path)
            .unwrap();

        assert_eq!(
            digest_to_hex(&digest),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let digester = Digester::default();
        let err = digester
            .digest_file(Path::new("/definitely/not/here.bin"))
            .unwrap_err();

        assert!(matches!(err, DigestError::NotFound(_)));
    }

    #[test]
    fn test_digest_to_hex() {
        let mut digest = [0u8; 32];
        digest[0] = 0xAB;
        digest[1] = 0xCD;
        digest[31] = 0xEF;

        let hex = digest_to_hex(&digest);
        assert!(hex.starts_with("abcd"));
        assert!(hex.ends_with("ef"));
        assert_eq!(hex.len(), 64);
    }

    #[test]
    fn test_zero_chunk_size_is_clamped() {
        let digester = Digester::new(DigestAlgorithm::Blake3, 0);
        assert_eq!(digester.chunk_size(), 1);
    }
}
