//! Duplicate finder: pipeline orchestration and content verification.
//!
//! # Overview
//!
//! [`DuplicateFinder`] runs the full detection pipeline:
//! 1. **Walk** - collect file records from the target directory
//! 2. **Group** - bucket records by size (no I/O, eliminates most files)
//! 3. **Verify** - digest the remaining candidates and confirm groups
//!
//! Only the root path can fail the whole operation, and only before any
//! traversal begins. Every later failure is per-file: the file is dropped,
//! the error is logged and recorded in the [`ScanSummary`], and the scan
//! carries on. Partial results are valid results.
//!
//! # Example
//!
//! ```no_run
//! use dupehound::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default());
//! let (groups, summary) = finder.find_duplicates(Path::new("/some/path")).unwrap();
//!
//! println!("Found {} duplicate groups", groups.len());
//! println!("Reclaimable space: {}", summary.reclaimable_display());
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bytesize::ByteSize;
use rayon::prelude::*;

use crate::progress::ProgressCallback;
use crate::scanner::{
    Digest, DigestAlgorithm, Digester, FileRecord, ScanError, Walker, WalkerConfig,
    DEFAULT_CHUNK_SIZE,
};

use super::groups::{group_by_size, DuplicateGroup, SizeGroups};

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Digest algorithm used for content verification.
    pub algorithm: DigestAlgorithm,
    /// Read chunk size in bytes for streaming digests.
    pub chunk_size: usize,
    /// Number of I/O threads for parallel digesting.
    /// Default is 4 to prevent disk thrashing.
    pub io_threads: usize,
    /// Walker configuration for directory traversal.
    pub walker_config: WalkerConfig,
    /// Optional progress callback.
    pub progress: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("algorithm", &self.algorithm)
            .field("chunk_size", &self.chunk_size)
            .field("io_threads", &self.io_threads)
            .field("walker_config", &self.walker_config)
            .field("progress", &self.progress.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            algorithm: DigestAlgorithm::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            io_threads: 4,
            walker_config: WalkerConfig::default(),
            progress: None,
        }
    }
}

impl FinderConfig {
    /// Set the digest algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the read chunk size for streaming digests.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Set the I/O thread count for parallel digesting.
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Attach a progress callback.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = Some(callback);
        self
    }
}

/// Fatal errors raised before any traversal begins.
///
/// These are the only failures that abort a scan; everything encountered
/// mid-walk or mid-digest is absorbed into the [`ScanSummary`] instead.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The root path does not exist.
    #[error("Directory not found: {0}")]
    RootNotFound(PathBuf),

    /// The root path exists but is not a directory.
    #[error("Not a directory: {0}")]
    RootNotADirectory(PathBuf),

    /// The root directory cannot be read.
    #[error("Permission denied: {0}")]
    RootPermissionDenied(PathBuf),

    /// The root path could not be accessed for another reason.
    #[error("Cannot access {path}: {source}")]
    RootInaccessible {
        /// The root path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Total number of files that passed the walker's filters
    pub total_files: usize,
    /// Total size of those files in bytes
    pub total_size: u64,
    /// Number of zero-byte records discarded by grouping
    pub empty_files: usize,
    /// Number of files eliminated by size grouping (unique sizes)
    pub eliminated_by_size: usize,
    /// Number of files that entered content verification
    pub candidate_files: usize,
    /// Number of files actually digested
    pub files_digested: usize,
    /// Number of files that failed to digest
    pub digest_failures: usize,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Number of redundant copies across all groups (originals excluded)
    pub duplicate_files: usize,
    /// Bytes reclaimable by removing all copies but one per group
    pub reclaimable_space: u64,
    /// Duration of the entire scan
    pub scan_duration: std::time::Duration,
    /// Non-fatal errors absorbed during the scan
    pub errors: Vec<ScanError>,
}

impl ScanSummary {
    /// Whether any per-file error was absorbed during the scan.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Format reclaimable space as a human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize::b(self.reclaimable_space).to_string()
    }

    /// Format total scanned size as a human-readable string.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        ByteSize::b(self.total_size).to_string()
    }
}

/// Duplicate finder that orchestrates the detection pipeline.
///
/// Holds no state between calls: each [`find_duplicates`] invocation
/// walks, groups, and verifies from scratch.
///
/// [`find_duplicates`]: DuplicateFinder::find_duplicates
pub struct DuplicateFinder {
    config: FinderConfig,
    digester: Digester,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let digester = Digester::new(config.algorithm, config.chunk_size);
        Self { config, digester }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Find all duplicate files under the given root directory.
    ///
    /// Returns the confirmed duplicate groups in deterministic order
    /// (ascending size, then first-seen digest within each size) along
    /// with summary statistics.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError`] only for root-path failures detected
    /// before traversal: missing root, root not a directory, or root
    /// unreadable.
    pub fn find_duplicates(
        &self,
        root: &Path,
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        let start = std::time::Instant::now();

        validate_root(root)?;

        log::info!(
            "Scanning {} for duplicates ({} digest, {} byte chunks)",
            root.display(),
            self.digester.algorithm(),
            self.digester.chunk_size()
        );

        let mut summary = ScanSummary::default();

        // Walk phase: metadata only, no content reads.
        if let Some(ref callback) = self.config.progress {
            callback.on_phase_start("walk", 0);
        }

        let walker = Walker::new(root, self.config.walker_config.clone());
        let mut records = Vec::new();
        for result in walker.walk() {
            match result {
                Ok(record) => {
                    if let Some(ref callback) = self.config.progress {
                        callback
                            .on_progress(records.len() + 1, record.path.to_string_lossy().as_ref());
                    }
                    records.push(record);
                }
                Err(e) => summary.errors.push(e),
            }
        }

        if let Some(ref callback) = self.config.progress {
            callback.on_phase_end("walk");
        }

        // Group phase: pure in-memory bucketing.
        let (size_groups, grouping) = group_by_size(records);
        summary.total_files = grouping.total_files;
        summary.total_size = grouping.total_size;
        summary.empty_files = grouping.empty_files;
        summary.eliminated_by_size = grouping.eliminated_unique;
        summary.candidate_files = grouping.candidate_files;

        if size_groups.is_empty() {
            log::info!("No size bucket holds more than one file, scan complete");
            summary.scan_duration = start.elapsed();
            return Ok((Vec::new(), summary));
        }

        // Verify phase: digest candidates with bounded parallelism.
        let groups = self.verify_groups(size_groups, &mut summary);

        summary.duplicate_groups = groups.len();
        summary.duplicate_files = groups.iter().map(DuplicateGroup::duplicate_count).sum();
        summary.reclaimable_space = groups.iter().map(DuplicateGroup::wasted_space).sum();
        summary.scan_duration = start.elapsed();

        log::info!(
            "Scan complete: {} duplicate groups, {} redundant files, {} reclaimable",
            summary.duplicate_groups,
            summary.duplicate_files,
            summary.reclaimable_display()
        );

        Ok((groups, summary))
    }

    /// Digest every candidate and confirm duplicate groups.
    ///
    /// Size buckets are processed in ascending size order; files within a
    /// bucket are digested in parallel but collected back in input order,
    /// so the emitted groups are stable for identical input.
    fn verify_groups(&self, size_groups: SizeGroups, summary: &mut ScanSummary) -> Vec<DuplicateGroup> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.io_threads)
            .build()
            .unwrap_or_else(|_| {
                log::warn!(
                    "Failed to create custom thread pool, using global pool with {} threads",
                    rayon::current_num_threads()
                );
                rayon::ThreadPoolBuilder::new().build().unwrap()
            });

        if let Some(ref callback) = self.config.progress {
            callback.on_phase_start("digest", summary.candidate_files);
        }

        let completed = AtomicUsize::new(0);
        let mut groups = Vec::new();

        for (size, bucket) in size_groups {
            log::debug!("Verifying {} files of {} bytes", bucket.len(), size);
            self.verify_bucket(&pool, size, bucket, &completed, summary, &mut groups);
        }

        if let Some(ref callback) = self.config.progress {
            callback.on_phase_end("digest");
        }

        groups
    }

    /// Verify a single size bucket and append its confirmed groups.
    fn verify_bucket(
        &self,
        pool: &rayon::ThreadPool,
        size: u64,
        bucket: Vec<FileRecord>,
        completed: &AtomicUsize,
        summary: &mut ScanSummary,
        groups: &mut Vec<DuplicateGroup>,
    ) {
        // Parallel digesting; collect() preserves input order, which keeps
        // the grouping below deterministic.
        let results: Vec<(FileRecord, Result<Digest, crate::scanner::DigestError>)> =
            pool.install(|| {
                bucket
                    .into_par_iter()
                    .map(|record| {
                        let digest = self.digester.digest_file(&record.path);
                        let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                        if let Some(ref callback) = self.config.progress {
                            callback.on_progress(done, record.path.to_string_lossy().as_ref());
                        }
                        (record, digest)
                    })
                    .collect()
            });

        // Sub-group by digest, keeping first-seen digest order.
        let mut by_digest: Vec<(Digest, Vec<PathBuf>)> = Vec::new();
        let mut index: HashMap<Digest, usize> = HashMap::new();

        for (record, result) in results {
            match result {
                Ok(digest) => {
                    summary.files_digested += 1;
                    match index.get(&digest) {
                        Some(&i) => by_digest[i].1.push(record.path),
                        None => {
                            index.insert(digest, by_digest.len());
                            by_digest.push((digest, vec![record.path]));
                        }
                    }
                }
                Err(e) => {
                    log::warn!("Failed to digest {}: {}", record.path.display(), e);
                    summary.digest_failures += 1;
                    summary.errors.push(ScanError::Digest(e));
                }
            }
        }

        for (digest, paths) in by_digest {
            if paths.len() > 1 {
                log::debug!(
                    "Duplicate group {}: {} files, {} bytes each",
                    crate::scanner::digest_to_hex(&digest),
                    paths.len(),
                    size
                );
                groups.push(DuplicateGroup::new(digest, size, paths));
            }
        }
    }
}

/// Validate the scan root before any traversal begins.
///
/// This is the one fatal check in the pipeline; it distinguishes the
/// three root failure reasons the CLI reports.
fn validate_root(root: &Path) -> Result<(), FinderError> {
    use std::io::ErrorKind;

    let metadata = std::fs::metadata(root).map_err(|e| match e.kind() {
        ErrorKind::NotFound => FinderError::RootNotFound(root.to_path_buf()),
        ErrorKind::PermissionDenied => FinderError::RootPermissionDenied(root.to_path_buf()),
        _ => FinderError::RootInaccessible {
            path: root.to_path_buf(),
            source: e,
        },
    })?;

    if !metadata.is_dir() {
        return Err(FinderError::RootNotADirectory(root.to_path_buf()));
    }

    // Probe readability up front so an unreadable root fails the scan
    // instead of surfacing as a per-entry warning.
    std::fs::read_dir(root).map_err(|e| match e.kind() {
        ErrorKind::PermissionDenied => FinderError::RootPermissionDenied(root.to_path_buf()),
        _ => FinderError::RootInaccessible {
            path: root.to_path_buf(),
            source: e,
        },
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(content).unwrap();
        path
    }

    #[test]
    fn test_find_duplicates_basic() {
        let dir = TempDir::new().unwrap();
        let a = write_file(dir.path(), "a.txt", b"duplicate content");
        let b = write_file(dir.path(), "b.txt", b"duplicate content");
        write_file(dir.path(), "c.txt", b"something else entirely");

        let finder = DuplicateFinder::with_defaults();
        let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].paths, vec![a, b]);
        assert_eq!(groups[0].size, 17);
        assert_eq!(summary.duplicate_groups, 1);
        assert_eq!(summary.duplicate_files, 1);
        assert_eq!(summary.reclaimable_space, 17);
        assert!(!summary.has_errors());
    }

    #[test]
    fn test_same_size_different_content() {
        let dir = TempDir::new().unwrap();
        let a = write_file(dir.path(), "a.txt", b"identical-bytes");
        let b = write_file(dir.path(), "b.txt", b"identical-bytes");
        // Same size as a and b, different content.
        write_file(dir.path(), "c.txt", b"divergent-bytes");

        let finder = DuplicateFinder::with_defaults();
        let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].paths, vec![a, b]);
        // All three shared a size bucket, so all three were digested.
        assert_eq!(summary.files_digested, 3);
    }

    #[test]
    fn test_unique_sizes_never_digested() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "a.txt", b"x");
        write_file(dir.path(), "b.txt", b"xx");
        write_file(dir.path(), "c.txt", b"xxx");

        let finder = DuplicateFinder::with_defaults();
        let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

        assert!(groups.is_empty());
        assert_eq!(summary.total_files, 3);
        assert_eq!(summary.eliminated_by_size, 3);
        // The size pre-filter means no content was ever read.
        assert_eq!(summary.files_digested, 0);
    }

    #[test]
    fn test_zero_byte_files_excluded() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("empty1.txt")).unwrap();
        File::create(dir.path().join("empty2.txt")).unwrap();
        write_file(dir.path(), "a.txt", b"content");
        write_file(dir.path(), "b.txt", b"content");

        let finder = DuplicateFinder::with_defaults();
        let (groups, _) = finder.find_duplicates(dir.path()).unwrap();

        assert_eq!(groups.len(), 1);
        for group in &groups {
            assert!(group.size > 0);
            for path in &group.paths {
                assert_ne!(path.file_name().unwrap(), "empty1.txt");
                assert_ne!(path.file_name().unwrap(), "empty2.txt");
            }
        }
    }

    #[test]
    fn test_duplicates_across_subdirectories() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("nested").join("deeper");
        fs::create_dir_all(&sub).unwrap();

        let a = write_file(dir.path(), "top.bin", b"shared payload");
        let b = write_file(&sub, "bottom.bin", b"shared payload");

        let finder = DuplicateFinder::with_defaults();
        let (groups, _) = finder.find_duplicates(dir.path()).unwrap();

        assert_eq!(groups.len(), 1);
        assert!(groups[0].paths.contains(&a));
        assert!(groups[0].paths.contains(&b));
    }

    #[test]
    fn test_multiple_groups_ordered_by_size() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "big1.bin", b"larger duplicate payload");
        write_file(dir.path(), "big2.bin", b"larger duplicate payload");
        write_file(dir.path(), "small1.bin", b"tiny");
        write_file(dir.path(), "small2.bin", b"tiny");

        let finder = DuplicateFinder::with_defaults();
        let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].size, 4);
        assert_eq!(groups[1].size, 24);
        assert_eq!(summary.duplicate_files, 2);
    }

    #[test]
    fn test_root_not_found() {
        let finder = DuplicateFinder::with_defaults();
        let err = finder
            .find_duplicates(Path::new("/no/such/directory/anywhere"))
            .unwrap_err();

        assert!(matches!(err, FinderError::RootNotFound(_)));
    }

    #[test]
    fn test_root_not_a_directory() {
        let dir = TempDir::new().unwrap();
        let file = write_file(dir.path(), "plain.txt", b"not a dir");

        let finder = DuplicateFinder::with_defaults();
        let err = finder.find_duplicates(&file).unwrap_err();

        assert!(matches!(err, FinderError::RootNotADirectory(_)));
    }

    #[test]
    #[cfg(unix)]
    fn test_root_permission_denied() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        if fs::read_dir(&locked).is_ok() {
            // Running as root: permission bits are not enforced.
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let finder = DuplicateFinder::with_defaults();
        let result = finder.find_duplicates(&locked);

        // Restore so TempDir can clean up.
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(matches!(
            result.unwrap_err(),
            FinderError::RootPermissionDenied(_)
        ));
    }

    #[test]
    #[cfg(unix)]
    fn test_unreadable_file_excluded_from_group() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let a = write_file(dir.path(), "a.bin", b"still comparable");
        let b = write_file(dir.path(), "b.bin", b"still comparable");
        let locked = write_file(dir.path(), "locked.bin", b"cannot read this");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        if File::open(&locked).is_ok() {
            // Running as root: permission bits are not enforced.
            return;
        }

        let finder = DuplicateFinder::with_defaults();
        let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

        // The locked file shares the bucket but drops out at digest time;
        // a and b are still confirmed against each other.
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].paths, vec![a, b]);
        assert_eq!(summary.digest_failures, 1);
        assert!(summary.has_errors());
    }

    #[test]
    fn test_idempotent_on_static_tree() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "a.txt", b"repeated run payload");
        write_file(dir.path(), "b.txt", b"repeated run payload");
        write_file(dir.path(), "c.txt", b"some other payload 1");
        write_file(dir.path(), "d.txt", b"some other payload 1");

        let finder = DuplicateFinder::with_defaults();
        let (first, _) = finder.find_duplicates(dir.path()).unwrap();
        let (second, _) = finder.find_duplicates(dir.path()).unwrap();

        assert_eq!(first.len(), second.len());
        for (x, y) in first.iter().zip(second.iter()) {
            assert_eq!(x.digest, y.digest);
            assert_eq!(x.size, y.size);
            assert_eq!(x.paths, y.paths);
        }
    }

    #[test]
    fn test_sha256_matches_blake3_grouping() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "a.txt", b"algorithm independent");
        write_file(dir.path(), "b.txt", b"algorithm independent");

        for algorithm in [DigestAlgorithm::Blake3, DigestAlgorithm::Sha256] {
            let finder =
                DuplicateFinder::new(FinderConfig::default().with_algorithm(algorithm));
            let (groups, _) = finder.find_duplicates(dir.path()).unwrap();
            assert_eq!(groups.len(), 1, "{algorithm} should confirm the pair");
            assert_eq!(groups[0].len(), 2);
        }
    }

    #[test]
    fn test_empty_directory() {
        let dir = TempDir::new().unwrap();

        let finder = DuplicateFinder::with_defaults();
        let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

        assert!(groups.is_empty());
        assert_eq!(summary.total_files, 0);
        assert_eq!(summary.files_digested, 0);
    }

    #[test]
    fn test_finder_config_builders() {
        let config = FinderConfig::default()
            .with_algorithm(DigestAlgorithm::Sha256)
            .with_chunk_size(4096)
            .with_io_threads(2);

        assert_eq!(config.algorithm, DigestAlgorithm::Sha256);
        assert_eq!(config.chunk_size, 4096);
        assert_eq!(config.io_threads, 2);

        // Degenerate values are clamped rather than rejected.
        let config = FinderConfig::default().with_chunk_size(0).with_io_threads(0);
        assert_eq!(config.chunk_size, 1);
        assert_eq!(config.io_threads, 1);
    }
}
