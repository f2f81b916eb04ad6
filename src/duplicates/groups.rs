//! Size-based grouping and duplicate group types.
//!
//! # Overview
//!
//! Size grouping is the cheap first stage of duplicate detection: files
//! with different byte lengths cannot have identical content, so grouping
//! by size eliminates most candidates before any file content is read.
//!
//! # Example
//!
//! ```
//! use dupehound::scanner::FileRecord;
//! use dupehound::duplicates::group_by_size;
//! use std::path::PathBuf;
//!
//! let records = vec![
//!     FileRecord::new(PathBuf::from("/file1.txt"), 1024),
//!     FileRecord::new(PathBuf::from("/file2.txt"), 1024),
//!     FileRecord::new(PathBuf::from("/file3.txt"), 2048),
//! ];
//!
//! // Only groups with 2+ files are candidate duplicates
//! let (groups, stats) = group_by_size(records);
//!
//! assert_eq!(stats.total_files, 3);
//! assert_eq!(stats.candidate_files, 2);  // the two 1024-byte files
//! assert_eq!(groups.len(), 1);
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::scanner::{digest_to_hex, Digest, FileRecord};

/// Files bucketed by exact byte size.
///
/// A `BTreeMap` keyed by size gives the verify phase a deterministic
/// processing order; within each bucket, records keep their traversal
/// discovery order.
pub type SizeGroups = BTreeMap<u64, Vec<FileRecord>>;

/// A confirmed group of byte-identical files.
///
/// All paths share the same size and the same content digest. Groups
/// always hold at least two paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Content digest shared by every file in the group (32 bytes)
    pub digest: Digest,
    /// File size in bytes shared by every file in the group
    pub size: u64,
    /// Paths to the identical files, in discovery order
    pub paths: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    #[must_use]
    pub fn new(digest: Digest, size: u64, paths: Vec<PathBuf>) -> Self {
        Self {
            digest,
            size,
            paths,
        }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Number of redundant copies (total minus one original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }

    /// Bytes that removing all copies but one would reclaim.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }

    /// Digest as a hexadecimal string.
    #[must_use]
    pub fn digest_hex(&self) -> String {
        digest_to_hex(&self.digest)
    }
}

/// Statistics from the size grouping stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of records processed
    pub total_files: usize,
    /// Total size of all processed records in bytes
    pub total_size: u64,
    /// Number of distinct non-zero sizes seen
    pub unique_sizes: usize,
    /// Number of files eliminated as unique (singleton buckets)
    pub eliminated_unique: usize,
    /// Number of zero-byte records discarded
    pub empty_files: usize,
    /// Number of files left in buckets of 2+ (candidate duplicates)
    pub candidate_files: usize,
    /// Number of buckets with 2+ files
    pub candidate_groups: usize,
}

impl GroupingStats {
    /// Percentage of files eliminated by size grouping alone.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Group file records by size.
///
/// Records with size 0 are discarded: every empty file has the same
/// content, and reporting them as duplicates is not actionable. The
/// walker's minimum-size filter already excludes them under the default
/// configuration; this is the backstop that makes the policy hold for any
/// caller.
///
/// Buckets that end up with a single record are filtered out — a lone
/// file of some size cannot be a duplicate — and counted in the returned
/// stats.
///
/// # Returns
///
/// A tuple of:
/// - [`SizeGroups`] - buckets with 2+ records, keyed by size
/// - [`GroupingStats`] - counters describing the filtering
///
/// # Example
///
/// ```
/// use dupehound::scanner::FileRecord;
/// use dupehound::duplicates::group_by_size;
/// use std::path::PathBuf;
///
/// let records = vec![
///     FileRecord::new(PathBuf::from("/a.txt"), 100),
///     FileRecord::new(PathBuf::from("/b.txt"), 100),
///     FileRecord::new(PathBuf::from("/c.txt"), 200),
/// ];
///
/// let (groups, stats) = group_by_size(records);
///
/// assert_eq!(groups.len(), 1);
/// assert_eq!(groups[&100].len(), 2);
/// assert_eq!(stats.eliminated_unique, 1);  // the 200-byte file
/// ```
#[must_use]
pub fn group_by_size(records: impl IntoIterator<Item = FileRecord>) -> (SizeGroups, GroupingStats) {
    let mut buckets: SizeGroups = BTreeMap::new();
    let mut stats = GroupingStats::default();

    for record in records {
        stats.total_files += 1;
        stats.total_size += record.size;

        if record.size == 0 {
            stats.empty_files += 1;
            log::debug!("Discarding empty file: {}", record.path.display());
            continue;
        }

        buckets.entry(record.size).or_default().push(record);
    }

    if stats.empty_files > 0 {
        log::warn!(
            "Discarded {} empty file(s) - zero-byte files are excluded from duplicate detection",
            stats.empty_files
        );
    }

    stats.unique_sizes = buckets.len();

    buckets.retain(|size, records| {
        if records.len() == 1 {
            stats.eliminated_unique += 1;
            log::trace!(
                "Eliminated unique size {}: {}",
                size,
                records[0].path.display()
            );
            false
        } else {
            stats.candidate_files += records.len();
            stats.candidate_groups += 1;
            log::debug!("Size bucket {} bytes: {} candidates", size, records.len());
            true
        }
    });

    log::info!(
        "Size grouping: {} files -> {} candidates ({:.1}% eliminated)",
        stats.total_files,
        stats.candidate_files,
        stats.elimination_rate()
    );

    (buckets, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(path: &str, size: u64) -> FileRecord {
        FileRecord::new(PathBuf::from(path), size)
    }

    #[test]
    fn test_group_by_size_empty_input() {
        let records: Vec<FileRecord> = vec![];
        let (groups, stats) = group_by_size(records);

        assert!(groups.is_empty());
        assert_eq!(stats.total_files, 0);
        assert_eq!(stats.unique_sizes, 0);
        assert_eq!(stats.candidate_files, 0);
    }

    #[test]
    fn test_group_by_size_all_unique() {
        let records = vec![
            make_record("/a.txt", 100),
            make_record("/b.txt", 200),
            make_record("/c.txt", 300),
        ];
        let (groups, stats) = group_by_size(records);

        assert!(groups.is_empty());
        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.unique_sizes, 3);
        assert_eq!(stats.eliminated_unique, 3);
        assert_eq!(stats.candidate_files, 0);
    }

    #[test]
    fn test_group_by_size_with_duplicates() {
        let records = vec![
            make_record("/a.txt", 100),
            make_record("/b.txt", 100),
            make_record("/c.txt", 200),
        ];
        let (groups, stats) = group_by_size(records);

        assert_eq!(groups.len(), 1);
        assert!(groups.contains_key(&100));
        assert_eq!(groups[&100].len(), 2);

        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.unique_sizes, 2);
        assert_eq!(stats.eliminated_unique, 1);
        assert_eq!(stats.candidate_files, 2);
        assert_eq!(stats.candidate_groups, 1);
    }

    #[test]
    fn test_group_by_size_preserves_arrival_order() {
        let records = vec![
            make_record("/z.txt", 100),
            make_record("/m.txt", 100),
            make_record("/a.txt", 100),
        ];
        let (groups, _) = group_by_size(records);

        let paths: Vec<_> = groups[&100]
            .iter()
            .map(|r| r.path.to_str().unwrap())
            .collect();
        assert_eq!(paths, vec!["/z.txt", "/m.txt", "/a.txt"]);
    }

    #[test]
    fn test_group_by_size_multiple_groups_ordered_by_size() {
        let records = vec![
            make_record("/b1.txt", 200),
            make_record("/b2.txt", 200),
            make_record("/a1.txt", 100),
            make_record("/a2.txt", 100),
            make_record("/b3.txt", 200),
            make_record("/c.txt", 300), // unique
        ];
        let (groups, stats) = group_by_size(records);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&100].len(), 2);
        assert_eq!(groups[&200].len(), 3);

        // BTreeMap iterates smallest size first.
        let sizes: Vec<_> = groups.keys().copied().collect();
        assert_eq!(sizes, vec![100, 200]);

        assert_eq!(stats.total_files, 6);
        assert_eq!(stats.eliminated_unique, 1);
        assert_eq!(stats.candidate_files, 5);
        assert_eq!(stats.candidate_groups, 2);
    }

    #[test]
    fn test_group_by_size_discards_empty_files() {
        let records = vec![
            make_record("/empty1.txt", 0),
            make_record("/empty2.txt", 0),
            make_record("/normal.txt", 100),
        ];
        let (groups, stats) = group_by_size(records);

        // Both empty files discarded; the 100-byte file is a singleton.
        assert!(groups.is_empty());
        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.empty_files, 2);
        assert_eq!(stats.eliminated_unique, 1);
    }

    #[test]
    fn test_elimination_rate() {
        let records = vec![
            make_record("/a.txt", 100),
            make_record("/b.txt", 100),
            make_record("/c.txt", 200),
            make_record("/d.txt", 300),
        ];
        let (_, stats) = group_by_size(records);

        // 2 unique files out of 4 = 50%
        assert!((stats.elimination_rate() - 50.0).abs() < 0.1);

        assert_eq!(GroupingStats::default().elimination_rate(), 0.0);
    }

    #[test]
    fn test_duplicate_group_accessors() {
        let group = DuplicateGroup::new(
            [0u8; 32],
            1000,
            vec![
                PathBuf::from("/a.txt"),
                PathBuf::from("/b.txt"),
                PathBuf::from("/c.txt"),
            ],
        );

        assert_eq!(group.len(), 3);
        assert!(!group.is_empty());
        assert_eq!(group.duplicate_count(), 2);
        assert_eq!(group.wasted_space(), 2000);
    }

    #[test]
    fn test_duplicate_group_digest_hex() {
        let mut digest = [0u8; 32];
        digest[0] = 0xAB;
        digest[31] = 0xEF;

        let group = DuplicateGroup::new(digest, 100, vec![PathBuf::from("/a.txt")]);
        let hex = group.digest_hex();

        assert!(hex.starts_with("ab"));
        assert!(hex.ends_with("ef"));
        assert_eq!(hex.len(), 64);
    }
}
