//! Directory walker built on walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory
//! tree and collecting file metadata for duplicate detection. Entries are
//! visited in name-sorted order so a static tree always produces the same
//! sequence of records.
//!
//! # Features
//!
//! - Deterministic, single-threaded traversal via [`walkdir`]
//! - Gitignore-style pattern matching via the `ignore` crate
//! - Size filtering (min/max)
//! - Hidden file filtering
//!
//! Per-entry metadata failures are yielded as errors rather than stopping
//! the walk; the caller decides whether to log or collect them.
//!
//! # Example
//!
//! ```no_run
//! use dupehound::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig {
//!     min_size: 1024,  // Skip files under 1KB
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), config);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use walkdir::{DirEntry, WalkDir};

use super::{FileRecord, ScanError, WalkerConfig};

/// Directory walker for file discovery.
///
/// Walks a directory tree in deterministic order, yielding one
/// [`FileRecord`] per regular file that passes the configured filters.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Arguments
    ///
    /// * `root` - Root directory to scan
    /// * `config` - Walker configuration options
    #[must_use]
    pub fn new(root: &Path, config: WalkerConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            config,
        }
    }

    /// Build a gitignore matcher from the configured patterns.
    fn build_matcher(&self) -> Option<Gitignore> {
        if self.config.ignore_patterns.is_empty() {
            return None;
        }

        let mut builder = GitignoreBuilder::new(&self.root);
        for pattern in &self.config.ignore_patterns {
            if let Err(e) = builder.add_line(None, pattern) {
                log::warn!("Invalid ignore pattern '{}': {}", pattern, e);
            }
        }

        match builder.build() {
            Ok(matcher) if !matcher.is_empty() => Some(matcher),
            Ok(_) => None,
            Err(e) => {
                log::warn!("Failed to build ignore patterns: {}", e);
                None
            }
        }
    }

    /// Check if a path matches the configured ignore patterns.
    fn should_ignore(&self, path: &Path, is_dir: bool, matcher: &Option<Gitignore>) -> bool {
        let Some(matcher) = matcher else {
            return false;
        };

        // Gitignore matching expects paths relative to the root, with
        // forward slashes even on Windows.
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let path_str = relative.to_string_lossy();
        let normalized = if cfg!(windows) {
            path_str.replace('\\', "/")
        } else {
            path_str.into_owned()
        };

        matcher.matched(normalized, is_dir).is_ignore()
    }

    /// Check if a file passes the size filters.
    fn passes_size_filter(&self, size: u64) -> bool {
        if size < self.config.min_size {
            return false;
        }
        if let Some(max) = self.config.max_size {
            if size > max {
                return false;
            }
        }
        true
    }

    /// Walk the directory tree, yielding file records.
    ///
    /// Returns an iterator over [`FileRecord`] results. Errors are yielded
    /// as [`ScanError`] values rather than stopping iteration. Entries are
    /// visited in name-sorted order, so output is deterministic for a
    /// static tree. Symlinks are never followed.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileRecord, ScanError>> + '_ {
        let matcher = self.build_matcher();
        let dir_matcher = matcher.clone();
        let skip_hidden = self.config.skip_hidden;
        let root = self.root.clone();

        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| {
                // The root itself is always entered, even when its own name
                // looks hidden (tempdirs often start with a dot).
                if entry.depth() == 0 {
                    return true;
                }
                if skip_hidden && is_hidden(entry) {
                    log::trace!("Skipping hidden entry: {}", entry.path().display());
                    return false;
                }
                // Prune ignored directories so the walker never descends
                // into them.
                if entry.file_type().is_dir() {
                    let relative = entry.path().strip_prefix(&root).unwrap_or(entry.path());
                    if let Some(ref m) = dir_matcher {
                        let path_str = relative.to_string_lossy();
                        let normalized = if cfg!(windows) {
                            path_str.replace('\\', "/")
                        } else {
                            path_str.into_owned()
                        };
                        if m.matched(normalized, true).is_ignore() {
                            log::trace!("Ignoring directory: {}", entry.path().display());
                            return false;
                        }
                    }
                }
                true
            })
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => {
                    if entry.depth() == 0 {
                        return None;
                    }

                    let file_type = entry.file_type();
                    if file_type.is_dir() {
                        return None;
                    }
                    // Symlink handling is out of scope; skip them outright.
                    if file_type.is_symlink() {
                        log::trace!("Skipping symlink: {}", entry.path().display());
                        return None;
                    }

                    if self.should_ignore(entry.path(), false, &matcher) {
                        log::trace!("Ignoring file: {}", entry.path().display());
                        return None;
                    }

                    let metadata = match entry.metadata() {
                        Ok(m) => m,
                        Err(e) => {
                            let path = entry.path().to_path_buf();
                            log::warn!("Cannot read metadata for {}: {}", path.display(), e);
                            return Some(Err(ScanError::Metadata {
                                source: e
                                    .into_io_error()
                                    .unwrap_or_else(|| std::io::Error::other("metadata error")),
                                path,
                            }));
                        }
                    };

                    if !metadata.is_file() {
                        return None;
                    }

                    let size = metadata.len();
                    if !self.passes_size_filter(size) {
                        log::trace!(
                            "Skipping file due to size filter ({}): {}",
                            size,
                            entry.path().display()
                        );
                        return None;
                    }

                    Some(Ok(FileRecord::new(entry.into_path(), size)))
                }
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| self.root.clone(), Path::to_path_buf);
                    log::warn!("Walk error for {}: {}", path.display(), e);
                    Some(Err(ScanError::Walk {
                        source: e
                            .into_io_error()
                            .unwrap_or_else(|| std::io::Error::other("walk error")),
                        path,
                    }))
                }
            })
    }
}

/// A name starting with `.` marks an entry as hidden (root excluded).
fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
