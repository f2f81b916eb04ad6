//! Duplicate detection module.
//!
//! This module provides the two logical stages of duplicate detection:
//! - Size-based grouping (cheap pre-filter, no I/O)
//! - Content verification via streaming digests
//!
//! plus the [`DuplicateFinder`](finder::DuplicateFinder) orchestrator that
//! wires them to the scanner.

pub mod finder;
pub mod groups;

pub use finder::{DuplicateFinder, FinderConfig, FinderError, ScanSummary};
pub use groups::{group_by_size, DuplicateGroup, GroupingStats, SizeGroups};
