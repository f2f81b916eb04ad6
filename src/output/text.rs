//! Human-readable text report for duplicate scan results.
//!
//! One block per duplicate group (digest, size, paths), followed by a
//! short summary. This is the default output of the CLI.

use std::io::{self, Write};

use bytesize::ByteSize;

use crate::duplicates::{DuplicateGroup, ScanSummary};

/// Text output formatter.
pub struct TextOutput<'a> {
    groups: &'a [DuplicateGroup],
    summary: &'a ScanSummary,
}

impl<'a> TextOutput<'a> {
    /// Create a new text output formatter.
    #[must_use]
    pub fn new(groups: &'a [DuplicateGroup], summary: &'a ScanSummary) -> Self {
        Self { groups, summary }
    }

    /// Write the report to the given writer.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if writing fails.
    pub fn write_to<W: Write>(&self, mut w: W) -> io::Result<()> {
        if self.groups.is_empty() {
            writeln!(w, "No duplicate files found.")?;
        } else {
            for (idx, group) in self.groups.iter().enumerate() {
                writeln!(
                    w,
                    "Group {} - {} per file ({} bytes), digest {}",
                    idx + 1,
                    ByteSize::b(group.size),
                    group.size,
                    group.digest_hex()
                )?;
                for path in &group.paths {
                    writeln!(w, "  {}", path.display())?;
                }
                writeln!(w)?;
            }
        }

        writeln!(
            w,
            "Scanned {} files ({}) in {:.2?}",
            self.summary.total_files,
            self.summary.total_size_display(),
            self.summary.scan_duration
        )?;
        writeln!(
            w,
            "{} duplicate groups, {} redundant files, {} reclaimable",
            self.summary.duplicate_groups,
            self.summary.duplicate_files,
            self.summary.reclaimable_display()
        )?;

        if self.summary.has_errors() {
            writeln!(
                w,
                "{} file(s) could not be read and were skipped",
                self.summary.errors.len()
            )?;
        }

        Ok(())
    }

    /// Generate the report as a string.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if formatting fails.
    pub fn to_text_string(&self) -> io::Result<String> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
