//! Process exit codes for the dupehound binary.

/// Exit codes for the dupehound application.
///
/// - 0: Completed normally, duplicates found
/// - 1: Fatal error (invalid root path or unexpected failure)
/// - 2: Completed normally, no duplicates found
/// - 3: Completed, but some files were skipped due to read errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Scan completed and duplicates were found.
    Success = 0,
    /// An unrecoverable error occurred.
    GeneralError = 1,
    /// Scan completed but no duplicates were found.
    NoDuplicates = 2,
    /// Scan completed but some files could not be read.
    PartialSuccess = 3,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}
