//! Output formatters for duplicate scan results.
//!
//! Three renderings of the same result:
//! - text for humans (default)
//! - JSON for automation and scripting
//! - CSV for spreadsheet import

pub mod csv;
pub mod json;
pub mod text;

// Re-export main types
pub use csv::CsvOutput;
pub use json::JsonOutput;
pub use text::TextOutput;
