//! dupehound - content-based duplicate file finder.
//!
//! Finds groups of byte-identical files under a directory tree using a
//! two-phase filter: bucket candidates by size, then confirm identical
//! content with streaming digests. Only files that share a size with at
//! least one other file are ever read.
//!
//! # Library usage
//!
//! ```no_run
//! use dupehound::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default());
//! let (groups, summary) = finder.find_duplicates(Path::new("/data"))?;
//!
//! for group in &groups {
//!     println!("{} x{}", group.digest_hex(), group.len());
//! }
//! println!("reclaimable: {}", summary.reclaimable_display());
//! # Ok::<(), dupehound::duplicates::FinderError>(())
//! ```

pub mod cli;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;

use std::sync::Arc;

use cli::{Cli, OutputFormat};
use duplicates::{DuplicateFinder, FinderConfig};
use error::ExitCode;
use output::{CsvOutput, JsonOutput, TextOutput};
use progress::Progress;
use scanner::WalkerConfig;

/// Run the application logic for the parsed CLI arguments.
///
/// Separated from `main` so integration tests can drive the full binary
/// behavior without spawning a process.
///
/// # Errors
///
/// Returns an error for fatal failures (invalid root path, output
/// serialization failure); everything recoverable is reflected in the
/// exit code instead.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let walker_config = WalkerConfig {
        min_size: cli.min_size,
        max_size: cli.max_size,
        ignore_patterns: cli.ignore_patterns.clone(),
        skip_hidden: cli.skip_hidden,
    };

    let mut config = FinderConfig::default()
        .with_algorithm(cli.algorithm.into())
        .with_chunk_size(cli.chunk_size as usize)
        .with_io_threads(cli.io_threads)
        .with_walker_config(walker_config);

    // Progress bars only make sense on the interactive text path; JSON
    // and CSV output is usually piped.
    if cli.output == OutputFormat::Text && !cli.quiet {
        config = config.with_progress(Arc::new(Progress::new(false)));
    }

    let finder = DuplicateFinder::new(config);
    let (groups, summary) = finder.find_duplicates(&cli.path)?;

    let stdout = std::io::stdout();
    match cli.output {
        OutputFormat::Text => TextOutput::new(&groups, &summary).write_to(stdout.lock())?,
        OutputFormat::Json => JsonOutput::new(&groups, &summary).write_to(stdout.lock())?,
        OutputFormat::Csv => CsvOutput::new(&groups).write_to(stdout.lock())?,
    }

    let code = if summary.has_errors() {
        ExitCode::PartialSuccess
    } else if groups.is_empty() {
        ExitCode::NoDuplicates
    } else {
        ExitCode::Success
    };

    Ok(code)
}
