//! # CLI Error Type
//!
//! [`CliError`] aggregates the failures of the command-line front-end:
//! reading the input file, decoding its JSON and canonicalizing the
//! decoded terms. Conversions are derived with `#[from]` so `main` can
//! propagate I/O and JSON failures with `?`.

use narsese_terms::TermError;
use thiserror::Error;

/// Errors reported by the `narsese-terms` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// The input file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The input is not valid JSON, or the stats could not be encoded.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input file does not hold a JSON array of terms.
    #[error("expected a JSON array of terms")]
    NotAnArray,

    /// A term at the given position was rejected by the factory.
    #[error("term #{index}: {source}")]
    Term {
        index: usize,
        #[source]
        source: TermError,
    },
}
