//! Defines [`TermError`], the unified error type for term construction.
//!
//! Provides descriptive error variants for malformed creation requests
//! and for the rare internal invariant violations the factory detects.

use smartstring::alias::String;
use thiserror::Error;

/// Represents all possible errors that can occur while building terms.
///
/// [`TermError`] provides a single error surface for the factory and its
/// helpers. Errors are raised synchronously at the point of detection and
/// nothing partially built is ever left in the interning cache.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TermError {
    /// No data was supplied for a creation request (null spec or empty name).
    #[error("invalid input: no term data supplied")]
    InvalidInput,

    /// A compound request carried components that are not a sequence.
    #[error("invalid components: expected a sequence of component specs")]
    InvalidComponents,

    /// The operator of a compound request is not textual.
    #[error("invalid operator {0:?}")]
    InvalidOperator(String),

    /// A component has no derivable name during redundancy checking.
    #[error("malformed component: missing name")]
    MalformedComponent,

    /// Algebraic rewriting did not settle within the configured step limit.
    #[error("rewrite limit of {0} steps exceeded")]
    RewriteLimitExceeded(usize),
}
