//! Error types: an `anyhow` alias for the CLI plumbing and the one typed
//! validation failure callers surface before submitting a billing document.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, anyhow::Error>;

/// Precondition failures checked before a selection may be turned into an
/// invoice or receipt. Pricing itself never fails.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("at least one passenger must be selected")]
    NoPassengerSelected,
}
