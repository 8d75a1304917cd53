//! Error types for the pod security checker.
//!
//! Every error is fatal. The binary maps each variant to a fault exit
//! status through [`CheckerError::exit_code`]; status 2 is reserved for a
//! completed run that found violations.

use thiserror::Error;

/// Exit status of a completed run without violations.
pub const EXIT_OK: i32 = 0;

/// Exit status of any unrecoverable error.
pub const EXIT_FAULT: i32 = 1;

/// Exit status of a completed run that found at least one violation.
pub const EXIT_VIOLATIONS: i32 = 2;

/// Errors that abort a run before the report completes.
#[derive(Debug, Error)]
pub enum CheckerError {
    /// Invalid level, output format, config file, or rule set
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Kubeconfig could not be loaded or the client could not be built
    #[error("Failed to connect to cluster: {0}")]
    Connection(String),

    /// The pod list request failed
    #[error("Failed to list pods: {0}")]
    Retrieval(String),

    /// Interrupted while the pod list request was outstanding
    #[error("Interrupted before pods could be listed")]
    Cancelled,

    /// Writing the report failed
    #[error("Failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

impl CheckerError {
    /// Process exit status for this error. Never [`EXIT_VIOLATIONS`].
    pub fn exit_code(&self) -> i32 {
        EXIT_FAULT
    }
}

/// Result type alias for checker operations
pub type Result<T> = std::result::Result<T, CheckerError>;
