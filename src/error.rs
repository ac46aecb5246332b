//! Error types for series manipulation and curve fitting
//!
//! This module defines the failure modes of the engine, along with a convenient `Result` alias.
//! All of them are local, recoverable conditions reported to the immediate caller.

/// Errors that can occur while building, querying or fitting a [`crate::Series`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The operation requires at least one sample.
    #[error("No data available")]
    NoData,

    /// An argument was rejected.
    ///
    /// Covers out-of-order x insertion, out-of-range indices, mismatched
    /// array lengths and malformed window or bandwidth parameters.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The operation is not allowed in the current state of the series.
    ///
    /// For example, setting a capacity on a series that already holds samples.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The normal-equation matrix of a fit is singular.
    ///
    /// Usually the x values are degenerate (e.g. all identical) for the requested order.
    /// Lowering the order or adding data with more x spread are the only remedies.
    #[error(
        "Normal-equation matrix is singular; the x values may be degenerate for this model. [n: {n}, k: {k}]"
    )]
    SingularMatrix {
        /// Number of data points
        n: usize,
        /// Number of unknowns
        k: usize,
    },

    /// A value fell outside the mathematical domain of the model
    /// (logarithm or power of a non-positive or non-finite value).
    #[error("Domain error: {0}")]
    Domain(String),

    /// The fit kind or its coefficient layout is not recognized.
    #[error("Unsupported fit: {0}")]
    UnsupportedFit(String),

    /// Reading or writing a persisted series failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted series could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Result type for series and fitting operations
pub type Result<T> = std::result::Result<T, Error>;
