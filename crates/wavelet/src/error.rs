//! Error types for the wvar-wavelet crate.

/// Error type for all fallible operations in the wvar-wavelet crate.
///
/// Covers input validation, filter lookup and registration, and
/// decomposition-depth problems.
#[derive(Debug, Clone, thiserror::Error)]
pub enum WaveletError {
    /// Returned when the input series or a parameter is unusable
    /// (too short, non-finite values, zero levels).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Returned when the series cannot support the requested decomposition.
    #[error(
        "insufficient length: {len} observations cannot support {levels} level(s) of a length-{filter_len} filter"
    )]
    InsufficientLength {
        /// Number of observations provided.
        len: usize,
        /// Number of levels requested.
        levels: usize,
        /// Length of the wavelet filter.
        filter_len: usize,
    },

    /// Returned when no wavelet family is registered under the given name.
    #[error("unknown wavelet filter: {0}")]
    UnknownFilter(String),

    /// Returned when registered taps violate the orthonormality conditions.
    #[error("invalid wavelet filter: {0}")]
    InvalidFilter(String),
}
