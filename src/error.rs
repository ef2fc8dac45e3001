use thiserror::Error;

/// Errors produced by the warping engine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WarpError {
    /// Mesh construction was given inconsistent vertex or index data.
    #[error("invalid mesh data: {reason}")]
    InvalidMeshData {
        /// What the validation rejected.
        reason: String,
    },

    /// An internal cache or history index was out of range.
    ///
    /// This is a bug guard; presentation-level accessors return `Option`
    /// instead of surfacing it.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// The length of the indexed sequence.
        len: usize,
    },
}

/// Result type for warping operations.
pub type WarpResult<T> = Result<T, WarpError>;
