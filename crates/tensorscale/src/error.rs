//! Error types for tensor scaling operations

use thiserror::Error;

/// Result type for tensor scaling operations
pub type Result<T> = std::result::Result<T, ScaleError>;

/// Errors that can occur while validating inputs or running the scaling loop
#[derive(Error, Debug)]
pub enum ScaleError {
    /// No target spectra were provided
    #[error("no target spectra provided")]
    NoTargets,

    /// More spectra than tensor factors in a sequence of targets
    #[error("more target spectra ({given}) than tensor factors ({rank})")]
    TooManySpectra {
        /// Number of spectra provided
        given: usize,
        /// Rank of the tensor
        rank: usize,
    },

    /// A factor index is outside the tensor's rank
    #[error("factor index {factor} out of range for tensor of rank {rank}")]
    FactorOutOfRange {
        /// The offending factor index
        factor: usize,
        /// Rank of the tensor
        rank: usize,
    },

    /// A target spectrum's length does not match its factor's dimension
    #[error("target spectrum for factor {factor} has length {got}, expected {expected}")]
    SpectrumDimensionMismatch {
        /// Factor the spectrum was assigned to
        factor: usize,
        /// Dimension of that factor
        expected: usize,
        /// Length of the provided spectrum
        got: usize,
    },

    /// A target spectrum does not sum to one
    #[error("target spectrum for factor {factor} sums to {sum}, expected 1")]
    NotADistribution {
        /// Factor the spectrum was assigned to
        factor: usize,
        /// Actual sum of the spectrum entries
        sum: f64,
    },

    /// A target spectrum is not sorted in non-increasing order
    #[error("target spectrum for factor {factor} is not ordered non-increasingly")]
    UnorderedSpectrum {
        /// Factor the spectrum was assigned to
        factor: usize,
    },

    /// The input tensor is not a unit vector
    #[error("input tensor has norm {norm}, expected a unit vector")]
    NotUnitNorm {
        /// Euclidean norm of the input tensor
        norm: f64,
    },

    /// Matrix dimensions incompatible with the tensor axis they act on
    #[error("shape mismatch: {message}")]
    ShapeMismatch {
        /// Description of the incompatible shapes
        message: String,
    },

    /// A target spectrum contains a numerically zero eigenvalue
    #[error("singular target marginal for factor {factor}: scaling to singular spectra is not implemented")]
    SingularTarget {
        /// Factor whose spectrum has a zero entry
        factor: usize,
    },

    /// Cholesky factorization failed on a matrix that is not positive definite
    #[error("matrix is not positive definite (pivot {pivot} at row {row})")]
    NotPositiveDefinite {
        /// Row at which factorization broke down
        row: usize,
        /// Value of the offending pivot
        pivot: f64,
    },

    /// A triangular factor is singular to working precision
    #[error("triangular factor is singular to working precision (pivot at row {row})")]
    SingularMatrix {
        /// Row of the vanishing pivot
        row: usize,
    },
}
