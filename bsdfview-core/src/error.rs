//! Error types for bsdfview-core.

use thiserror::Error;

/// Result type alias for bsdfview operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for point cloud operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Wavelength index outside of the dataset's intensity range.
    #[error("invalid wavelength index {index} (dataset has {count} wavelengths)")]
    InvalidWavelength { index: usize, count: usize },

    /// Two parallel collections disagree on the number of points.
    #[error("dimension mismatch: expected {expected} points, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// A sample matrix needs theta, phi and at least one intensity row.
    #[error("invalid sample width {0}: need at least 3 rows (theta, phi, intensity)")]
    InvalidSampleWidth(usize),
}
