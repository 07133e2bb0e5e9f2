use thiserror::Error;

/// Errors returned when constructing a `CardinalityEstimator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// Requested precision lies outside of the supported range.
    #[error("invalid precision {precision}: must be in [{min}..={max}] range")]
    InvalidPrecision {
        /// The rejected precision value.
        precision: u8,
        /// Smallest supported precision.
        min: u8,
        /// Largest supported precision.
        max: u8,
    },
}
