use std::hash::Hasher;

use crate::error::Error;
use crate::estimator::CardinalityEstimator;
use crate::precision::Precision;

/// Representation an estimator starts with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Map of touched registers, converted to `Dense` once it outgrows the dense registers
    #[default]
    Sparse,
    /// Fixed array of `2^precision` registers
    Dense,
}

/// Formula used for estimates while the estimator is still sparse.
///
/// `Compatible` feeds the number of *touched* sparse registers into linear counting over
/// `2^precision` registers, reproducing estimates of the reference HyperLogLog implementation
/// this estimator is derived from. It overestimates small cardinalities (a single element
/// estimates as `M * ln(M)`) and jumps when the estimator becomes dense.
///
/// `Corrected` treats the sparse map as `2^25` registers, untouched ones being empty,
/// which keeps the estimate continuous across the sparse to dense transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SparseEstimation {
    Compatible,
    #[default]
    Corrected,
}

/// Builder for `CardinalityEstimator`.
///
/// ```
/// use adaptive_hyperloglog::{Config, Mode};
///
/// let mut estimator = Config::new(14).mode(Mode::Dense).build().unwrap();
/// estimator.insert("apple");
/// assert!(estimator.estimate() > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Config {
    precision: u8,
    mode: Mode,
    sparse_estimation: SparseEstimation,
}

impl Config {
    /// Create configuration with given precision, starting sparse.
    /// Precision is validated by `build`.
    pub fn new(precision: u8) -> Self {
        Self {
            precision,
            ..Self::default()
        }
    }

    /// Create configuration with precision suited for the expected number of distinct elements
    pub fn for_cardinality(cardinality: usize) -> Self {
        Self::new(Precision::for_cardinality(cardinality).get())
    }

    /// Set initial representation
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set formula used for sparse estimates
    pub fn sparse_estimation(mut self, sparse_estimation: SparseEstimation) -> Self {
        self.sparse_estimation = sparse_estimation;
        self
    }

    /// Return validated precision
    pub fn precision(&self) -> Result<Precision, Error> {
        Precision::new(self.precision)
    }

    pub(crate) fn initial_mode(&self) -> Mode {
        self.mode
    }

    pub(crate) fn sparse_estimation_policy(&self) -> SparseEstimation {
        self.sparse_estimation
    }

    /// Build estimator hashing items with `WyHash`
    pub fn build(self) -> Result<CardinalityEstimator, Error> {
        CardinalityEstimator::with_config(self)
    }

    /// Build estimator hashing items with `H`
    pub fn build_with_hasher<H: Hasher + Default>(self) -> Result<CardinalityEstimator<H>, Error> {
        CardinalityEstimator::with_config(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            precision: Precision::default().get(),
            mode: Mode::default(),
            sparse_estimation: SparseEstimation::default(),
        }
    }
}
