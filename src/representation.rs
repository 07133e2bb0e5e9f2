use enum_dispatch::enum_dispatch;

use crate::config::{Mode, SparseEstimation};
use crate::dense::Dense;
use crate::precision::Precision;
use crate::sparse::Sparse;

/// Representation types supported by `CardinalityEstimator`
#[derive(Debug, Clone, PartialEq)]
#[enum_dispatch]
pub(crate) enum Representation {
    Sparse(Sparse),
    Dense(Dense),
}

/// Representation trait which must be implemented by all representations.
#[enum_dispatch(Representation)]
pub(crate) trait RepresentationTrait {
    /// Insert hash, returning true when the representation should be upgraded
    fn insert_hash(&mut self, hash: u64) -> bool;
    fn estimate(&self) -> f64;
    fn precision(&self) -> Precision;
    fn size_of(&self) -> usize;
    fn to_string(&self) -> String {
        format!(
            "precision: {}, estimate: {:.2}, size: {}",
            self.precision(),
            self.estimate(),
            self.size_of()
        )
    }
}

impl Representation {
    /// Create empty representation of the given `mode`
    pub(crate) fn new(precision: Precision, mode: Mode, estimation: SparseEstimation) -> Self {
        match mode {
            Mode::Sparse => Sparse::new(precision, estimation).into(),
            Mode::Dense => Dense::new(precision).into(),
        }
    }

    /// Return the mode of the current representation
    #[inline]
    pub(crate) fn mode(&self) -> Mode {
        match self {
            Representation::Sparse(_) => Mode::Sparse,
            Representation::Dense(_) => Mode::Dense,
        }
    }

    /// Replace `Sparse` representation by `Dense` one holding the same registers.
    /// Sparse registers are released once migrated; `Dense` is left untouched.
    pub(crate) fn densify(&mut self) {
        if let Representation::Sparse(sparse) = &mut *self {
            let sparse = std::mem::take(sparse);
            let (precision, registers) = (sparse.precision(), sparse.len());
            *self = Dense::from(sparse).into();
            tracing::debug!(
                %precision,
                sparse_registers = registers,
                "converted sparse representation to dense"
            );
        }
    }
}
