//! ## Sparse representation
//! Allows to estimate small cardinality while it is cheaper to store touched registers only.
//!
//! Registers are addressed with `SPARSE_PRECISION` (25) hash bits regardless of the configured
//! precision and stored in a map from register index to rank. Once the memory used by the map
//! reaches the memory of `M` dense one-byte registers, the representation is converted into
//! `Dense` (see `Dense::from`).

use std::mem::size_of;

use hashbrown::HashMap;

use crate::config::SparseEstimation;
use crate::correction::{
    alpha, linear_counting, rank_weight, raw_estimate, LINEAR_COUNTING_THRESHOLD,
};
use crate::precision::{index_and_rank, Precision, SPARSE_PRECISION, SPARSE_REGISTERS};
use crate::representation::RepresentationTrait;

/// Memory accounted for a single sparse register: `u32` index and `u8` rank
pub(crate) const SPARSE_ENTRY_SIZE: usize = size_of::<u32>() + size_of::<u8>();

/// Sparse representation container
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Sparse {
    precision: Precision,
    /// Bias correction for `M` dense registers
    alpha: f64,
    estimation: SparseEstimation,
    registers: HashMap<u32, u8>,
}

impl Sparse {
    /// Create new empty `Sparse` representation; no memory is allocated until the first insert.
    #[inline]
    pub(crate) fn new(precision: Precision, estimation: SparseEstimation) -> Self {
        Self {
            precision,
            alpha: alpha(precision.registers()),
            estimation,
            registers: HashMap::new(),
        }
    }

    /// Return rank stored at sparse register `idx`, zero if it was never touched
    #[cfg(test)]
    pub(crate) fn get(&self, idx: u32) -> u8 {
        self.registers.get(&idx).copied().unwrap_or(0)
    }

    /// Return number of touched sparse registers
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.registers.len()
    }

    pub(crate) fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Whether the map uses at least as much memory as `M` dense registers
    #[inline]
    pub(crate) fn exceeds_dense_footprint(&self) -> bool {
        self.registers.len() * SPARSE_ENTRY_SIZE >= self.precision.registers() * size_of::<u8>()
    }

    /// Consume `Sparse` representation returning its touched registers
    #[inline]
    pub(crate) fn into_registers(self) -> impl Iterator<Item = (u32, u8)> {
        self.registers.into_iter()
    }

    /// Estimate which feeds the number of touched registers into linear counting over `M`
    /// dense registers.
    fn estimate_compatible(&self) -> f64 {
        let v = self.registers.len();
        if v == 0 {
            return 0.0;
        }
        let sum: f64 = self.registers.values().copied().map(rank_weight).sum();
        let m = self.precision.registers();
        let estimate = raw_estimate(self.alpha, v, sum);
        if estimate <= LINEAR_COUNTING_THRESHOLD * m as f64 {
            return linear_counting(m, v);
        }
        estimate
    }

    /// Estimate over the full sparse index space, untouched registers counted as empty.
    fn estimate_corrected(&self) -> f64 {
        let m = SPARSE_REGISTERS;
        let zeros = m - self.registers.len();
        let sum = self.registers.values().copied().map(rank_weight).sum::<f64>() + zeros as f64;
        let estimate = raw_estimate(alpha(m), m, sum);
        if estimate <= LINEAR_COUNTING_THRESHOLD * m as f64 {
            return linear_counting(m, zeros);
        }
        estimate
    }
}

impl Default for Sparse {
    fn default() -> Self {
        Self::new(Precision::default(), SparseEstimation::default())
    }
}

impl RepresentationTrait for Sparse {
    /// Insert hash into `Sparse` representation.
    /// Returns true once the representation should be converted into `Dense`.
    #[inline]
    fn insert_hash(&mut self, hash: u64) -> bool {
        let (idx, rank) = index_and_rank(hash, SPARSE_PRECISION);
        let old_rank = self.registers.entry(idx as u32).or_insert(0);
        if rank > *old_rank {
            *old_rank = rank;
        }
        self.exceeds_dense_footprint()
    }

    /// Return cardinality estimate of `Sparse` representation
    #[inline]
    fn estimate(&self) -> f64 {
        match self.estimation {
            SparseEstimation::Compatible => self.estimate_compatible(),
            SparseEstimation::Corrected => self.estimate_corrected(),
        }
    }

    #[inline]
    fn precision(&self) -> Precision {
        self.precision
    }

    /// Return memory size of `Sparse` representation
    #[inline]
    fn size_of(&self) -> usize {
        size_of::<Self>() + self.registers.capacity() * SPARSE_ENTRY_SIZE
    }
}
