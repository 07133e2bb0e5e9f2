//! ## Dense representation
//! Allows to estimate large cardinality using `M = 2^P` one-byte registers.
//!
//! Register `i` holds the maximum rank of all hashes whose top `P` bits equal `i`.

use std::mem::{size_of, size_of_val};

use crate::correction::{
    alpha, large_range_correction, linear_counting, rank_weight, raw_estimate,
    LARGE_RANGE_THRESHOLD, LINEAR_COUNTING_THRESHOLD,
};
use crate::precision::Precision;
use crate::representation::RepresentationTrait;
use crate::sparse::Sparse;

/// Dense representation container
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Dense {
    precision: Precision,
    alpha: f64,
    registers: Box<[u8]>,
}

impl Dense {
    /// Create new instance of `Dense` representation with all registers set to zero
    #[inline]
    pub(crate) fn new(precision: Precision) -> Self {
        Self::with_alpha(precision, alpha(precision.registers()))
    }

    #[inline]
    fn with_alpha(precision: Precision, alpha: f64) -> Self {
        Self {
            precision,
            alpha,
            registers: vec![0u8; precision.registers()].into_boxed_slice(),
        }
    }

    /// Return register ranks
    #[cfg(test)]
    pub(crate) fn registers(&self) -> &[u8] {
        &self.registers
    }

    /// Raise register `idx` to `rank` unless it already holds a higher or equal rank
    #[inline]
    fn update_rank(&mut self, idx: usize, rank: u8) {
        let old_rank = &mut self.registers[idx];
        if rank > *old_rank {
            *old_rank = rank;
        }
    }
}

impl From<Sparse> for Dense {
    /// Convert `Sparse` representation into `Dense`, folding every sparse register
    /// onto the dense register addressed by its top `P` index bits.
    fn from(sparse: Sparse) -> Self {
        let precision = sparse.precision();
        let mut dense = Self::with_alpha(precision, sparse.alpha());
        let shift = precision.sparse_shift();
        for (idx, rank) in sparse.into_registers() {
            dense.update_rank((idx >> shift) as usize, rank);
        }
        dense
    }
}

impl RepresentationTrait for Dense {
    /// Insert hash into `Dense` representation; dense registers never need an upgrade.
    #[inline]
    fn insert_hash(&mut self, hash: u64) -> bool {
        let (idx, rank) = self.precision.index_and_rank(hash);
        self.update_rank(idx, rank);
        false
    }

    /// Return cardinality estimate of `Dense` representation
    fn estimate(&self) -> f64 {
        let m = self.registers.len();
        let (sum, zeros) = self
            .registers
            .iter()
            .fold((0.0, 0), |(sum, zeros), &rank| {
                (sum + rank_weight(rank), zeros + usize::from(rank == 0))
            });

        let estimate = raw_estimate(self.alpha, m, sum);
        if estimate <= LINEAR_COUNTING_THRESHOLD * m as f64 {
            linear_counting(m, zeros)
        } else if estimate <= LARGE_RANGE_THRESHOLD {
            estimate
        } else {
            large_range_correction(estimate)
        }
    }

    #[inline]
    fn precision(&self) -> Precision {
        self.precision
    }

    /// Return memory size of `Dense` representation
    #[inline]
    fn size_of(&self) -> usize {
        size_of::<Self>() + size_of_val(&*self.registers)
    }
}
