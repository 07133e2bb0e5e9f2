//! ## Register model
//! A 64-bit hash is split into a register index and a rank:
//! - the top `bits` bits select the register,
//! - the rank is one plus the number of leading zeros in the remaining bits.
//!
//! Dense registers are addressed with `P` bits where `P` is the configured precision,
//! sparse registers always use a fixed `SPARSE_PRECISION` bits.

use std::fmt::{Display, Formatter};

use crate::error::Error;

/// Number of index bits used by the sparse representation, independent of precision.
pub const SPARSE_PRECISION: u8 = 25;
/// Number of registers addressable by the sparse representation.
pub const SPARSE_REGISTERS: usize = 1 << SPARSE_PRECISION;

/// Precision of the estimator: number of hash bits used to address dense registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Precision(u8);

impl Precision {
    /// Smallest supported precision
    pub const MIN: u8 = 2;
    /// Largest supported precision
    pub const MAX: u8 = 18;

    /// Create new precision, failing when `precision` is outside of `[MIN..=MAX]` range.
    #[inline]
    pub fn new(precision: u8) -> Result<Self, Error> {
        if !(Self::MIN..=Self::MAX).contains(&precision) {
            return Err(Error::InvalidPrecision {
                precision,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(precision))
    }

    /// Suggest precision for the expected number of distinct elements.
    pub fn for_cardinality(cardinality: usize) -> Self {
        match cardinality {
            0..=10_000 => Self(12),
            10_001..=1_000_000 => Self(13),
            _ => Self(14),
        }
    }

    /// Return precision as number of bits
    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Number of dense registers, `2^precision`
    #[inline]
    pub fn registers(self) -> usize {
        1 << self.0
    }

    /// Return dense register index and rank for given hash
    #[inline]
    pub(crate) fn index_and_rank(self, hash: u64) -> (usize, u8) {
        index_and_rank(hash, self.0)
    }

    /// Number of bits dropped when mapping a sparse index onto a dense index
    #[inline]
    pub(crate) fn sparse_shift(self) -> u8 {
        SPARSE_PRECISION - self.0
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self(12)
    }
}

impl TryFrom<u8> for Precision {
    type Error = Error;

    fn try_from(precision: u8) -> Result<Self, Self::Error> {
        Self::new(precision)
    }
}

impl From<Precision> for u8 {
    fn from(precision: Precision) -> Self {
        precision.0
    }
}

impl Display for Precision {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Split `hash` into register index (top `bits` bits) and rank.
///
/// The lowest bit is forced to one before counting leading zeros,
/// so the rank never exceeds 64.
#[inline]
pub(crate) fn index_and_rank(hash: u64, bits: u8) -> (usize, u8) {
    let idx = (hash >> (64 - bits)) as usize;
    let rank = ((hash << bits) | 1).leading_zeros() as u8 + 1;
    (idx, rank)
}
