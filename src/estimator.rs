//! Cardinality estimator allows to estimate number of distinct elements
//! in the stream or dataset and is defined with runtime precision `P` in [2..18] range,
//! which defines number of bits to use for dense HyperLogLog register indices.
//!
//! # Data-structure design rationale
//!
//! ## Low memory footprint
//!
//! Estimator starts in sparse representation (unless configured with `Mode::Dense`)
//! which stores only registers touched so far, accounted as 5 bytes each
//! (`u32` index and `u8` rank). Once these reach the `M = 2^P` bytes required by
//! the dense representation, the estimator converts itself into dense representation:
//! - P = 12: up to 819 touched registers sparse, then 4096 bytes dense
//! - P = 14: up to 3276 touched registers sparse, then 16384 bytes dense
//! - P = 18: up to 52428 touched registers sparse, then 262144 bytes dense
//!
//! The conversion happens at most once and is never reverted.
//!
//! ## High accuracy
//! - Sparse registers are addressed with 25 hash bits, so small cardinalities
//!   are counted within hash collisions chance.
//! - Dense registers use HyperLogLog estimate with linear counting for small
//!   and 32-bit large range correction for very large cardinalities.
//!   - Expected error:
//!     P = 10: 1.04 / sqrt(2^10) = 3.25%
//!     P = 12: 1.04 / sqrt(2^12) = 1.62%
//!     P = 14: 1.04 / sqrt(2^14) = 0.81%
//!     P = 18: 1.04 / sqrt(2^18) = 0.20%
//!
//! # Concurrency
//! `insert` requires exclusive access while `estimate` only needs shared access,
//! so concurrent ingestion requires external synchronization (e.g. `Mutex` or `RwLock`).

use std::fmt::{Debug, Formatter};
use std::hash::{BuildHasher, BuildHasherDefault, Hash, Hasher};

use wyhash::WyHash;

use crate::config::{Config, Mode, SparseEstimation};
use crate::error::Error;
use crate::precision::Precision;
use crate::representation::{Representation, RepresentationTrait};

/// Adaptive HyperLogLog estimator hashing inserted items with `H`
pub struct CardinalityEstimator<H: Hasher + Default = WyHash> {
    representation: Representation,
    /// Zero-sized build hasher
    build_hasher: BuildHasherDefault<H>,
}

impl CardinalityEstimator {
    /// Creates new instance of `CardinalityEstimator` hashing items with `WyHash`.
    ///
    /// Fails with `Error::InvalidPrecision` when `precision` is not in [2..18] range.
    #[inline]
    pub fn new(precision: u8, mode: Mode) -> Result<Self, Error> {
        Config::new(precision).mode(mode).build()
    }
}

impl<H: Hasher + Default> CardinalityEstimator<H> {
    /// Creates new instance of `CardinalityEstimator` from `config`
    pub fn with_config(config: Config) -> Result<Self, Error> {
        let precision = config.precision()?;
        let mode = config.initial_mode();
        tracing::trace!(%precision, ?mode, "creating cardinality estimator");

        Ok(Self {
            representation: Representation::new(
                precision,
                mode,
                config.sparse_estimation_policy(),
            ),
            build_hasher: BuildHasherDefault::default(),
        })
    }

    /// Insert a hashable item into `CardinalityEstimator`
    #[inline]
    pub fn insert<T: Hash + ?Sized>(&mut self, item: &T) {
        let mut hasher = self.build_hasher.build_hasher();
        item.hash(&mut hasher);
        let hash = hasher.finish();
        self.insert_hash(hash);
    }

    /// Insert hash into `CardinalityEstimator`.
    ///
    /// The hash must be produced by the same hash function as all other inserted hashes.
    #[inline]
    pub fn insert_hash(&mut self, hash: u64) {
        if self.representation.insert_hash(hash) {
            self.representation.densify();
        }
    }

    /// Return cardinality estimate
    #[inline]
    pub fn estimate(&self) -> f64 {
        self.representation.estimate()
    }

    /// Return representation currently used by `CardinalityEstimator`
    #[inline]
    pub fn mode(&self) -> Mode {
        self.representation.mode()
    }

    #[inline]
    pub fn precision(&self) -> Precision {
        self.representation.precision()
    }

    /// Return memory size of `CardinalityEstimator`
    pub fn size_of(&self) -> usize {
        self.representation.size_of()
    }
}

impl<H: Hasher + Default> Default for CardinalityEstimator<H> {
    /// Sparse estimator with precision 12
    fn default() -> Self {
        Self {
            representation: Representation::new(
                Precision::default(),
                Mode::default(),
                SparseEstimation::default(),
            ),
            build_hasher: BuildHasherDefault::default(),
        }
    }
}

impl<H: Hasher + Default> Clone for CardinalityEstimator<H> {
    fn clone(&self) -> Self {
        Self {
            representation: self.representation.clone(),
            build_hasher: BuildHasherDefault::default(),
        }
    }
}

impl<H: Hasher + Default> PartialEq for CardinalityEstimator<H> {
    /// Compare cardinality estimators
    fn eq(&self, rhs: &Self) -> bool {
        self.representation == rhs.representation
    }
}

impl<H: Hasher + Default> Debug for CardinalityEstimator<H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ mode: {:?}, {} }}",
            self.mode(),
            self.representation.to_string()
        )
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use test_case::test_case;

    fn estimator(precision: u8, mode: Mode, estimation: SparseEstimation) -> CardinalityEstimator {
        Config::new(precision)
            .mode(mode)
            .sparse_estimation(estimation)
            .build()
            .unwrap()
    }

    #[test]
    fn test_new_estimates_zero() {
        for precision in Precision::MIN..=Precision::MAX {
            for mode in [Mode::Sparse, Mode::Dense] {
                for estimation in [SparseEstimation::Compatible, SparseEstimation::Corrected] {
                    let e = estimator(precision, mode, estimation);
                    assert_eq!(e.estimate(), 0.0, "precision = {precision}, mode = {mode:?}");
                    assert_eq!(e.mode(), mode);
                    assert_eq!(e.precision().registers(), 1 << precision);
                }
            }
        }
    }

    #[test_case(0)]
    #[test_case(1)]
    #[test_case(19)]
    #[test_case(64)]
    fn test_invalid_precision(precision: u8) {
        for mode in [Mode::Sparse, Mode::Dense] {
            assert_eq!(
                CardinalityEstimator::new(precision, mode).unwrap_err(),
                Error::InvalidPrecision {
                    precision,
                    min: 2,
                    max: 18
                }
            );
        }
    }

    #[test]
    fn test_insert() {
        // Create a new CardinalityEstimator.
        let mut e = CardinalityEstimator::new(12, Mode::Sparse).unwrap();

        // Ensure initial estimate is 0.
        assert_eq!(e.estimate(), 0.0);

        // Insert a test item and validate estimate.
        e.insert("test item 1");
        assert_eq!(e.estimate().round(), 1.0);

        // Re-insert the same item, estimate should remain the same.
        let estimate = e.estimate();
        e.insert("test item 1");
        assert_eq!(e.estimate(), estimate);

        // Insert a new distinct item, estimate should increase.
        e.insert("test item 2");
        assert_eq!(e.estimate().round(), 2.0);
    }

    #[test_case(Mode::Sparse; "sparse")]
    #[test_case(Mode::Dense; "dense")]
    fn test_duplicates_are_idempotent(mode: Mode) {
        let mut once = CardinalityEstimator::new(10, mode).unwrap();
        let mut thrice = CardinalityEstimator::new(10, mode).unwrap();
        for i in 0..2000 {
            once.insert(&i);
        }
        for _ in 0..3 {
            for i in 0..2000 {
                thrice.insert(&i);
            }
        }
        assert_eq!(once, thrice);
        assert_eq!(once.estimate(), thrice.estimate());
    }

    #[test_case(Mode::Sparse, SparseEstimation::Corrected; "sparse corrected")]
    #[test_case(Mode::Dense, SparseEstimation::Corrected; "dense")]
    fn test_single_value(mode: Mode, estimation: SparseEstimation) {
        let mut e = estimator(12, mode, estimation);
        e.insert("single");
        let estimate = e.estimate();
        assert!(estimate > 0.0 && estimate < 4096.0, "estimate = {estimate}");
    }

    #[test]
    fn test_single_value_compatible_sparse_estimate_exceeds_registers() {
        let mut e = estimator(12, Mode::Sparse, SparseEstimation::Compatible);
        e.insert("single");
        // raw estimate `2^rank * alpha` stays below `5 * M` unless rank >= 15
        let estimate = e.estimate();
        assert!(estimate >= 4096.0 * 4096f64.ln() || estimate > 5.0 * 4096.0);
    }

    #[test_case(12)]
    #[test_case(14)]
    #[test_case(16)]
    fn test_sparse_to_dense_transition(precision: u8) {
        let mut e = estimator(precision, Mode::Sparse, SparseEstimation::Corrected);
        let mut i = 0usize;
        let mut before = 0.0;
        while e.mode() == Mode::Sparse {
            before = e.estimate();
            e.insert(&i);
            i += 1;
        }
        let after = e.estimate();
        let jump = (after - before).abs() / before.max(1.0);
        assert!(jump < 0.1, "before = {before}, after = {after}, n = {i}");

        // dense size is fixed from now on
        let size = e.size_of();
        for j in i..i * 4 {
            e.insert(&j);
            assert_eq!(e.mode(), Mode::Dense);
        }
        assert_eq!(e.size_of(), size);
    }

    #[test_case(10, Mode::Sparse, 100_000; "p10 sparse")]
    #[test_case(10, Mode::Dense, 100_000; "p10 dense")]
    #[test_case(12, Mode::Sparse, 100_000; "p12 sparse")]
    #[test_case(12, Mode::Dense, 100_000; "p12 dense")]
    #[test_case(14, Mode::Sparse, 200_000; "p14 sparse")]
    fn test_average_relative_error(precision: u8, mode: Mode, n: usize) {
        let e = estimator(precision, mode, SparseEstimation::Corrected);
        let avg_err = evaluate_cardinality_estimator(e, n);
        let expected_err = 1.04 / ((1usize << precision) as f64).sqrt();
        assert!(avg_err < 3.0 * expected_err, "avg_err = {avg_err:.4}");
    }

    /// Average relative error of estimates sampled while inserting `n` distinct items
    fn evaluate_cardinality_estimator(mut e: CardinalityEstimator, n: usize) -> f64 {
        let mut total_relative_error: f64 = 0.0;
        let mut samples = 0;
        for i in 0..n {
            e.insert(&i);
            if i % 97 == 0 {
                let actual = (i + 1) as f64;
                total_relative_error += (e.estimate() - actual).abs() / actual;
                samples += 1;
            }
        }
        total_relative_error / samples as f64
    }

    #[test]
    fn test_custom_hasher() {
        let mut e = Config::new(8)
            .mode(Mode::Dense)
            .build_with_hasher::<DefaultHasher>()
            .unwrap();
        for i in 0..100 {
            e.insert(&i);
        }
        let estimate = e.estimate();
        assert!(estimate > 70.0 && estimate < 130.0, "estimate = {estimate}");
    }

    #[test]
    fn test_default_and_clone() {
        let mut e: CardinalityEstimator = CardinalityEstimator::default();
        assert_eq!(e.precision().get(), 12);
        assert_eq!(e.mode(), Mode::Sparse);
        e.insert("item");

        let mut cloned = e.clone();
        assert_eq!(cloned, e);
        cloned.insert("another item");
        assert_ne!(cloned, e);
    }

    #[test]
    fn test_debug() {
        let e = CardinalityEstimator::new(4, Mode::Dense).unwrap();
        assert_eq!(
            format!("{:?}", e),
            format!(
                "{{ mode: Dense, precision: 4, estimate: 0.00, size: {} }}",
                e.size_of()
            )
        );
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CardinalityEstimator>();
    }
}
