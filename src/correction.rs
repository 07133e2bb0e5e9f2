//! Bias correction and cardinality-range dependent estimate corrections.
//!
//! [Original HyperLogLog paper](https://algo.inria.fr/flajolet/Publications/FlFuGaMe07.pdf)

/// Raw estimates up to `LINEAR_COUNTING_THRESHOLD * m` are replaced by linear counting.
pub(crate) const LINEAR_COUNTING_THRESHOLD: f64 = 5.0;
/// Size of the 32-bit hash space the large range correction is expressed in.
pub(crate) const TWO_POW_32: f64 = (1u64 << 32) as f64;
/// Raw estimates above this value get the large range correction.
pub(crate) const LARGE_RANGE_THRESHOLD: f64 = TWO_POW_32 / 30.0;

/// Parameter for bias correction
#[inline]
pub fn alpha(m: usize) -> f64 {
    match m {
        16 => 0.673,
        32 => 0.697,
        64 => 0.709,
        _ => 0.7213 / (1.0 + 1.079 / (m as f64)),
    }
}

/// Linear counting estimate of `m` registers with `zeros` registers still empty.
///
/// When no register is empty the estimate saturates at `m`.
#[inline]
pub fn linear_counting(m: usize, zeros: usize) -> f64 {
    if zeros == 0 {
        return m as f64;
    }
    let m = m as f64;
    m * (m / zeros as f64).ln()
}

/// Weight `2^-rank` of a single register in the harmonic sum
#[inline]
pub(crate) fn rank_weight(rank: u8) -> f64 {
    2f64.powi(-i32::from(rank))
}

/// Harmonic mean based raw estimate over `n` registers with harmonic sum `sum`
#[inline]
pub(crate) fn raw_estimate(alpha: f64, n: usize, sum: f64) -> f64 {
    let n = n as f64;
    alpha * n * n / sum
}

/// Correction for estimates approaching the size of the 32-bit hash space.
///
/// Estimates at or beyond `2^32` have no real-valued correction and are returned as is.
#[inline]
pub(crate) fn large_range_correction(estimate: f64) -> f64 {
    if estimate >= TWO_POW_32 {
        return estimate;
    }
    -TWO_POW_32 * (1.0 - estimate / TWO_POW_32).ln()
}
