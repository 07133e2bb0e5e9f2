//! `adaptive-hyperloglog` is a Rust crate designed to estimate the number of distinct elements in a stream or dataset
//! using bounded memory.
//!
//! The estimator starts with a sparse map of HyperLogLog registers and converts itself into a fixed array of
//! `2^precision` registers once the map outgrows it.
//!
//! ```
//! use adaptive_hyperloglog::{CardinalityEstimator, Mode};
//!
//! let mut estimator = CardinalityEstimator::new(12, Mode::Sparse).unwrap();
//! for i in 0..1000 {
//!     estimator.insert(&i);
//! }
//! assert!((estimator.estimate() - 1000.0).abs() < 100.0);
//! ```
pub mod config;
pub mod correction;
mod dense;
pub mod error;
pub mod estimator;
pub mod precision;
mod representation;
mod sparse;

pub use config::{Config, Mode, SparseEstimation};
pub use error::Error;
pub use estimator::CardinalityEstimator;
pub use precision::Precision;
