//! Probabilistic cardinality sketches.
//!
//! Streaming estimators for the number of distinct keys seen, used for cheap
//! table statistics. Both estimators implement the same HyperLogLog formula
//! over a table of 2^b small registers; they differ in how a register is
//! stored ([`HyperLogLog`] keeps a flat byte per register,
//! [`HyperLogLogPresto`] splits each one into a packed dense slot plus a
//! sparse overflow entry) and in which end of the hash they rank.
//!
//! Instances are single-writer: callers serialise access, there is no
//! internal locking.

mod hyperloglog;
mod key;
mod presto;

pub use {
    hyperloglog::HyperLogLog,
    key::SketchKey,
    presto::{DENSE_BITS, HyperLogLogPresto, OVERFLOW_BITS},
};

/// Bias correction constant of the cardinality estimate.
///
/// A single fixed constant is used for every register count, matching the
/// reference estimator bit-for-bit. The HyperLogLog paper instead derives a
/// per-size constant (`0.7213 / (1 + 1.079/m)` for large `m`), which is more
/// accurate: with the fixed constant the raw estimate runs roughly 10% high
/// at large register counts.
pub const BIAS_CONSTANT: f64 = 0.79402;
