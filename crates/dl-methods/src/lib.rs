//! # dl-methods
//!
//! Numerical methods: the recombining binomial lattice, its barrier path
//! evaluation, and backward induction.
//!
//! # Modules
//!
//! * [`lattice`]: calibration, tree indexing, running extremes, roll-back

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Lattice methods: binomial tree, path extremes, backward induction.
pub mod lattice;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use lattice::{
    roll_back, roll_back_absorbing, BinomialTree, LatticeParameters, Node, PathExtremes,
    ValuationResult,
};
