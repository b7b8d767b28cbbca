//! Lattice methods for digital option pricing.
//!
//! # Overview
//!
//! * [`LatticeParameters`]: CRR calibration with no-arbitrage checks
//! * [`BinomialTree`]: recombining tree, `(t, k) → price` without path replay
//! * [`PathExtremes`]: running minima/maxima per terminal node by forward
//!   dynamic programming
//! * [`roll_back`] / [`roll_back_absorbing`]: backward induction

pub mod barrier;
pub mod binomial_tree;
pub mod induction;
pub mod parameters;

pub use barrier::PathExtremes;
pub use binomial_tree::{BinomialTree, LayerNodes, Node};
pub use induction::{roll_back, roll_back_absorbing, ValuationResult};
pub use parameters::LatticeParameters;
