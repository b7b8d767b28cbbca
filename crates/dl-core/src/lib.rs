//! # dl-core
//!
//! Core types, error definitions, and settings for digital-lattice.
//!
//! This crate provides the building blocks shared across the workspace:
//! numeric type aliases, the error enum with its validation macros, and
//! [`LatticeSettings`].

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Error types and the `ensure_calibration!` / `ensure_contract!` macros.
pub mod errors;

/// Step budget and parallel execution policy.
pub mod settings;

// ── Primitive type aliases ────────────────────────────────────────────────────

/// Floating-point type used throughout the library.
pub type Real = f64;

/// Alias used for step counts and node indices.
pub type Size = usize;

/// A continuously compounded rate expressed as a decimal (0.05 = 5 %).
pub type Rate = Real;

/// A discount factor in (0, 1].
pub type DiscountFactor = Real;

/// A probability in [0, 1].
pub type Probability = Real;

/// A price or value.
pub type Price = Real;

/// A volatility level expressed as a decimal.
pub type Volatility = Real;

/// A time measurement in years.
pub type Time = Real;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use errors::{Error, Result};
pub use settings::LatticeSettings;
