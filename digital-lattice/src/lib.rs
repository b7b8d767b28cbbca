//! # digital-lattice
//!
//! Binomial lattice valuation of cash-or-nothing options with an optional
//! knock-in or knock-out barrier.
//!
//! This crate is a **façade** that re-exports the public items of the
//! `dl-*` workspace crates, plus the configuration file format used by the
//! `crr-digital` command-line tool.
//!
//! ## Quick start
//!
//! ```rust
//! use digital_lattice::instruments::{BarrierActivation, BarrierDirection, OptionType};
//! use digital_lattice::pricingengines::price_digital_barrier_option;
//!
//! let knock_in = price_digital_barrier_option(
//!     100.0, 100.0, Some(90.0), 0.05, 0.2, 1.0, 10.0, 200,
//!     OptionType::Call, BarrierDirection::Down, BarrierActivation::KnockIn,
//! ).unwrap();
//! assert!(knock_in > 0.0);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, error definitions, and settings.
pub use dl_core as core;

/// Digital option contracts and barrier terms.
pub use dl_instruments as instruments;

/// Numerical methods (binomial lattice, path extremes, backward induction).
pub use dl_methods as methods;

/// Pricing engines.
pub use dl_pricingengines as pricingengines;

/// Configuration file for the command-line tool.
pub mod config;
