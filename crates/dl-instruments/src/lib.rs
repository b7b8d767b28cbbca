//! # dl-instruments
//!
//! Contracts priced by the lattice: cash-or-nothing payoffs, barrier terms,
//! and the digital barrier option that combines them.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod barrier;
pub mod instrument;
pub mod option;
pub mod payoff;

pub use barrier::{BarrierActivation, BarrierDirection, BarrierSpec};
pub use instrument::{PricingEngine, PricingResults};
pub use option::DigitalBarrierOption;
pub use payoff::{CashOrNothingPayoff, OptionType, Payoff};
