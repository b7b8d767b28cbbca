//! # dl-pricingengines
//!
//! Pricing engines for cash-or-nothing options with an optional barrier.
//!
//! ## Engines
//!
//! - [`BinomialDigitalEngine`]: CRR lattice with running-extreme barrier
//!   classification or discrete barrier monitoring
//! - [`AnalyticDigitalEngine`]: Black-Scholes closed form for barrier-free
//!   digitals, the lattice's convergence target

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod analytic_digital_engine;
pub mod binomial_digital_engine;

pub use analytic_digital_engine::{cash_or_nothing_price, AnalyticDigitalEngine};
pub use binomial_digital_engine::{
    assign_terminal_values, price_digital_barrier_option, BarrierMonitoring,
    BinomialDigitalEngine, MarketData,
};
pub use dl_methods::ValuationResult;
