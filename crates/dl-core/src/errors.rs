//! Error types for digital-lattice.
//!
//! A single `thiserror`-derived enum covers every failure the lattice engine
//! can report. Failures are terminal: valuation is a deterministic function
//! of its inputs, so nothing is ever retried. Each variant carries enough
//! context (which input, which value, which bound) for the caller to adjust
//! the request.
//!
//! The [`ensure_calibration!`](crate::ensure_calibration) and
//! [`ensure_contract!`](crate::ensure_contract) macros return early with the
//! structured variants.

use thiserror::Error;

use crate::Real;

/// The top-level error type used throughout digital-lattice.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A market or lattice input is outside its admissible range, or the
    /// calibrated risk-neutral probability left `(0, 1)`.
    #[error("invalid calibration: {parameter} = {value} violates {bound}")]
    InvalidCalibration {
        /// The offending input (or derived quantity).
        parameter: &'static str,
        /// The value that was rejected.
        value: Real,
        /// Human-readable description of the violated bound.
        bound: &'static str,
    },

    /// The requested step count exceeds the configured budget.
    #[error("step count {requested} exceeds the configured limit of {limit}")]
    StepCountTooLarge {
        /// Requested number of time steps.
        requested: usize,
        /// Configured maximum.
        limit: usize,
    },

    /// A contract term is outside its admissible range.
    #[error("invalid contract: {field} = {value} violates {bound}")]
    InvalidContract {
        /// The offending contract field.
        field: &'static str,
        /// The value that was rejected.
        value: Real,
        /// Human-readable description of the violated bound.
        bound: &'static str,
    },

    /// A textual argument could not be interpreted.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Lattice settings are inconsistent.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand `Result` type used throughout digital-lattice.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::InvalidCalibration { .. })` if `$cond` is false.
///
/// # Example
/// ```
/// use dl_core::{ensure_calibration, errors::Error};
/// fn positive_vol(sigma: f64) -> dl_core::errors::Result<f64> {
///     ensure_calibration!(sigma > 0.0, "volatility", sigma, "> 0");
///     Ok(sigma)
/// }
/// assert!(positive_vol(0.2).is_ok());
/// assert!(matches!(
///     positive_vol(0.0),
///     Err(Error::InvalidCalibration { parameter: "volatility", .. })
/// ));
/// ```
#[macro_export]
macro_rules! ensure_calibration {
    ($cond:expr, $parameter:expr, $value:expr, $bound:expr) => {
        if !$cond {
            return Err($crate::errors::Error::InvalidCalibration {
                parameter: $parameter,
                value: $value,
                bound: $bound,
            });
        }
    };
}

/// Returns `Err(Error::InvalidContract { .. })` if `$cond` is false.
///
/// # Example
/// ```
/// use dl_core::{ensure_contract, errors::Error};
/// fn payout(q: f64) -> dl_core::errors::Result<f64> {
///     ensure_contract!(q > 0.0, "fixed_payout", q, "> 0");
///     Ok(q)
/// }
/// assert!(payout(10.0).is_ok());
/// assert!(payout(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure_contract {
    ($cond:expr, $field:expr, $value:expr, $bound:expr) => {
        if !$cond {
            return Err($crate::errors::Error::InvalidContract {
                field: $field,
                value: $value,
                bound: $bound,
            });
        }
    };
}
