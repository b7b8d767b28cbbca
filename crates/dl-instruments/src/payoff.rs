//! Option payoffs.
//!
//! Payoffs describe the terminal value of an option as a function of the
//! underlying price at expiry.

use dl_core::{Error, Real};
use std::fmt;
use std::str::FromStr;

/// Option type (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionType {
    /// Pays when the underlying finishes above the strike.
    Call,
    /// Pays when the underlying finishes below the strike.
    Put,
}

impl OptionType {
    /// +1 for Call, −1 for Put.
    pub fn sign(self) -> Real {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "Call"),
            OptionType::Put => write!(f, "Put"),
        }
    }
}

impl FromStr for OptionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" | "c" => Ok(OptionType::Call),
            "put" | "p" => Ok(OptionType::Put),
            other => Err(Error::InvalidArgument(format!(
                "unknown option type '{other}', expected 'call' or 'put'"
            ))),
        }
    }
}

/// Terminal payoff of an option.
pub trait Payoff: fmt::Debug + Send + Sync {
    /// Compute the payoff given the underlying price at expiry.
    fn value(&self, price: Real) -> Real;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> String {
        self.name().to_string()
    }
}

/// Cash-or-nothing payoff: pays a fixed amount if strictly in the money.
///
/// `payoff = cash_payoff` if `φ(S − K) > 0`, else 0. A price exactly at the
/// strike pays nothing for either option type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CashOrNothingPayoff {
    /// Option type.
    pub option_type: OptionType,
    /// Strike price.
    pub strike: Real,
    /// Fixed cash payoff.
    pub cash_payoff: Real,
}

impl CashOrNothingPayoff {
    /// Create a new cash-or-nothing payoff.
    pub fn new(option_type: OptionType, strike: Real, cash_payoff: Real) -> Self {
        Self {
            option_type,
            strike,
            cash_payoff,
        }
    }

    /// Whether `price` is strictly in the money.
    pub fn is_in_the_money(&self, price: Real) -> bool {
        match self.option_type {
            OptionType::Call => price > self.strike,
            OptionType::Put => price < self.strike,
        }
    }
}

impl Payoff for CashOrNothingPayoff {
    fn value(&self, price: Real) -> Real {
        if self.is_in_the_money(price) {
            self.cash_payoff
        } else {
            0.0
        }
    }

    fn name(&self) -> &str {
        "CashOrNothing"
    }

    fn description(&self) -> String {
        format!(
            "{} {} @ {} paying {}",
            self.name(),
            self.option_type,
            self.strike,
            self.cash_payoff
        )
    }
}
