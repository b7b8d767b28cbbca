//! Digital (cash-or-nothing) option with an optional barrier.

use crate::barrier::BarrierSpec;
use crate::payoff::{CashOrNothingPayoff, OptionType, Payoff};
use dl_core::{ensure_contract, Real, Result};

/// A European cash-or-nothing option, optionally conditioned on a barrier.
///
/// Without a barrier the contract is a plain digital. The option itself is
/// an immutable description; pricing engines read it and never modify it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DigitalBarrierOption {
    payoff: CashOrNothingPayoff,
    barrier: Option<BarrierSpec>,
}

impl DigitalBarrierOption {
    /// Create a contract, validating its terms.
    pub fn new(
        option_type: OptionType,
        strike: Real,
        fixed_payout: Real,
        barrier: Option<BarrierSpec>,
    ) -> Result<Self> {
        ensure_contract!(strike.is_finite(), "strike", strike, "finite");
        ensure_contract!(
            fixed_payout.is_finite() && fixed_payout > 0.0,
            "fixed_payout",
            fixed_payout,
            "finite and > 0"
        );
        if let Some(b) = barrier {
            // Re-validate: the fields of BarrierSpec are public.
            BarrierSpec::new(b.level, b.direction, b.activation)?;
        }
        Ok(Self {
            payoff: CashOrNothingPayoff::new(option_type, strike, fixed_payout),
            barrier,
        })
    }

    /// Convenience: a digital without barrier.
    pub fn vanilla(option_type: OptionType, strike: Real, fixed_payout: Real) -> Result<Self> {
        Self::new(option_type, strike, fixed_payout, None)
    }

    /// The same contract with the barrier removed.
    pub fn without_barrier(&self) -> Self {
        Self {
            barrier: None,
            ..*self
        }
    }

    /// The same contract with the opposite barrier activation.
    ///
    /// Knock-in and knock-out versions of one contract together replicate
    /// the barrier-free digital.
    pub fn complement(&self) -> Self {
        Self {
            barrier: self.barrier.map(|b| b.complement()),
            ..*self
        }
    }

    /// The digital payoff.
    pub fn payoff(&self) -> &CashOrNothingPayoff {
        &self.payoff
    }

    /// The barrier, if any.
    pub fn barrier(&self) -> Option<&BarrierSpec> {
        self.barrier.as_ref()
    }

    /// Option type.
    pub fn option_type(&self) -> OptionType {
        self.payoff.option_type
    }

    /// Strike.
    pub fn strike(&self) -> Real {
        self.payoff.strike
    }

    /// Fixed amount paid when the option finishes in the money.
    pub fn fixed_payout(&self) -> Real {
        self.payoff.cash_payoff
    }

    /// Value at expiry of a terminal node.
    ///
    /// `path_low` / `path_high` are the most extreme running minimum and
    /// maximum over all paths reaching the node. The option type selects
    /// the digital rule, the barrier direction selects which extreme is
    /// tested, and the activation decides what a breach does.
    pub fn terminal_value(&self, price: Real, path_low: Real, path_high: Real) -> Real {
        let raw = self.payoff.value(price);
        match self.barrier {
            None => raw,
            Some(b) => b.activation.apply(b.is_breached(path_low, path_high), raw),
        }
    }
}
