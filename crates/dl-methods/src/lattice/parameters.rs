//! Cox-Ross-Rubinstein lattice calibration.
//!
//! Derives the multiplicative up/down moves, the risk-neutral branch
//! probabilities, and the per-step discount factor from the market inputs
//! and the chosen number of steps:
//!
//! | quantity | formula |
//! |---|---|
//! | `Δt` | `T / N` |
//! | `u` | `exp(σ √Δt)` |
//! | `d` | `1 / u` |
//! | `p_up` | `(exp(r Δt) − d) / (u − d)` |
//! | `p_down` | `(u − exp(r Δt)) / (u − d)` |
//! | `discount` | `exp(−r Δt)` |
//!
//! The down probability is formed directly rather than as `1 − p_up` so that
//! it keeps full relative precision when `p_up` approaches 1.

use dl_core::{
    ensure_calibration, DiscountFactor, Probability, Rate, Real, Result, Size, Time, Volatility,
};
use tracing::debug;

/// Immutable calibration of a recombining binomial lattice.
///
/// Every successfully constructed value satisfies `0 < p_up < 1`,
/// `0 < p_down < 1` and `u > 1`, `d = 1 / u`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeParameters {
    step_count: Size,
    step_size: Time,
    log_step: Real,
    up: Real,
    down: Real,
    p_up: Probability,
    p_down: Probability,
    discount: DiscountFactor,
}

impl LatticeParameters {
    /// Calibrate a CRR lattice.
    ///
    /// Fails with [`Error::InvalidCalibration`](dl_core::Error::InvalidCalibration)
    /// when an input is non-finite or non-positive where positivity is
    /// required, or when the risk-neutral probability falls outside `(0, 1)`
    /// (the step is too coarse for the given rate and volatility).
    pub fn calibrate(
        spot: Real,
        volatility: Volatility,
        rate: Rate,
        maturity: Time,
        step_count: Size,
    ) -> Result<Self> {
        ensure_calibration!(
            spot.is_finite() && spot > 0.0,
            "spot",
            spot,
            "finite and > 0"
        );
        ensure_calibration!(
            volatility.is_finite() && volatility > 0.0,
            "volatility",
            volatility,
            "finite and > 0"
        );
        ensure_calibration!(rate.is_finite(), "rate", rate, "finite");
        ensure_calibration!(
            maturity.is_finite() && maturity > 0.0,
            "maturity",
            maturity,
            "finite and > 0"
        );
        ensure_calibration!(
            step_count >= 1,
            "step_count",
            step_count as Real,
            ">= 1"
        );

        let step_size = maturity / step_count as Real;
        let log_step = volatility * step_size.sqrt();
        let up = log_step.exp();
        ensure_calibration!(up > 1.0, "up_factor", up, "> 1");
        let down = 1.0 / up;

        let growth = (rate * step_size).exp();
        let spread = up - down;
        let p_up = (growth - down) / spread;
        let p_down = (up - growth) / spread;
        ensure_calibration!(
            p_up > 0.0 && p_up < 1.0,
            "risk_neutral_probability",
            p_up,
            "strictly inside (0, 1)"
        );
        ensure_calibration!(
            p_down > 0.0 && p_down < 1.0,
            "down_probability",
            p_down,
            "strictly inside (0, 1)"
        );

        let discount = (-rate * step_size).exp();

        debug!(
            step_count,
            step_size, up, down, p_up, discount, "calibrated binomial lattice"
        );

        Ok(Self {
            step_count,
            step_size,
            log_step,
            up,
            down,
            p_up,
            p_down,
            discount,
        })
    }

    /// Number of time steps `N`.
    pub fn step_count(&self) -> Size {
        self.step_count
    }

    /// Time increment `Δt`.
    pub fn step_size(&self) -> Time {
        self.step_size
    }

    /// Log-price move per step, `σ √Δt`.
    pub fn log_step(&self) -> Real {
        self.log_step
    }

    /// Up multiplier `u`.
    pub fn up_factor(&self) -> Real {
        self.up
    }

    /// Down multiplier `d = 1 / u`.
    pub fn down_factor(&self) -> Real {
        self.down
    }

    /// Risk-neutral probability of an up move.
    pub fn risk_neutral_probability(&self) -> Probability {
        self.p_up
    }

    /// Risk-neutral probability of a down move.
    pub fn down_probability(&self) -> Probability {
        self.p_down
    }

    /// Discount factor over one step, `exp(−r Δt)`.
    pub fn step_discount(&self) -> DiscountFactor {
        self.discount
    }
}
