//! Analytic cash-or-nothing engine (Black-Scholes).
//!
//! Closed-form value of a barrier-free digital:
//!
//! $$V = Q e^{-rT} N(\phi d_2), \quad d_2 = \frac{\ln(S/K) + (r - \sigma^2/2)T}{\sigma\sqrt{T}}$$
//!
//! with `φ = +1` for a call and `−1` for a put. It is the limit the lattice
//! converges to and serves as its reference.

use dl_core::{ensure_calibration, Error, Rate, Real, Result, Time, Volatility};
use dl_instruments::{DigitalBarrierOption, OptionType, PricingEngine, PricingResults};
use statrs::function::erf::erfc;

/// Standard normal cumulative distribution function.
fn normal_cdf(x: Real) -> Real {
    0.5 * erfc(-x / std::f64::consts::SQRT_2)
}

/// Black-Scholes price of a cash-or-nothing option.
///
/// At `t = 0` the (strict) intrinsic payoff is returned undiscounted. For a
/// positive spot, a non-positive strike is always finished above, and zero
/// volatility leaves the underlying on its forward.
pub fn cash_or_nothing_price(
    option_type: OptionType,
    spot: Real,
    strike: Real,
    cash: Real,
    rate: Rate,
    volatility: Volatility,
    t: Time,
) -> Real {
    let phi = option_type.sign();
    if t <= 0.0 {
        return if phi * (spot - strike) > 0.0 { cash } else { 0.0 };
    }
    let discounted = cash * (-rate * t).exp();
    if strike <= 0.0 {
        return if phi > 0.0 { discounted } else { 0.0 };
    }
    let std_dev = volatility * t.sqrt();
    if std_dev <= 0.0 {
        let forward = spot * (rate * t).exp();
        return if phi * (forward - strike) > 0.0 { discounted } else { 0.0 };
    }
    let d2 = ((spot / strike).ln() + (rate - 0.5 * volatility * volatility) * t) / std_dev;
    discounted * normal_cdf(phi * d2)
}

/// Closed-form engine for barrier-free digitals.
#[derive(Debug, Clone, Copy)]
pub struct AnalyticDigitalEngine {
    spot: Real,
    rate: Rate,
    volatility: Volatility,
    maturity: Time,
}

impl AnalyticDigitalEngine {
    /// Create an engine for the given flat market.
    pub fn new(spot: Real, rate: Rate, volatility: Volatility, maturity: Time) -> Result<Self> {
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
            maturity.is_finite() && maturity >= 0.0,
            "maturity",
            maturity,
            "finite and >= 0"
        );
        Ok(Self {
            spot,
            rate,
            volatility,
            maturity,
        })
    }
}

impl PricingEngine<DigitalBarrierOption> for AnalyticDigitalEngine {
    fn calculate(&self, option: &DigitalBarrierOption) -> Result<PricingResults> {
        if let Some(barrier) = option.barrier() {
            return Err(Error::InvalidArgument(format!(
                "closed form covers barrier-free digitals only, got barrier {barrier}"
            )));
        }
        let npv = cash_or_nothing_price(
            option.option_type(),
            self.spot,
            option.strike(),
            option.fixed_payout(),
            self.rate,
            self.volatility,
            self.maturity,
        );
        Ok(PricingResults::from_npv(npv))
    }
}
