//! Binomial (CRR) engine for barrier-conditioned cash-or-nothing options.
//!
//! The valuation runs in four stages over a single recombining tree:
//!
//! 1. calibrate the lattice ([`LatticeParameters::calibrate`]);
//! 2. sweep the running path extremes forward ([`PathExtremes`]), only when
//!    the contract has a barrier;
//! 3. assign terminal values from the digital rule and the barrier outcome
//!    ([`DigitalBarrierOption::terminal_value`]);
//! 4. roll back to time zero ([`roll_back`]).
//!
//! Every call is a pure function of the contract, the market inputs and the
//! settings. No state is kept between valuations.

use dl_core::{Error, LatticeSettings, Price, Rate, Real, Result, Size, Time, Volatility};
use dl_instruments::{
    BarrierActivation, BarrierDirection, BarrierSpec, DigitalBarrierOption, OptionType, Payoff,
    PricingEngine, PricingResults,
};
use dl_methods::{
    roll_back, roll_back_absorbing, BinomialTree, LatticeParameters, PathExtremes,
    ValuationResult,
};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, debug_span};

/// Flat Black-Scholes market for a single underlying.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketData {
    /// Spot price of the underlying.
    pub spot: Price,
    /// Continuously compounded risk-free rate.
    pub rate: Rate,
    /// Lognormal volatility.
    pub volatility: Volatility,
    /// Time to expiry in years.
    pub maturity: Time,
}

/// How the barrier is observed on the lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarrierMonitoring {
    /// A terminal node is breached when any path reaching it touches the
    /// barrier (running-extreme aggregation per node).
    #[default]
    NodeReach,
    /// Each path is checked at every lattice date, time zero included.
    /// Knock-outs are absorbed at breached nodes during the roll-back and
    /// knock-ins are valued as vanilla minus knock-out.
    Discrete,
}

impl fmt::Display for BarrierMonitoring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BarrierMonitoring::NodeReach => write!(f, "node-reach"),
            BarrierMonitoring::Discrete => write!(f, "discrete"),
        }
    }
}

impl FromStr for BarrierMonitoring {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "node-reach" | "node" => Ok(BarrierMonitoring::NodeReach),
            "discrete" => Ok(BarrierMonitoring::Discrete),
            other => Err(Error::InvalidArgument(format!(
                "unknown barrier monitoring '{other}', expected 'node-reach' or 'discrete'"
            ))),
        }
    }
}

/// Binomial-tree engine for [`DigitalBarrierOption`].
///
/// ```
/// use dl_instruments::{DigitalBarrierOption, OptionType, PricingEngine};
/// use dl_pricingengines::{BinomialDigitalEngine, MarketData};
///
/// let market = MarketData { spot: 100.0, rate: 0.05, volatility: 0.2, maturity: 1.0 };
/// let engine = BinomialDigitalEngine::new(market, 201);
/// let option = DigitalBarrierOption::vanilla(OptionType::Call, 100.0, 10.0).unwrap();
/// let results = engine.calculate(&option).unwrap();
/// assert!(results.npv > 5.0 && results.npv < 5.6);
/// assert!(results.result("delta").is_some());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BinomialDigitalEngine {
    market: MarketData,
    step_count: Size,
    settings: LatticeSettings,
    monitoring: BarrierMonitoring,
}

impl BinomialDigitalEngine {
    /// Create an engine with default settings and node-reach monitoring.
    pub fn new(market: MarketData, step_count: Size) -> Self {
        Self {
            market,
            step_count,
            settings: LatticeSettings::default(),
            monitoring: BarrierMonitoring::default(),
        }
    }

    /// Replace the lattice settings.
    pub fn with_settings(mut self, settings: LatticeSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Replace the barrier monitoring convention.
    pub fn with_monitoring(mut self, monitoring: BarrierMonitoring) -> Self {
        self.monitoring = monitoring;
        self
    }

    /// Number of time steps.
    pub fn step_count(&self) -> Size {
        self.step_count
    }

    /// Value `option`, returning the root value and the adjacent layers.
    pub fn value(&self, option: &DigitalBarrierOption) -> Result<ValuationResult> {
        Ok(self.valuation(option)?.1)
    }

    fn valuation(&self, option: &DigitalBarrierOption) -> Result<(BinomialTree, ValuationResult)> {
        let _span = debug_span!(
            "binomial_digital",
            steps = self.step_count,
            monitoring = %self.monitoring
        )
        .entered();

        self.settings.validate()?;
        self.settings.check_step_count(self.step_count)?;
        let m = self.market;
        let params = LatticeParameters::calibrate(
            m.spot,
            m.volatility,
            m.rate,
            m.maturity,
            self.step_count,
        )?;
        let tree = BinomialTree::new(m.spot, params);

        let result = match (option.barrier(), self.monitoring) {
            (None, _) => {
                let terminal = assign_terminal_values(&tree, option, None);
                roll_back(&tree, terminal, &self.settings)
            }
            (Some(_), BarrierMonitoring::NodeReach) => {
                let extremes = PathExtremes::terminal(&tree, &self.settings);
                let terminal = assign_terminal_values(&tree, option, Some(&extremes));
                roll_back(&tree, terminal, &self.settings)
            }
            (Some(barrier), BarrierMonitoring::Discrete) => {
                self.discretely_monitored(&tree, option, barrier)
            }
        };

        debug!(npv = result.npv, "digital option valued");
        Ok((tree, result))
    }

    fn discretely_monitored(
        &self,
        tree: &BinomialTree,
        option: &DigitalBarrierOption,
        barrier: &BarrierSpec,
    ) -> ValuationResult {
        let raw = assign_terminal_values(tree, &option.without_barrier(), None);
        let knock_out = roll_back_absorbing(tree, raw.clone(), &self.settings, |s| {
            barrier.is_touched(s)
        });
        match barrier.activation {
            BarrierActivation::KnockOut => knock_out,
            BarrierActivation::KnockIn => {
                let vanilla = roll_back(tree, raw, &self.settings);
                difference(&vanilla, &knock_out)
            }
        }
    }
}

impl PricingEngine<DigitalBarrierOption> for BinomialDigitalEngine {
    fn calculate(&self, option: &DigitalBarrierOption) -> Result<PricingResults> {
        let (tree, valuation) = self.valuation(option)?;
        let mut results = PricingResults::from_npv(valuation.npv);
        if let Some(delta) = lattice_delta(&tree, &valuation) {
            results = results.with_result("delta", delta);
        }
        if let Some(gamma) = lattice_gamma(&tree, &valuation) {
            results = results.with_result("gamma", gamma);
        }
        Ok(results)
    }
}

/// Terminal value of every node at maturity.
///
/// Without `extremes` the barrier, if any, is ignored and the plain digital
/// rule applies.
pub fn assign_terminal_values(
    tree: &BinomialTree,
    option: &DigitalBarrierOption,
    extremes: Option<&PathExtremes>,
) -> Vec<Real> {
    let layer = tree.layer(tree.steps());
    match extremes {
        Some(e) => layer
            .map(|n| option.terminal_value(n.price, e.low(n.up_count), e.high(n.up_count)))
            .collect(),
        None => layer.map(|n| option.payoff().value(n.price)).collect(),
    }
}

fn difference(a: &ValuationResult, b: &ValuationResult) -> ValuationResult {
    ValuationResult {
        npv: a.npv - b.npv,
        step_one: a
            .step_one
            .zip(b.step_one)
            .map(|(x, y)| [x[0] - y[0], x[1] - y[1]]),
        step_two: a
            .step_two
            .zip(b.step_two)
            .map(|(x, y)| [x[0] - y[0], x[1] - y[1], x[2] - y[2]]),
    }
}

fn lattice_delta(tree: &BinomialTree, v: &ValuationResult) -> Option<Real> {
    let [down, up] = v.step_one?;
    Some((up - down) / (tree.underlying(1, 1) - tree.underlying(1, 0)))
}

fn lattice_gamma(tree: &BinomialTree, v: &ValuationResult) -> Option<Real> {
    let [v0, v1, v2] = v.step_two?;
    let (s0, s1, s2) = (
        tree.underlying(2, 0),
        tree.underlying(2, 1),
        tree.underlying(2, 2),
    );
    let delta_up = (v2 - v1) / (s2 - s1);
    let delta_down = (v1 - v0) / (s1 - s0);
    Some((delta_up - delta_down) / (0.5 * (s2 - s0)))
}

/// Price a cash-or-nothing option with an optional barrier on a CRR tree.
///
/// `barrier` is the barrier level; when it is `None` the direction and
/// activation are ignored and the contract is a plain digital. Uses default
/// [`LatticeSettings`] and node-reach barrier classification.
///
/// ```
/// use dl_instruments::{BarrierActivation, BarrierDirection, OptionType};
/// use dl_pricingengines::price_digital_barrier_option;
///
/// let vanilla = price_digital_barrier_option(
///     100.0, 100.0, None, 0.05, 0.2, 1.0, 10.0, 1,
///     OptionType::Call, BarrierDirection::Down, BarrierActivation::KnockOut,
/// ).unwrap();
/// let (u, d) = (0.2_f64.exp(), (-0.2_f64).exp());
/// let p = (0.05_f64.exp() - d) / (u - d);
/// assert!((vanilla - (-0.05_f64).exp() * p * 10.0).abs() < 1e-12);
/// ```
#[allow(clippy::too_many_arguments)]
pub fn price_digital_barrier_option(
    spot: Price,
    strike: Price,
    barrier: Option<Price>,
    rate: Rate,
    volatility: Volatility,
    maturity: Time,
    fixed_payout: Real,
    step_count: Size,
    option_type: OptionType,
    barrier_direction: BarrierDirection,
    barrier_activation: BarrierActivation,
) -> Result<Real> {
    let barrier = barrier
        .map(|level| BarrierSpec::new(level, barrier_direction, barrier_activation))
        .transpose()?;
    let option = DigitalBarrierOption::new(option_type, strike, fixed_payout, barrier)?;
    let market = MarketData {
        spot,
        rate,
        volatility,
        maturity,
    };
    Ok(BinomialDigitalEngine::new(market, step_count)
        .value(&option)?
        .npv)
}
